//! Rust structs mapping to database tables.
//!
//! Each model implements `from_row` for constructing itself from a
//! `rusqlite::Row`.

// ---------------------------------------------------------------------------
// SubtitleFile
// ---------------------------------------------------------------------------

/// One indexed subtitle file.
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleFile {
    pub id: i64,
    pub filename: String,
    pub file_path: String,
    pub season: u32,
    pub episode: u32,
    pub indexed_at: String,
}

impl SubtitleFile {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            filename: row.get(1)?,
            file_path: row.get(2)?,
            season: row.get(3)?,
            episode: row.get(4)?,
            indexed_at: row.get(5)?,
        })
    }
}

// ---------------------------------------------------------------------------
// DialogueRow
// ---------------------------------------------------------------------------

/// A stored dialogue line.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogueRow {
    pub id: i64,
    pub file_id: i64,
    pub dialogue_index: i64,
    pub start_time: String,
    pub end_time: String,
    pub chinese_text: String,
    pub english_text: String,
    pub raw_text: Option<String>,
}

impl DialogueRow {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            file_id: row.get(1)?,
            dialogue_index: row.get(2)?,
            start_time: row.get(3)?,
            end_time: row.get(4)?,
            chinese_text: row.get(5)?,
            english_text: row.get(6)?,
            raw_text: row.get(7)?,
        })
    }
}

/// Column values for inserting one dialogue line.
#[derive(Debug, Clone, Copy)]
pub struct NewDialogue<'a> {
    pub dialogue_index: i64,
    pub start_time: &'a str,
    pub end_time: &'a str,
    pub chinese_text: &'a str,
    pub english_text: &'a str,
    pub raw_text: &'a str,
}

// ---------------------------------------------------------------------------
// DialogueMatch
// ---------------------------------------------------------------------------

/// A dialogue line joined with its file's metadata, as returned by search.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogueMatch {
    pub id: i64,
    pub file_id: i64,
    pub dialogue_index: i64,
    pub start_time: String,
    pub end_time: String,
    pub chinese_text: String,
    pub english_text: String,
    pub filename: String,
    pub season: u32,
    pub episode: u32,
}

impl DialogueMatch {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            file_id: row.get(1)?,
            dialogue_index: row.get(2)?,
            start_time: row.get(3)?,
            end_time: row.get(4)?,
            chinese_text: row.get(5)?,
            english_text: row.get(6)?,
            filename: row.get(7)?,
            season: row.get(8)?,
            episode: row.get(9)?,
        })
    }
}

// ---------------------------------------------------------------------------
// DialogueText
// ---------------------------------------------------------------------------

/// The bilingual text of a neighbouring line.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogueText {
    pub chinese_text: String,
    pub english_text: String,
}

impl DialogueText {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            chinese_text: row.get(0)?,
            english_text: row.get(1)?,
        })
    }

    /// Chinese line, newline, English line.
    pub fn joined(&self) -> String {
        format!("{}\n{}", self.chinese_text, self.english_text)
    }
}
