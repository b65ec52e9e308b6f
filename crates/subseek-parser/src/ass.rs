//! `Dialogue:` line extraction for bilingual ASS scripts.
//!
//! Only the event lines matter. A line looks like
//!
//! ```text
//! Dialogue: 0,0:18:38.72,0:18:40.10,Default,,0,0,0,,{\fad(0,0)}中文\NEnglish
//! ```
//!
//! The nine comma-separated fields before the payload are fixed by the
//! format, so the payload itself may contain commas.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::Dialogue;

/// Layer, start, end, then six fields (style, name, margins, effect) and
/// the payload. `R` makes `$` stop before `\r\n`.
static DIALOGUE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?mR)^Dialogue:[ \t]*\d+,(\d+:\d+:\d+\.\d+),(\d+:\d+:\d+\.\d+),[^,\r\n]*,[^,\r\n]*,[^,\r\n]*,[^,\r\n]*,[^,\r\n]*,[^,\r\n]*,(.*)$",
    )
    .expect("dialogue pattern is valid")
});

/// `{...}` override blocks such as `{\an8}` or `{\fad(200,0)}`.
static OVERRIDE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[^}]+\}").expect("override pattern is valid"));

/// ASS hard line break separating the Chinese and English lines.
const LINE_BREAK: &str = r"\N";

/// Extract every dialogue line from decoded script text, in source order.
///
/// Lines that do not fit the grammar are skipped. Records whose text ends
/// up empty are still returned so that positions stay contiguous.
pub fn parse_dialogues(text: &str) -> Vec<Dialogue> {
    DIALOGUE_RE
        .captures_iter(text)
        .map(|caps| {
            let payload = &caps[3];
            let (chinese_text, english_text) = split_bilingual(payload);
            Dialogue {
                start_time: caps[1].to_string(),
                end_time: caps[2].to_string(),
                chinese_text,
                english_text,
                raw_text: payload.to_string(),
            }
        })
        .collect()
}

/// Strip override tags and split a payload into (Chinese, English).
///
/// Segments after the second `\N` are dropped. A line carrying only
/// English text is mirrored into the Chinese slot.
pub fn split_bilingual(payload: &str) -> (String, String) {
    let clean = OVERRIDE_RE.replace_all(payload, "");
    let mut segments = clean.split(LINE_BREAK).map(str::trim);

    let mut chinese = segments.next().unwrap_or_default().to_string();
    let english = segments.next().unwrap_or_default().to_string();

    if chinese.is_empty() && !english.is_empty() {
        chinese.clone_from(&english);
    }

    (chinese, english)
}
