//! subseek-parser: bilingual ASS subtitle reader.
//!
//! Turns a subtitle file on disk into an ordered list of [`Dialogue`]
//! records. Three pieces cooperate:
//!
//! - [`encoding`] tries a fixed list of text encodings until the bytes look
//!   like an ASS script,
//! - [`ass`] pulls `Dialogue:` lines apart into Chinese and English text,
//! - [`filename`] reads the `S##E##` tag out of the file name.
//!
//! # Quick start
//!
//! ```
//! use subseek_parser::{parse_dialogues, parse_season_episode};
//!
//! let script = "[Script Info]\n\
//!     Dialogue: 0,0:00:01.00,0:00:02.50,Default,,0,0,0,,你好\\NHello\n";
//! let lines = parse_dialogues(script);
//! assert_eq!(lines[0].chinese_text, "你好");
//! assert_eq!(lines[0].english_text, "Hello");
//!
//! let se = parse_season_episode("Young.Sheldon.S01E05.ass").unwrap();
//! assert_eq!((se.season, se.episode), (1, 5));
//! ```

pub mod ass;
pub mod encoding;
pub mod filename;
pub mod types;

use std::path::Path;

use subseek_core::Result;

pub use ass::parse_dialogues;
pub use encoding::{decode_subtitle_bytes, read_subtitle_file, DecodedText, TextEncoding};
pub use filename::parse_season_episode;
pub use types::Dialogue;

/// Read, decode and extract every dialogue line from a subtitle file.
///
/// Fails with [`subseek_core::Error::Decode`] when no candidate encoding
/// yields ASS text, or with an I/O error when the file cannot be read.
pub fn parse_file(path: &Path) -> Result<Vec<Dialogue>> {
    let decoded = read_subtitle_file(path)?;
    tracing::debug!(
        file = %path.display(),
        encoding = decoded.encoding.label(),
        "Decoded subtitle file"
    );
    Ok(parse_dialogues(&decoded.text))
}
