//! Output types for the subtitle reader.

use serde::{Deserialize, Serialize};

/// One `Dialogue:` line from an ASS script.
///
/// Timestamps are kept verbatim (`H:MM:SS.CC`). `chinese_text` and
/// `english_text` are the first two `\N`-separated segments with override
/// tags removed; `raw_text` is the payload exactly as it appeared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dialogue {
    pub start_time: String,
    pub end_time: String,
    pub chinese_text: String,
    pub english_text: String,
    pub raw_text: String,
}
