//! Encoding-tolerant subtitle reading.
//!
//! Fansub ASS files turn up in UTF-8 (with or without BOM), UTF-16 and the
//! GB family. [`decode_subtitle_bytes`] walks [`CANDIDATES`] in order,
//! decoding strictly, and keeps the first result that contains an ASS marker.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use encoding_rs::{Encoding, GB18030, GBK, UTF_16BE, UTF_16LE, UTF_8};
use subseek_core::{Error, Result};

/// Substrings that identify decoded text as an ASS script.
const ASS_MARKERS: &[&str] = &["[Script Info]", "Dialogue:"];

/// A text encoding the reader is willing to try.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// UTF-8 with a leading byte-order mark stripped if present.
    Utf8Sig,
    Utf8,
    /// UTF-16 with BOM sniffing, little-endian when there is no BOM.
    Utf16,
    Utf16Le,
    Utf16Be,
    /// Decoded with the GBK table, which is a superset of GB2312.
    Gb2312,
    Gbk,
    Gb18030,
}

/// Candidate encodings in the order they are tried.
pub const CANDIDATES: &[TextEncoding] = &[
    TextEncoding::Utf8Sig,
    TextEncoding::Utf8,
    TextEncoding::Utf16,
    TextEncoding::Utf16Le,
    TextEncoding::Utf16Be,
    TextEncoding::Gb2312,
    TextEncoding::Gbk,
    TextEncoding::Gb18030,
];

impl TextEncoding {
    pub fn label(self) -> &'static str {
        match self {
            Self::Utf8Sig => "utf-8-sig",
            Self::Utf8 => "utf-8",
            Self::Utf16 => "utf-16",
            Self::Utf16Le => "utf-16-le",
            Self::Utf16Be => "utf-16-be",
            Self::Gb2312 => "gb2312",
            Self::Gbk => "gbk",
            Self::Gb18030 => "gb18030",
        }
    }

    /// Decode `bytes` strictly. Any malformed sequence yields `None`.
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            Self::Utf8Sig => {
                let body = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
                strict(UTF_8, body)
            }
            Self::Utf8 => strict(UTF_8, bytes),
            Self::Utf16 => match bytes {
                [0xFF, 0xFE, rest @ ..] => strict(UTF_16LE, rest),
                [0xFE, 0xFF, rest @ ..] => strict(UTF_16BE, rest),
                _ => strict(UTF_16LE, bytes),
            },
            Self::Utf16Le => strict(UTF_16LE, bytes),
            Self::Utf16Be => strict(UTF_16BE, bytes),
            Self::Gb2312 | Self::Gbk => strict(GBK, bytes),
            Self::Gb18030 => strict(GB18030, bytes),
        }
    }
}

fn strict(encoding: &'static Encoding, bytes: &[u8]) -> Option<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(Cow::into_owned)
}

fn looks_like_ass(text: &str) -> bool {
    ASS_MARKERS.iter().any(|marker| text.contains(marker))
}

/// Text decoded from a subtitle file, plus the encoding that worked.
#[derive(Debug, Clone)]
pub struct DecodedText {
    pub text: String,
    pub encoding: TextEncoding,
}

/// Try every candidate encoding against `bytes`.
///
/// Returns `None` when no candidate both decodes cleanly and produces text
/// containing `[Script Info]` or `Dialogue:`.
pub fn decode_subtitle_bytes(bytes: &[u8]) -> Option<DecodedText> {
    CANDIDATES.iter().find_map(|&encoding| {
        let text = encoding.decode(bytes)?;
        looks_like_ass(&text).then_some(DecodedText { text, encoding })
    })
}

/// Read a subtitle file fully and decode it.
pub fn read_subtitle_file(path: &Path) -> Result<DecodedText> {
    let bytes = std::fs::read(path)?;
    decode_subtitle_bytes(&bytes).ok_or_else(|| Error::decode(PathBuf::from(path)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = "[Script Info]\nDialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,谢尔顿\\NSheldon\n";

    fn utf16(text: &str, big_endian: bool, bom: bool) -> Vec<u8> {
        let mut out = Vec::new();
        if bom {
            out.extend_from_slice(if big_endian { &[0xFE, 0xFF] } else { &[0xFF, 0xFE] });
        }
        for unit in text.encode_utf16() {
            let pair = if big_endian {
                unit.to_be_bytes()
            } else {
                unit.to_le_bytes()
            };
            out.extend_from_slice(&pair);
        }
        out
    }

    #[test]
    fn plain_utf8_is_first_hit_after_sig() {
        let decoded = decode_subtitle_bytes(SCRIPT.as_bytes()).unwrap();
        assert_eq!(decoded.encoding, TextEncoding::Utf8Sig);
        assert_eq!(decoded.text, SCRIPT);
    }

    #[test]
    fn utf8_bom_is_stripped() {
        let mut bytes = b"\xEF\xBB\xBF".to_vec();
        bytes.extend_from_slice(SCRIPT.as_bytes());
        let decoded = decode_subtitle_bytes(&bytes).unwrap();
        assert_eq!(decoded.encoding, TextEncoding::Utf8Sig);
        assert!(decoded.text.starts_with("[Script Info]"));
    }

    #[test]
    fn utf16_le_with_bom() {
        let decoded = decode_subtitle_bytes(&utf16(SCRIPT, false, true)).unwrap();
        assert_eq!(decoded.encoding, TextEncoding::Utf16);
        assert_eq!(decoded.text, SCRIPT);
    }

    #[test]
    fn utf16_be_with_bom() {
        let decoded = decode_subtitle_bytes(&utf16(SCRIPT, true, true)).unwrap();
        assert_eq!(decoded.encoding, TextEncoding::Utf16);
        assert_eq!(decoded.text, SCRIPT);
    }

    #[test]
    fn utf16_be_without_bom_falls_through() {
        let decoded = decode_subtitle_bytes(&utf16(SCRIPT, true, false)).unwrap();
        assert_eq!(decoded.encoding, TextEncoding::Utf16Be);
        assert_eq!(decoded.text, SCRIPT);
    }

    #[test]
    fn gbk_bytes_decode_as_gb2312() {
        let (bytes, _, unmappable) = GBK.encode(SCRIPT);
        assert!(!unmappable);
        let decoded = decode_subtitle_bytes(&bytes).unwrap();
        assert_eq!(decoded.encoding, TextEncoding::Gb2312);
        assert_eq!(decoded.text, SCRIPT);
    }

    #[test]
    fn text_without_marker_is_rejected() {
        assert!(decode_subtitle_bytes("1\n00:00:01,000 --> 00:00:02,000\nhi\n".as_bytes()).is_none());
    }

    #[test]
    fn strict_decoding_rejects_malformed_utf8() {
        assert!(TextEncoding::Utf8.decode(b"Dialogue: \xC3\x28").is_none());
    }

    #[test]
    fn read_missing_file_is_io_error() {
        let err = read_subtitle_file(Path::new("/nonexistent/file.ass")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn labels_follow_candidate_order() {
        let labels: Vec<_> = CANDIDATES.iter().map(|e| e.label()).collect();
        assert_eq!(
            labels,
            [
                "utf-8-sig",
                "utf-8",
                "utf-16",
                "utf-16-le",
                "utf-16-be",
                "gb2312",
                "gbk",
                "gb18030"
            ]
        );
    }
}
