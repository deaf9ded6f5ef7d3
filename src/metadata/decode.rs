//! Text decoding for tool output.
//!
//! The tag tools print whatever the console code page happens to be, so
//! their stdout is not reliably UTF-8. [`DecodeStrategy::Auto`] sniffs a BOM,
//! then tries strict UTF-8, then asks `chardetng` for the most likely legacy
//! encoding. Guessing is heuristic; short outputs of plain ASCII always come
//! out right, long Latin-1 or Shift_JIS outputs almost always do.
//!
//! The inspector prints the `©` of atom names as the raw byte 0xA9. A
//! single-byte guess that does not map 0xA9 to `©` (ISO-8859-2, KOI8-R, ...)
//! is replaced with windows-1252 so atom names stay intact.

use std::borrow::Cow;

use encoding_rs::{Encoding, WINDOWS_1252};
use serde::{Deserialize, Serialize};

/// How raw tool output is turned into text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodeStrategy {
    /// BOM, then UTF-8, then a detected encoding
    #[default]
    Auto,
    /// UTF-8 with replacement characters for invalid bytes
    Utf8,
}

/// Decode `bytes` according to `strategy`. Never fails; malformed input is
/// replaced with U+FFFD.
pub fn decode(bytes: &[u8], strategy: DecodeStrategy) -> Cow<'_, str> {
    match strategy {
        DecodeStrategy::Utf8 => String::from_utf8_lossy(bytes),
        DecodeStrategy::Auto => decode_auto(bytes),
    }
}

fn decode_auto(bytes: &[u8]) -> Cow<'_, str> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return text;
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return Cow::Borrowed(text);
    }

    let encoding = detect(bytes);
    tracing::debug!("Tool output is not UTF-8, decoding as {}", encoding.name());
    let (text, _) = encoding.decode_without_bom_handling(bytes);
    text
}

/// Byte the inspector writes for the `©` prefix of atom names.
const COPYRIGHT_BYTE: u8 = 0xA9;

/// Best guess at the encoding of `bytes`.
pub fn detect(bytes: &[u8]) -> &'static Encoding {
    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(bytes, true);
    let guess = detector.guess(None, true);

    if guess.is_single_byte()
        && bytes.contains(&COPYRIGHT_BYTE)
        && !decodes_copyright_sign(guess)
    {
        tracing::debug!(
            "Detected {} would mangle atom names, using {}",
            guess.name(),
            WINDOWS_1252.name()
        );
        return WINDOWS_1252;
    }
    guess
}

fn decodes_copyright_sign(encoding: &'static Encoding) -> bool {
    let (text, _) = encoding.decode_without_bom_handling(&[COPYRIGHT_BYTE]);
    text == "\u{a9}"
}
