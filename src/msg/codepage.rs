//! Codepage encoding utilities for STRING8 properties
//!
//! Legacy MAPI clients store 8-bit strings in a Windows codepage named by
//! the message. This module maps codepage identifiers to `encoding_rs`
//! encoders and performs the actual STRING8 byte conversion.

use crate::msg::error::MsgError;
use encoding_rs::Encoding;

/// Default codepage for STRING8 properties (Windows-1252, Western European)
pub const DEFAULT_CODEPAGE: u16 = 1252;

/// Map a Windows codepage identifier to an `encoding_rs` encoding
///
/// Only codepages with a usable encoder are listed; UTF-16 identifiers are
/// deliberately absent because UTF-16 text travels as PT_UNICODE streams,
/// never through the STRING8 path.
///
/// Returns `None` for unsupported codepages.
pub fn codepage_to_encoding(codepage: u16) -> Option<&'static Encoding> {
    match codepage {
        // Windows codepages (Western scripts)
        874 => Some(encoding_rs::WINDOWS_874),   // Thai
        1250 => Some(encoding_rs::WINDOWS_1250), // Central European
        1251 => Some(encoding_rs::WINDOWS_1251), // Cyrillic
        1252 => Some(encoding_rs::WINDOWS_1252), // Western European (most common)
        1253 => Some(encoding_rs::WINDOWS_1253), // Greek
        1254 => Some(encoding_rs::WINDOWS_1254), // Turkish
        1255 => Some(encoding_rs::WINDOWS_1255), // Hebrew
        1256 => Some(encoding_rs::WINDOWS_1256), // Arabic
        1257 => Some(encoding_rs::WINDOWS_1257), // Baltic
        1258 => Some(encoding_rs::WINDOWS_1258), // Vietnamese

        // East Asian codepages
        932 => Some(encoding_rs::SHIFT_JIS), // Japanese Shift-JIS
        936 => Some(encoding_rs::GBK),       // Simplified Chinese
        949 => Some(encoding_rs::EUC_KR),    // Korean
        950 => Some(encoding_rs::BIG5),      // Traditional Chinese

        // ISO 8859 series
        28592 => Some(encoding_rs::ISO_8859_2),  // Latin 2 (Central European)
        28595 => Some(encoding_rs::ISO_8859_5),  // Cyrillic
        28597 => Some(encoding_rs::ISO_8859_7),  // Greek
        28605 => Some(encoding_rs::ISO_8859_15), // Latin 9 (with Euro)

        // Unicode
        65001 => Some(encoding_rs::UTF_8),

        // Unsupported codepage
        _ => None,
    }
}

/// Encode a string for a STRING8 property, without the trailing NUL
///
/// In lossy mode (the default for MSG output) characters the codepage
/// cannot represent become `?`. In strict mode the conversion fails with
/// [`MsgError::Encoding`] instead.
pub fn encode_string8(
    value: &str,
    codepage: u16,
    strict: bool,
) -> Result<Vec<u8>, MsgError> {
    let encoding = codepage_to_encoding(codepage)
        .ok_or_else(|| MsgError::InvalidInput(format!("unsupported codepage {}", codepage)))?;

    let (bytes, _, had_errors) = encoding.encode(value);
    if !had_errors {
        return Ok(bytes.into_owned());
    }
    if strict {
        return Err(MsgError::Encoding { codepage });
    }

    // Re-encode character by character so unmappable characters become a
    // plain '?' instead of encoding_rs's numeric-reference replacement
    let mut out = Vec::with_capacity(value.len());
    let mut buf = [0u8; 4];
    for ch in value.chars() {
        let piece = ch.encode_utf8(&mut buf);
        let (encoded, _, bad) = encoding.encode(piece);
        if bad {
            out.push(b'?');
        } else {
            out.extend_from_slice(&encoded);
        }
    }
    Ok(out)
}
