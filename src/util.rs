//! Byte decoding for export files.

use std::borrow::Cow;

/// Decode an export file to a string.
///
/// 1. A byte order mark wins (UTF-8 or UTF-16, via encoding_rs)
/// 2. Valid UTF-8 is taken as is
/// 3. Otherwise the encoding named in the XML declaration, if known
/// 4. Windows-1252 as the last resort (old WordPress installs)
///
/// The BOM is stripped from the result.
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    if let Some((encoding, _)) = encoding_rs::Encoding::for_bom(bytes) {
        let (result, _, malformed) = encoding.decode(bytes);
        if malformed {
            log::warn!("export contains malformed {} sequences", encoding.name());
        }
        return result;
    }

    let (result, _, malformed) = encoding_rs::UTF_8.decode(bytes);
    if !malformed {
        return result;
    }

    if let Some(name) = extract_xml_encoding(bytes)
        && let Some(encoding) = encoding_rs::Encoding::for_label(name.as_bytes())
    {
        log::debug!("decoding export as {}", encoding.name());
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    log::debug!("export is not valid UTF-8, decoding as windows-1252");
    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Extract the encoding name from an `<?xml ... encoding="..." ?>`
/// declaration at the start of `bytes`.
fn extract_xml_encoding(bytes: &[u8]) -> Option<&str> {
    // Only check the first 100 bytes for the XML declaration
    let prefix = &bytes[..bytes.len().min(100)];

    let xml_start = prefix.windows(5).position(|w| w == b"<?xml")?;
    let after_xml = &prefix[xml_start..];

    let enc_pos = after_xml
        .windows(9)
        .position(|w| w.eq_ignore_ascii_case(b"encoding="))?;
    let after_enc = &after_xml[enc_pos + 9..];

    let quote = *after_enc.first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    let len = memchr::memchr(quote, &after_enc[1..])?;
    std::str::from_utf8(&after_enc[1..1 + len]).ok()
}
