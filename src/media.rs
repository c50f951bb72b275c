//! Inline image payload handling.
//!
//! Callers send either a browser-style data URL (`data:image/png;base64,…`)
//! or a bare base64 string. The payload is passed through to the model as
//! inline data; only enough of it is decoded to sniff the actual MIME type,
//! with the data URL's declared type as fallback and JPEG as the default.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// Base64 image bytes plus their MIME type, ready for inline model upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: String,
}

/// Number of base64 characters decoded for magic-number sniffing. 48 bytes
/// of image header is enough for every `infer` image matcher.
const SNIFF_CHARS: usize = 64;

pub fn decode_payload(payload: &str) -> InlineImage {
    let (declared, data) = split_data_url(payload.trim());

    let mime_type = sniff_mime(data)
        .or_else(|| declared.map(str::to_string))
        .unwrap_or_else(|| mime::IMAGE_JPEG.as_ref().to_string());

    InlineImage {
        mime_type,
        data: data.to_string(),
    }
}

/// Split `data:<mime>;base64,<payload>` into declared MIME and payload.
/// Anything that is not a data URL is treated as a bare payload.
fn split_data_url(payload: &str) -> (Option<&str>, &str) {
    let Some(rest) = payload.strip_prefix("data:") else {
        return (None, payload);
    };
    let Some((header, data)) = rest.split_once(',') else {
        return (None, payload);
    };

    let declared = header.split(';').next().filter(|mime| !mime.is_empty());
    (declared, data)
}

/// Decode a short prefix of the payload and sniff the image type from its
/// magic numbers. Returns `None` for undecodable or non-image content.
fn sniff_mime(data: &str) -> Option<String> {
    let head_len = data.len().min(SNIFF_CHARS);
    let head = data.get(..head_len - head_len % 4)?;
    let bytes = STANDARD.decode(head).ok()?;

    infer::get(&bytes)
        .filter(|kind| kind.matcher_type() == infer::MatcherType::Image)
        .map(|kind| kind.mime_type().to_string())
}
