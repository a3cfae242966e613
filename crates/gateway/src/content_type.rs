//! # Response content types
//!
//! Inline serving guesses an image type from the object name; downloads trust
//! whatever the upstream declared.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Fallback for inline serving when the name does not look like an image.
pub const DEFAULT_IMAGE_TYPE: &str = "image/png";
/// Fallback for downloads when the upstream sent no content type.
pub const DEFAULT_DOWNLOAD_TYPE: &str = "application/octet-stream";

/// RFC 5987 `attr-char`: everything else in `filename*` is percent-encoded.
const ATTR_CHAR: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

/// Content type for serving `name` inline: the guessed `image/*` type, or
/// [`DEFAULT_IMAGE_TYPE`] when the guess fails or is not an image.
pub fn inline_image_type(name: &str) -> String {
    mime_guess::from_path(name)
        .iter()
        .find(|mime| mime.type_() == mime_guess::mime::IMAGE)
        .map(|mime| mime.essence_str().to_string())
        .unwrap_or_else(|| DEFAULT_IMAGE_TYPE.to_string())
}

/// Content type for a download: the upstream's, or [`DEFAULT_DOWNLOAD_TYPE`].
pub fn download_type(upstream: Option<&str>) -> String {
    upstream
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_DOWNLOAD_TYPE)
        .to_string()
}

/// `Content-Disposition` value offering `name` as the download filename.
///
/// Plain ASCII names are sent quoted. Anything else gets an ASCII fallback
/// plus an RFC 5987 `filename*` with the exact UTF-8 name.
pub fn attachment_disposition(name: &str) -> String {
    let is_plain = name
        .chars()
        .all(|c| c.is_ascii() && !c.is_ascii_control() && c != '"' && c != '\\');

    if is_plain {
        return format!("attachment; filename=\"{name}\"");
    }

    let fallback: String = name
        .chars()
        .map(|c| {
            if c.is_ascii() && !c.is_ascii_control() && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();

    format!(
        "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
        utf8_percent_encode(name, ATTR_CHAR)
    )
}
