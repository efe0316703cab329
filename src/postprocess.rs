use std::borrow::Cow;

use serde_json::json;

use crate::diagnostics::Diagnostics;
use crate::entities::unescape;

/// Turn the raw bytes captured between `<title>` and the next `<` into text.
///
/// Invalid UTF-8 is reported as a warning and replaced with U+FFFD; it never
/// fails the extraction.
pub fn decode_title<D: Diagnostics + ?Sized>(raw: &[u8], diagnostics: &D) -> String {
    let text = match std::str::from_utf8(raw) {
        Ok(s) => Cow::Borrowed(s),
        Err(err) => {
            diagnostics.warn(
                "not utf8 string",
                Some(json!({ "valid_up_to": err.valid_up_to(), "bytes": raw })),
            );
            String::from_utf8_lossy(raw)
        }
    };
    unescape(&text).into_owned()
}
