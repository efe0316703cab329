use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

/// Parse `Key: Value` strings into a HeaderMap, skipping malformed entries
pub fn parse_headers(headers: &[String]) -> HeaderMap {
    let mut header_map = HeaderMap::new();
    for header_str in headers {
        let Some((key, value)) = header_str.split_once(':') else {
            tracing::warn!(header = %header_str, "invalid header format, expected 'Key: Value'");
            continue;
        };
        let Ok(header_name) = HeaderName::from_bytes(key.trim().as_bytes()) else {
            tracing::warn!(name = %key, "invalid header name");
            continue;
        };
        match HeaderValue::from_str(value.trim()) {
            Ok(header_value) => {
                header_map.append(header_name, header_value);
            }
            Err(_) => tracing::warn!(name = %key, "invalid header value"),
        }
    }
    header_map
}
