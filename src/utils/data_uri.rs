//! Data URI construction for client-side downloads

/// Characters `encodeURIComponent` leaves alone that `urlencoding` escapes
const MARKS: [(&str, &str); 5] = [
    ("%21", "!"),
    ("%27", "'"),
    ("%28", "("),
    ("%29", ")"),
    ("%2A", "*"),
];

/// Percent-encode text the way the browser's `encodeURIComponent` does.
///
/// Every `%` in the `urlencoding` output starts an escape triplet, so the
/// mark replacements below can never match across two escapes.
pub fn encode_uri_component(text: &str) -> String {
    let mut encoded = urlencoding::encode(text).into_owned();
    for (escaped, mark) in MARKS {
        if encoded.contains(escaped) {
            encoded = encoded.replace(escaped, mark);
        }
    }
    encoded
}

/// Build the `data:` URI handed to the download anchor.
///
/// The separator after the media type is `", "`, which existing pages rely
/// on; browsers trim the media type so the URI stays valid.
pub fn build_data_uri(mime_type: &str, payload: &str) -> String {
    format!("data:{}, {}", mime_type, encode_uri_component(payload))
}
