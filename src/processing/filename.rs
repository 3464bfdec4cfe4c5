//! Output filename and Content-Disposition generation

/// Make a caller-supplied value safe inside a filename.
///
/// Spaces become underscores; commas, path separators, quotes and control
/// characters are dropped.
pub fn sanitize_component(value: &str) -> String {
    value
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('_'),
            ',' | '/' | '\\' | '"' | ':' | '*' | '?' | '<' | '>' | '|' => None,
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect()
}

/// `<prefix>_<sanitized seller name>_<unix timestamp>.docx`
pub fn output_filename(prefix: &str, seller_name: &str, unix_timestamp: i64) -> String {
    format!(
        "{}_{}_{}.docx",
        prefix,
        sanitize_component(seller_name),
        unix_timestamp
    )
}

/// Attachment disposition header value. Non-ASCII names get an RFC 5987
/// `filename*` parameter next to an ASCII fallback.
pub fn content_disposition(filename: &str) -> String {
    if filename.is_ascii() {
        return format!("attachment; filename=\"{}\"", filename);
    }

    let fallback: String = filename.chars().filter(char::is_ascii).collect();
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        urlencoding::encode(filename)
    )
}
