//! Small text helpers used by the directory listing.

/// Render a byte count with a comma between every group of three digits,
/// counted from the least significant digit.
pub fn format_size(size: u64) -> String {
    let digits = size.to_string();
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);

    for (pos, digit) in digits.chars().enumerate() {
        if pos != 0 && (len - pos) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }

    out
}

/// Turn a URL path into breadcrumb navigation.
///
/// Starts with a fixed `<root>` anchor pointing at `/`, followed by one anchor
/// per non-empty segment, each linking to the cumulative prefix ending in `/`.
///
/// Segments are embedded verbatim. The caller is expected to pass a path the
/// server has already resolved; names containing markup are not neutralised.
pub fn path_links(path: &str) -> String {
    let mut links = String::from("<a href=\"/\">&lt;root&gt;</a>");
    let mut current = String::from("/");

    for segment in path.split('/').filter(|s| !s.is_empty()) {
        current.push_str(segment);
        current.push('/');
        links.push_str("/<a href=\"");
        links.push_str(&current);
        links.push_str("\">");
        links.push_str(segment);
        links.push_str("</a>");
    }

    links
}
