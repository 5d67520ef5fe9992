use regex::Regex;
use std::sync::LazyLock;
use url::Url;
use uuid::Uuid;

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\W+").expect("non-word pattern should be valid"));

/// Whether a string is an absolute URL with both a scheme and a host
pub fn is_valid_url(value: &str) -> bool {
    match Url::parse(value) {
        Ok(url) => !url.scheme().is_empty() && url.host_str().is_some_and(|h| !h.is_empty()),
        Err(_) => false,
    }
}

/// Longest sanitized alt kept in a filename, in bytes
const MAX_ALT_LEN: usize = 100;

/// Strip every non-word character from alt text and cap its length
pub fn sanitize_alt(alt: &str) -> String {
    let mut name = NON_WORD.replace_all(alt, "").into_owned();
    if name.len() > MAX_ALT_LEN {
        let end = (0..=MAX_ALT_LEN)
            .rev()
            .find(|&i| name.is_char_boundary(i))
            .unwrap_or(0);
        name.truncate(end);
    }
    name
}

/// Build `<sanitized-alt><uuid>.<ext>`, unique even when alt text repeats or is empty
pub fn unique_filename(alt: &str, extension: &str) -> String {
    format!("{}{}.{}", sanitize_alt(alt), Uuid::new_v4(), extension)
}

/// Convert a class name (or space separated class list) to a CSS selector
pub fn class_selector(class_name: &str) -> String {
    class_name
        .split_whitespace()
        .map(|class| format!(".{}", class))
        .collect::<String>()
}
