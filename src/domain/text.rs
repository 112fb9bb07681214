use lazy_static::lazy_static;
use regex::Regex;
use unicode_width::UnicodeWidthChar;

lazy_static! {
    static ref URL_PATTERN: Regex = Regex::new(r"https?://[^\s<>\x22]+[^\s<>\x22.,;:!?)\]]")
        .expect("url pattern is valid");
}

/// Hard-wrap `s` so that no line exceeds `width` terminal columns
pub fn wrap_text(s: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }

    let mut wrapped = String::with_capacity(s.len());
    let mut line_width = 0;
    for c in s.chars() {
        if c == '\n' {
            wrapped.push(c);
            line_width = 0;
            continue;
        }

        let w = c.width().unwrap_or(0);
        if line_width + w > width && line_width > 0 {
            wrapped.push('\n');
            line_width = 0;
        }
        wrapped.push(c);
        line_width += w;
    }
    wrapped
}

pub fn truncate_text(s: &str, max_height: usize) -> String {
    if max_height == 0 {
        return String::new();
    }

    let lines: Vec<&str> = s.lines().collect();
    if lines.len() > max_height {
        if max_height == 1 {
            String::from("...")
        } else {
            format!("{}\n...", lines[..max_height - 1].join("\n"))
        }
    } else {
        s.to_string()
    }
}

/// URLs in order of appearance
pub fn find_urls(s: &str) -> Vec<String> {
    URL_PATTERN
        .find_iter(s)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Length as counted against the post size limit
pub fn char_count(s: &str) -> usize {
    s.chars().count()
}

pub fn shorten_did(did: &str) -> String {
    match did.strip_prefix("did:plc:") {
        Some(id) if id.len() > 10 => format!("{}:{}", &id[0..5], &id[id.len() - 5..]),
        _ => did.to_string(),
    }
}
