use once_cell::sync::Lazy;
use regex::Regex;

use super::ContactInfo;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap());

static PHONE_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"\+1[-.\s]?\d{3}[-.\s]?\d{3}[-.\s]?\d{4}\b").unwrap(),
        Regex::new(r"\(\d{3}\)\s*\d{3}[-.]?\d{4}\b").unwrap(),
        Regex::new(r"\b\d{3}[-.]?\d{3}[-.]?\d{4}\b").unwrap(),
    ]
});

static NAME_NOISE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());

/// Headers longer than this are treated as a title line, not a name.
const MAX_NAME_WORDS: usize = 4;

pub fn extract_contact_info(text: &str) -> ContactInfo {
    ContactInfo {
        name: guess_name(text),
        email: EMAIL_RE.find(text).map(|m| m.as_str().to_string()),
        phone: PHONE_RES
            .iter()
            .find_map(|re| re.find(text))
            .map(|m| m.as_str().to_string()),
    }
}

/// The first non-empty line, stripped of punctuation, if it is short enough to be a name.
fn guess_name(text: &str) -> Option<String> {
    let first_line = text.lines().map(str::trim).find(|l| !l.is_empty())?;
    let cleaned = NAME_NOISE_RE.replace_all(first_line, " ");
    let words: Vec<&str> = cleaned.split_whitespace().collect();

    if words.is_empty() || words.len() > MAX_NAME_WORDS {
        return None;
    }
    if words.iter().all(|w| w.chars().all(|c| c.is_ascii_digit())) {
        return None;
    }
    Some(words.join(" "))
}
