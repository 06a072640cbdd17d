//! Cleanup of raw model output.

use regex::Regex;
use std::sync::LazyLock;

static OPTION_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\*Option \d+.*?\*:").expect("Valid option header regex"));
static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("Valid bold regex"));
static IMAGE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*Image:.*$").expect("Valid image label regex"));
static CAPTION_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*Caption:.*$").expect("Valid caption label regex"));
static BLANK_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("Valid blank line regex"));

/// Strip generation artifacts from model output.
///
/// Removes `*Option N…*:` headers, unwraps `**bold**` markers, drops
/// `Image:` and `Caption:` label lines, collapses runs of three or more
/// newlines into a single blank line and trims the result.
///
/// Applying it to already-clean text is a no-op.
///
/// # Example
///
/// ```
/// use postmill_models::sanitize;
///
/// let raw = "*Option 1 (short)*: **Ship it** 🚀\n\n\n\nImage: a rocket\n#Rust";
/// assert_eq!(sanitize(raw), "Ship it 🚀\n\n#Rust");
/// ```
pub fn sanitize(raw: &str) -> String {
    let mut text = clean_pass(raw);
    // Unwrapping bold can expose an option header. Every changing pass
    // shortens the text.
    loop {
        let next = clean_pass(&text);
        if next == text {
            return text;
        }
        text = next;
    }
}

fn clean_pass(raw: &str) -> String {
    let text = BOLD.replace_all(raw, "$1");
    let text = OPTION_HEADER.replace_all(&text, "");
    let text = IMAGE_LINE.replace_all(&text, "");
    let text = CAPTION_LINE.replace_all(&text, "");
    let text = BLANK_RUN.replace_all(&text, "\n\n");
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removes_option_headers_and_bold() {
        let raw = "*Option 1: Bold and direct*: **Hiring** a co-founder!";
        assert_eq!(sanitize(raw), "Hiring a co-founder!");
    }

    #[test]
    fn test_drops_label_lines() {
        let raw = "Great day for Rust.\nImage: a crab at a desk\n  Caption: crab\n#rustlang";
        assert_eq!(sanitize(raw), "Great day for Rust.\n\n#rustlang");
    }

    #[test]
    fn test_collapses_blank_runs() {
        assert_eq!(sanitize("a\n\n\n\n\nb"), "a\n\nb");
        assert_eq!(sanitize("a\n\nb"), "a\n\nb");
    }

    #[test]
    fn test_idempotent_on_clean_text() {
        let clean = "🚀 Shipping a new AI tool today.\n\nWant to build with me? DM me!\n\n#AI #Rust";
        assert_eq!(sanitize(clean), clean);
        let once = sanitize("**Bold** start\n\n\n\nImage: x\nend *Option 2*:");
        assert_eq!(sanitize(&once), once);
    }

    #[test]
    fn test_bold_inside_option_header() {
        let raw = "*Option **1** x*: hi";
        assert_eq!(sanitize(raw), "hi");
        assert_eq!(sanitize(&sanitize(raw)), "hi");

        let nested = "****Option 1*: Bold****: launch";
        let once = sanitize(nested);
        assert_eq!(sanitize(&once), once);
    }

    #[test]
    fn test_whitespace_only_becomes_empty() {
        assert!(sanitize("  \n\n\n  ").is_empty());
        assert!(sanitize("Image: just a picture").is_empty());
    }
}
