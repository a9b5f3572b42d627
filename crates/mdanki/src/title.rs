//! Deck name from the document's top-level heading.

use std::sync::LazyLock;

use regex_lite::Regex;
use tracing::error;

use crate::error::{Error, Result};

static H1: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[ \t]+(\S.*)$").expect("valid heading pattern"));

/// Opening or closing line of a fenced code block: the fence character and
/// its run length.
fn fence(line: &str) -> Option<(char, usize)> {
    let trimmed = line.trim_start_matches(' ');
    if line.len() - trimmed.len() > 3 {
        return None;
    }
    let marker = trimmed.chars().next().filter(|c| matches!(c, '`' | '~'))?;
    let run = trimmed.chars().take_while(|&c| c == marker).count();
    (run >= 3).then_some((marker, run))
}

/// Find the first `# Heading` line outside fenced code blocks and return
/// its trimmed text.
pub fn find_title(text: &str) -> Option<String> {
    let mut open: Option<(char, usize)> = None;
    for line in text.lines() {
        match (open, fence(line)) {
            (None, Some(opened)) => open = Some(opened),
            (Some((marker, run)), Some((closing, len)))
                if closing == marker
                    && len >= run
                    && line.trim().chars().all(|c| c == marker) =>
            {
                open = None
            }
            (Some(_), _) => {}
            (None, None) => {
                if let Some(caps) = H1.captures(line) {
                    let title = caps[1].trim();
                    if !title.is_empty() {
                        return Some(title.to_string());
                    }
                }
            }
        }
    }
    None
}

/// Resolve the deck name of a document.
///
/// Without a heading this fails with [`Error::MissingTitle`] unless
/// `use_default` is set, in which case `Ok(None)` tells the caller to use its
/// default deck.
pub fn resolve_title(text: &str, use_default: bool) -> Result<Option<String>> {
    match find_title(text) {
        Some(title) => Ok(Some(title)),
        None if use_default => Ok(None),
        None => {
            error!("could not find a level-1 heading in the document");
            Err(Error::MissingTitle)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_heading_wins() {
        let doc = "intro\n# Rust Basics  \n\n# Second";
        assert_eq!(find_title(doc).as_deref(), Some("Rust Basics"));
    }

    #[test]
    fn test_deeper_headings_are_ignored() {
        assert_eq!(find_title("## Sub\n### Deeper"), None);
        assert_eq!(find_title("## Sub\n# Top").as_deref(), Some("Top"));
    }

    #[test]
    fn test_hash_without_space_is_not_a_heading() {
        assert_eq!(find_title("#hashtag"), None);
    }

    #[test]
    fn test_crlf_line_endings() {
        assert_eq!(find_title("# Deck\r\nbody").as_deref(), Some("Deck"));
    }

    #[test]
    fn test_headings_inside_code_fences_are_skipped() {
        let doc = "```sh\n# install\ncargo add mdanki\n```\n\n# Real Title\n";
        assert_eq!(find_title(doc).as_deref(), Some("Real Title"));

        let doc = "~~~~\n# a\n~~~\n# still code\n~~~~\n# Deck";
        assert_eq!(find_title(doc).as_deref(), Some("Deck"));
    }

    #[test]
    fn test_unclosed_fence_hides_the_rest() {
        assert_eq!(find_title("```\n# comment"), None);
    }

    #[test]
    fn test_missing_title_policy() {
        assert!(matches!(resolve_title("no heading", false), Err(Error::MissingTitle)));
        assert_eq!(resolve_title("no heading", true).unwrap(), None);
        assert_eq!(
            resolve_title("# Deck1", false).unwrap().as_deref(),
            Some("Deck1")
        );
    }
}
