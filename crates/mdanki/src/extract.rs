//! Card block extraction from raw document text.
//!
//! Two marker syntaxes are recognised, both written as HTML comments so the
//! document still renders cleanly as Markdown:
//!
//! ```text
//! <!-- q: What is borrowing? -->
//! Taking a reference without taking ownership.
//! <!-- /q -->
//!
//! <!-- q:front -->What is a lifetime?<!-- /q:front -->
//! <!-- q:back -->The scope a reference is valid for.<!-- /q:back -->
//! ```
//!
//! The first form ("single block") uses the annotation after `q:` as the
//! front and the body as the back. With an empty annotation the first
//! closing marker separates front from back:
//! `<!--q:-->front<!--/q-->back<!--/q-->`, and a lone `<!--q:-->text<!--/q-->`
//! becomes a front-only (cloze style) block.
//!
//! The second form ("front/back pair") needs a `q:front` block immediately
//! followed by a `q:back` block.
//!
//! [`extract_blocks`] returns every single block in document order followed
//! by every front/back pair in document order. Existing documents rely on
//! that order, so the two runs are never merged by position.

use std::sync::LazyLock;

use regex_lite::{Match, Regex};

static SINGLE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<!--\s*q:").expect("valid opening marker pattern"));

static SINGLE_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<!--\s*/q\s*-->").expect("valid closing marker pattern"));

static FRONT_BACK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?s)<!--\s*q:front\s*-->(.+?)<!--\s*/q:front\s*-->",
        r"\s*",
        r"<!--\s*q:back\s*-->(.+?)<!--\s*/q:back\s*-->",
    ))
    .expect("valid front/back pattern")
});

/// Annotations reserved for the front/back pair syntax.
const RESERVED: [&str; 2] = ["front", "back"];

/// One raw front/back pair as written in the document, trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlock {
    /// Source text of the question side.
    pub front: String,
    /// Source text of the answer side; empty for front-only blocks.
    pub back: String,
}

impl RawBlock {
    /// Create a block, trimming both sides.
    pub fn new(front: &str, back: &str) -> Self {
        Self {
            front: front.trim().to_string(),
            back: back.trim().to_string(),
        }
    }
}

/// Extract every card block from `text`.
///
/// Never fails: unterminated markers are skipped and a document without
/// markers yields an empty list.
pub fn extract_blocks(text: &str) -> Vec<RawBlock> {
    let mut blocks = single_blocks(text);
    blocks.extend(front_back_blocks(text));
    blocks
}

/// All `<!--q:...-->...<!--/q-->` blocks in document order.
pub fn single_blocks(text: &str) -> Vec<RawBlock> {
    let mut blocks = Vec::new();
    let mut cursor = 0;

    while let Some(open) = next_single_opener(text, cursor) {
        match single_block_at(text, open.end()) {
            Some((block, end)) => {
                blocks.push(block);
                cursor = end;
            }
            None => cursor = open.end(),
        }
    }

    blocks
}

/// All `q:front` + `q:back` pairs in document order.
pub fn front_back_blocks(text: &str) -> Vec<RawBlock> {
    FRONT_BACK
        .captures_iter(text)
        .map(|caps| RawBlock::new(&caps[1], &caps[2]))
        .collect()
}

/// Next opener at or after `from` that is not a `q:front`/`q:back` marker.
fn next_single_opener(text: &str, from: usize) -> Option<Match<'_>> {
    let mut cursor = from;
    while let Some(open) = SINGLE_OPEN.find_at(text, cursor) {
        let rest = &text[open.end()..];
        if !RESERVED.iter().any(|word| rest.starts_with(word)) {
            return Some(open);
        }
        cursor = open.end();
    }
    None
}

/// Parse one single block whose annotation starts at `start`.
///
/// Returns the block and the offset just past its final closing marker, or
/// `None` when the block is unterminated.
fn single_block_at(text: &str, start: usize) -> Option<(RawBlock, usize)> {
    let annotation_len = text[start..].find("-->")?;
    let annotation = &text[start..start + annotation_len];
    if SINGLE_OPEN.is_match(annotation) {
        return None;
    }

    let body_start = start + annotation_len + "-->".len();
    let close = SINGLE_CLOSE.find_at(text, body_start)?;
    if next_single_opener(text, body_start).is_some_and(|nested| nested.start() < close.start()) {
        return None;
    }
    let body = &text[body_start..close.start()];

    if !annotation.trim().is_empty() {
        return Some((RawBlock::new(annotation, body), close.end()));
    }

    // Empty annotation: `front<!--/q-->back<!--/q-->`, unless the second
    // closer belongs to a later block.
    if let Some(second) = SINGLE_CLOSE.find_at(text, close.end()) {
        let interrupted = SINGLE_OPEN
            .find_at(text, close.end())
            .is_some_and(|open| open.start() < second.start());
        if !interrupted {
            let back = &text[close.end()..second.start()];
            return Some((RawBlock::new(body, back), second.end()));
        }
    }

    Some((RawBlock::new(body, ""), close.end()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(blocks: &[RawBlock]) -> Vec<(&str, &str)> {
        blocks
            .iter()
            .map(|b| (b.front.as_str(), b.back.as_str()))
            .collect()
    }

    #[test]
    fn test_empty_document() {
        assert!(extract_blocks("").is_empty());
        assert!(extract_blocks("# Title\n\nJust prose.").is_empty());
    }

    #[test]
    fn test_annotated_single_block() {
        let doc = "<!-- q: What is Rust? -->\nA systems language.\n<!-- /q -->";
        assert_eq!(
            pairs(&extract_blocks(doc)),
            vec![("What is Rust?", "A systems language.")]
        );
    }

    #[test]
    fn test_empty_annotation_splits_on_first_closer() {
        let doc = "# Deck1\n<!--q:-->front text<!--/q-->back text<!--/q-->";
        assert_eq!(
            pairs(&extract_blocks(doc)),
            vec![("front text", "back text")]
        );
    }

    #[test]
    fn test_empty_annotation_single_field() {
        let doc = "<!--q:-->X<!--/q-->";
        assert_eq!(pairs(&extract_blocks(doc)), vec![("X", "")]);
    }

    #[test]
    fn test_empty_annotation_does_not_swallow_next_block() {
        let doc = "<!--q:-->{{c1::cloze}}<!--/q-->\n<!--q:Q2-->A2<!--/q-->";
        assert_eq!(
            pairs(&extract_blocks(doc)),
            vec![("{{c1::cloze}}", ""), ("Q2", "A2")]
        );
    }

    #[test]
    fn test_front_back_pair() {
        let doc = "<!--q:front-->A<!--/q:front--><!--q:back-->B<!--/q:back-->";
        assert_eq!(pairs(&extract_blocks(doc)), vec![("A", "B")]);
    }

    #[test]
    fn test_front_back_allows_whitespace_between() {
        let doc = "<!-- q:front -->\nA\n<!-- /q:front -->\n\n<!-- q:back -->\nB\n<!-- /q:back -->";
        assert_eq!(pairs(&extract_blocks(doc)), vec![("A", "B")]);
    }

    #[test]
    fn test_front_without_back_is_skipped() {
        let doc = "<!--q:front-->A<!--/q:front-->\ntext\n<!--q:back-->B<!--/q:back-->";
        assert!(extract_blocks(doc).is_empty());
    }

    #[test]
    fn test_single_blocks_keep_document_order() {
        let doc = "<!--q:1-->a<!--/q-->\n<!--q:2-->b<!--/q-->\n<!--q:3-->c<!--/q-->";
        assert_eq!(
            pairs(&extract_blocks(doc)),
            vec![("1", "a"), ("2", "b"), ("3", "c")]
        );
    }

    #[test]
    fn test_mixed_grammars_are_concatenated_not_interleaved() {
        let doc = concat!(
            "<!--q:front-->F1<!--/q:front--><!--q:back-->B1<!--/q:back-->\n",
            "<!--q:S1-->s1<!--/q-->\n",
            "<!--q:front-->F2<!--/q:front--><!--q:back-->B2<!--/q:back-->\n",
            "<!--q:S2-->s2<!--/q-->\n",
        );
        assert_eq!(
            pairs(&extract_blocks(doc)),
            vec![("S1", "s1"), ("S2", "s2"), ("F1", "B1"), ("F2", "B2")]
        );
    }

    #[test]
    fn test_unterminated_block_is_skipped() {
        let doc = "<!--q:Lost-->no closer here\n<!--q:Kept-->yes<!--/q-->";
        assert_eq!(pairs(&extract_blocks(doc)), vec![("Kept", "yes")]);
    }

    #[test]
    fn test_unterminated_annotation_yields_nothing() {
        assert!(extract_blocks("<!--q:never closed").is_empty());
    }

    #[test]
    fn test_reserved_prefix_is_not_a_single_block() {
        let doc = "<!--q:frontal-->x<!--/q-->";
        assert!(extract_blocks(doc).is_empty());
    }

    #[test]
    fn test_multiline_bodies_are_trimmed() {
        let doc = "<!--q:\n  Question\n-->\n\n  line one\n  line two\n\n<!--/q-->";
        let blocks = extract_blocks(doc);
        assert_eq!(blocks[0].front, "Question");
        assert_eq!(blocks[0].back, "line one\n  line two");
    }

    #[test]
    fn test_repeated_calls_are_independent() {
        let doc = "<!--q:A-->a<!--/q-->";
        assert_eq!(extract_blocks(doc), extract_blocks(doc));
    }
}
