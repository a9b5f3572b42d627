//! Rendering raw card text to the HTML stored in Anki.

use pulldown_cmark::{Options, Parser, html};

use crate::card::Card;
use crate::extract::RawBlock;

/// Turns a snippet of document source into display text.
///
/// Implementations must be pure: the same input always renders the same way.
pub trait Renderer {
    /// Render one snippet.
    fn render(&self, snippet: &str) -> String;
}

impl<F> Renderer for F
where
    F: Fn(&str) -> String,
{
    fn render(&self, snippet: &str) -> String {
        self(snippet)
    }
}

/// CommonMark renderer backed by pulldown-cmark.
///
/// A snippet that renders to a single paragraph loses its `<p>` wrapper,
/// which keeps short answers tidy on the card.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn render(&self, snippet: &str) -> String {
        markdown_to_html(snippet)
    }
}

/// Convert Markdown to HTML.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);

    let parser = Parser::new_ext(markdown, options);

    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    let html_output = html_output.trim();

    if let Some(inner) = html_output
        .strip_prefix("<p>")
        .and_then(|rest| rest.strip_suffix("</p>"))
    {
        if !inner.contains("<p>") {
            return inner.to_string();
        }
    }

    html_output.to_string()
}

/// Render raw blocks into cards.
///
/// Cards whose rendered question is blank are dropped; a blank answer is
/// kept (cloze cards have none).
pub fn render_cards<R: Renderer + ?Sized>(blocks: &[RawBlock], renderer: &R) -> Vec<Card> {
    blocks
        .iter()
        .filter_map(|block| {
            let question = renderer.render(&block.front);
            if question.trim().is_empty() {
                return None;
            }
            let answer = if block.back.is_empty() {
                String::new()
            } else {
                renderer.render(&block.back)
            };
            Some(Card::new(question, answer))
        })
        .collect()
}
