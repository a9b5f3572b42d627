//! Query builder for Anki search syntax.
//!
//! # Example
//!
//! ```
//! use mdanki_connect::QueryBuilder;
//!
//! let query = QueryBuilder::new()
//!     .deck("My Deck")
//!     .field_exact("Front", "What is \"Rust\"?")
//!     .build();
//!
//! assert_eq!(query, r#"deck:"My Deck" Front:"What is \"Rust\"?""#);
//! ```

/// A builder for constructing Anki search queries.
#[derive(Debug, Clone, Default)]
#[must_use = "QueryBuilder does nothing until .build() is called"]
pub struct QueryBuilder {
    parts: Vec<String>,
}

impl QueryBuilder {
    /// Create a new empty query builder.
    pub fn new() -> Self {
        Self { parts: Vec::new() }
    }

    /// Restrict to a deck (and its subdecks). The name is matched literally.
    pub fn deck(mut self, name: &str) -> Self {
        self.parts.push(format!("deck:{}", quote_literal(name)));
        self
    }

    /// Match a field whose whole value equals `text`.
    ///
    /// The value is quoted, so spaces and colons are safe, and Anki
    /// wildcards (`*`, `_`) are escaped.
    pub fn field_exact(mut self, field_name: &str, text: &str) -> Self {
        self.parts
            .push(format!("{}:{}", field_name, quote_literal(text)));
        self
    }

    /// Append a raw query fragment.
    pub fn raw(mut self, query: &str) -> Self {
        self.parts.push(query.to_string());
        self
    }

    /// Build the final query string.
    pub fn build(self) -> String {
        self.parts.join(" ")
    }
}

impl std::fmt::Display for QueryBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.parts.join(" "))
    }
}

/// Quote a value so Anki matches it character for character.
fn quote_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if matches!(c, '\\' | '"' | '*' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query() {
        assert_eq!(QueryBuilder::new().build(), "");
    }

    #[test]
    fn test_deck_is_quoted() {
        let q = QueryBuilder::new().deck("Japanese").build();
        assert_eq!(q, "deck:\"Japanese\"");

        let q = QueryBuilder::new().deck("Languages::Italian").build();
        assert_eq!(q, "deck:\"Languages::Italian\"");
    }

    #[test]
    fn test_field_exact_escapes_quotes() {
        let q = QueryBuilder::new().field_exact("Front", "say \"hi\"").build();
        assert_eq!(q, r#"Front:"say \"hi\"""#);
    }

    #[test]
    fn test_field_exact_escapes_wildcards() {
        let q = QueryBuilder::new().field_exact("Front", "a_b*c").build();
        assert_eq!(q, r#"Front:"a\_b\*c""#);
    }

    #[test]
    fn test_combined() {
        let q = QueryBuilder::new()
            .deck("Deck1")
            .field_exact("Front", "<b>Q</b>")
            .build();
        assert_eq!(q, "deck:\"Deck1\" Front:\"<b>Q</b>\"");
    }

    #[test]
    fn test_raw_and_display() {
        let q = QueryBuilder::new().deck("Test").raw("is:new");
        assert_eq!(format!("{}", q), "deck:\"Test\" is:new");
    }
}
