//! Lexical splitting of HTML into text and markup chunks
//!
//! This is a pattern-based split on `<...>`, not an HTML parser. Malformed markup is tolerated:
//! whatever the tag pattern matches becomes markup, everything else is text.

use regex::Regex;
use std::sync::LazyLock;

static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<.+?>").unwrap());

/// A run of text, or a single tag delimiter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chunk<'a> {
    Text(&'a str),
    Markup(&'a str),
}

impl<'a> Chunk<'a> {
    pub fn as_str(&self) -> &'a str {
        match self {
            Chunk::Text(s) | Chunk::Markup(s) => s,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Chunk::Text(_))
    }

    pub fn is_markup(&self) -> bool {
        matches!(self, Chunk::Markup(_))
    }
}

/// Split `text` into alternating chunks.
///
/// The result always starts and ends with a `Text` chunk, which is empty when the input starts or
/// ends with markup, so kinds strictly alternate.
pub fn tokenize(text: &str) -> Vec<Chunk<'_>> {
    let mut chunks = Vec::new();
    let mut last = 0;

    for tag in TAG_REGEX.find_iter(text) {
        chunks.push(Chunk::Text(&text[last..tag.start()]));
        chunks.push(Chunk::Markup(tag.as_str()));
        last = tag.end();
    }
    chunks.push(Chunk::Text(&text[last..]));

    chunks
}

/// Join chunks back into a single string
pub fn reassemble<I>(chunks: I) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    chunks.into_iter().fold(String::new(), |mut out, chunk| {
        out.push_str(chunk.as_ref());
        out
    })
}

/// Check that a chunk sequence starts and ends with text and alternates in between
pub fn is_well_formed(chunks: &[Chunk<'_>]) -> bool {
    if chunks.is_empty() || !chunks[0].is_text() || !chunks[chunks.len() - 1].is_text() {
        return false;
    }
    chunks.windows(2).all(|pair| pair[0].is_text() != pair[1].is_text())
}

impl AsRef<str> for Chunk<'_> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
