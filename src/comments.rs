//! Protect HTML comment bodies from the tag tokenizer.
//!
//! Comments may contain `>` and other tag-like text that would confuse lexical splitting. Each
//! pass therefore:
//! 1. replaces every comment body with an indexed placeholder,
//! 2. tokenizes and links the protected text,
//! 3. puts the original bodies back.

use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;

const PLACEHOLDER_PREFIX: &str = "__AUTOLINK_COMMENT_";
const PLACEHOLDER_SUFFIX: &str = "__";

static COMMENT_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--(.*?)-->").unwrap());

/// Comment bodies removed from the text of the current pass, by placeholder index
#[derive(Debug, Default, Clone)]
pub struct CommentStore {
    bodies: Vec<String>,
}

impl CommentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bodies currently held
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Drop every stored body
    pub fn clear(&mut self) {
        self.bodies.clear();
    }

    /// Replace each comment body in `text` with a placeholder.
    ///
    /// The store is cleared first; bodies from an earlier pass are never carried over.
    pub fn protect<'t>(&mut self, text: &'t str) -> Cow<'t, str> {
        self.clear();
        if !text.contains("<!--") {
            return Cow::Borrowed(text);
        }

        let bodies = &mut self.bodies;
        COMMENT_REGEX.replace_all(text, |caps: &Captures| {
            let index = bodies.len();
            bodies.push(caps[1].to_string());
            format!("<!--{PLACEHOLDER_PREFIX}{index}{PLACEHOLDER_SUFFIX}-->")
        })
    }

    /// Put the original bodies back in place of their placeholders.
    ///
    /// Comments whose body is not a known placeholder are left as they are.
    pub fn restore<'t>(&self, text: &'t str) -> Cow<'t, str> {
        if self.bodies.is_empty() {
            return Cow::Borrowed(text);
        }

        COMMENT_REGEX.replace_all(text, |caps: &Captures| match self.lookup(&caps[1]) {
            Some(body) => format!("<!--{body}-->"),
            None => {
                log::debug!("Leaving unknown comment untouched: {:?}", &caps[0]);
                caps[0].to_string()
            }
        })
    }

    fn lookup(&self, placeholder: &str) -> Option<&str> {
        let index = placeholder
            .strip_prefix(PLACEHOLDER_PREFIX)?
            .strip_suffix(PLACEHOLDER_SUFFIX)?
            .parse::<usize>()
            .ok()?;
        self.bodies.get(index).map(String::as_str)
    }
}
