//! Tracking of elements whose content is never linked
//!
//! Text inside `a`, `script`, `style`, `code` and `pre` is left alone. The tracker has a single
//! slot: once an ignore element is open, only its own closing tag leaves ignore mode, and any other
//! ignore tag seen in between is not tracked separately. So in `<pre><code>x</code> y</pre>` the
//! text `y` is still ignored, and in `<code><pre>x</pre> y</code>` so is `y`.

use crate::tokenizer::Chunk;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static IGNORE_OPEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(a|script|style|code|pre)(?:\s|>)").unwrap());

static IGNORE_CLOSE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</(a|script|style|code|pre)>").unwrap());

/// Elements whose text content is never scanned for links
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IgnoreTag {
    A,
    Script,
    Style,
    Code,
    Pre,
}

impl IgnoreTag {
    pub const ALL: [IgnoreTag; 5] = [
        IgnoreTag::A,
        IgnoreTag::Script,
        IgnoreTag::Style,
        IgnoreTag::Code,
        IgnoreTag::Pre,
    ];

    /// Lowercase element name
    pub fn name(self) -> &'static str {
        match self {
            IgnoreTag::A => "a",
            IgnoreTag::Script => "script",
            IgnoreTag::Style => "style",
            IgnoreTag::Code => "code",
            IgnoreTag::Pre => "pre",
        }
    }

    /// Look up an element name, ignoring ASCII case
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tag| tag.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for IgnoreTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IgnoreState {
    #[default]
    Outside,
    Inside(IgnoreTag),
}

/// Left-to-right state machine over a chunk sequence
#[derive(Debug, Clone, Default)]
pub struct IgnoreTracker {
    state: IgnoreState,
}

impl IgnoreTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> IgnoreState {
        self.state
    }

    pub fn is_outside(&self) -> bool {
        self.state == IgnoreState::Outside
    }

    /// Feed one markup chunk to the tracker
    pub fn observe_markup(&mut self, markup: &str) {
        match self.state {
            IgnoreState::Outside => {
                if let Some(tag) = opened_ignore_tag(markup) {
                    log::trace!("Entering ignored <{tag}> region");
                    self.state = IgnoreState::Inside(tag);
                }
            }
            IgnoreState::Inside(open) => {
                if closes(markup, open) {
                    log::trace!("Leaving ignored <{open}> region");
                    self.state = IgnoreState::Outside;
                }
            }
        }
    }

    /// Visit the next chunk, returning `true` when it is text that may be linked
    pub fn visit(&mut self, chunk: &Chunk<'_>) -> bool {
        match chunk {
            Chunk::Text(_) => self.is_outside(),
            Chunk::Markup(markup) => {
                self.observe_markup(markup);
                false
            }
        }
    }
}

fn opened_ignore_tag(markup: &str) -> Option<IgnoreTag> {
    IGNORE_OPEN_REGEX
        .captures(markup)
        .and_then(|caps| IgnoreTag::from_name(&caps[1]))
}

fn closes(markup: &str, open: IgnoreTag) -> bool {
    IGNORE_CLOSE_REGEX
        .captures_iter(markup)
        .any(|caps| caps[1].eq_ignore_ascii_case(open.name()))
}
