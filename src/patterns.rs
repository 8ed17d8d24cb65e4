//! Link grammar
//!
//! The three top-level link patterns are assembled from small named sub-grammars and compiled once
//! per [`crate::Linker`]. All letter classes are Unicode-aware so that internationalised domains
//! and paths are recognised.
//!
//! - absolute URLs: `scheme:[//][userinfo@](domain|ipv4)[/][path][?query]`
//! - `www.` addresses: `www.domain[/][path][?query]`
//! - email addresses: `local@domain`

use crate::config::FilterSettings;
use crate::policy::SchemePolicy;
use regex::{Regex, RegexBuilder};
use std::fmt;

/// Compiled-program budget. The bounded repetitions over Unicode classes (`{2,64}`, `{1,254}`)
/// expand well past the regex crate's default limit.
const PATTERN_SIZE_LIMIT: usize = 64 * (1 << 20);

/// Characters allowed anywhere in a URL path
const PATH_CHAR: &str = r"[\p{L}\p{M}\p{N}!*';:=+,.$/%#\[\]\-_\~@\&]";

/// Characters a path may end with, so `/foo.` does not swallow the period
const PATH_ENDING_CHAR: &str = r"[\p{L}\p{M}\p{N}:_+\~#=/]";

const QUERY_CHAR: &str = r"[a-zA-Z0-9!?*'@();:\&=+$/%#\[\]\-_.,\~|]";
const QUERY_ENDING_CHAR: &str = r"[a-zA-Z0-9_\&=#/]";

/// Optional labels, then a 2-64 letter top-level label
const DOMAIN: &str = r"(?:[\p{L}\p{M}\p{N}._+\-]+\.)?[\p{L}\p{M}]{2,64}\b";

/// Four dotted digit groups. Ranges are not validated.
const IPV4: &str = r"(?:[0-9]{1,3}\.){3}[0-9]{1,3}";

const USERINFO: &str = r"[\p{L}\p{M}\p{N}:%_+*\~#?\&=.,/;\-]+@";

const EMAIL_LOCAL_PART: &str = r"[\p{L}\p{M}\p{N}._+\-]{1,254}";

/// The kind of link a pattern detects. Declaration order is pass order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LinkKind {
    /// Absolute URL with an allowed scheme
    FullUrl,
    /// Protocol-less `www.` address
    WwwUrl,
    /// Email address
    Email,
}

impl LinkKind {
    pub const ALL: [LinkKind; 3] = [LinkKind::FullUrl, LinkKind::WwwUrl, LinkKind::Email];

    pub fn name(self) -> &'static str {
        match self {
            LinkKind::FullUrl => "full-url",
            LinkKind::WwwUrl => "www",
            LinkKind::Email => "email",
        }
    }

    /// Whether `settings` enables this kind
    pub fn is_enabled(self, settings: &FilterSettings) -> bool {
        match self {
            LinkKind::FullUrl => settings.with_protocol,
            LinkKind::WwwUrl => settings.with_www,
            LinkKind::Email => settings.with_mail,
        }
    }
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors raised while building link patterns
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    /// Absolute links are enabled but there is nothing to match a scheme against
    #[error("protocol links are enabled but the scheme allow-list is empty")]
    EmptySchemeList,

    /// A scheme that cannot appear in a URL
    #[error("invalid URL scheme in allow-list: {0:?}")]
    InvalidScheme(String),

    /// The assembled pattern failed to compile
    #[error("failed to compile {kind} pattern: {source}")]
    Regex {
        kind: LinkKind,
        #[source]
        source: regex::Error,
    },
}

/// A compiled top-level pattern and the link kind it produces
#[derive(Debug, Clone)]
pub struct LinkPattern {
    pub kind: LinkKind,
    pub regex: Regex,
}

fn balanced_parens() -> String {
    format!(r"\({PATH_CHAR}+\)")
}

fn path_ending() -> String {
    format!("(?:{PATH_ENDING_CHAR}|(?:{}))", balanced_parens())
}

/// One path segment: path characters with balanced parentheticals, closed by an ending character,
/// or an `@`-prefixed segment ending in `/` (as in `/@user/`)
fn path_segment() -> String {
    let parens = balanced_parens();
    format!(
        "(?:(?:{PATH_CHAR}*(?:{parens}{PATH_CHAR}*)*{})|(?:@{PATH_CHAR}+/))",
        path_ending()
    )
}

/// Optional path followed by an optional query string
fn trail() -> String {
    format!(
        r"(?:{}*)?(?:\?{QUERY_CHAR}*{QUERY_ENDING_CHAR})?",
        path_segment()
    )
}

/// RFC 3986: `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`
fn is_valid_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        _ => false,
    }
}

/// Scheme alternation, each followed by `:` and an optional `//`.
///
/// `//` is only required for hierarchical schemes, but telling them apart would mean hard-coding
/// names such as `mailto`, so it is optional for all of them.
fn scheme_alternation(schemes: &[&str]) -> Result<String, PatternError> {
    if schemes.is_empty() {
        return Err(PatternError::EmptySchemeList);
    }
    let mut alternatives = Vec::with_capacity(schemes.len());
    for scheme in schemes {
        if !is_valid_scheme(scheme) {
            return Err(PatternError::InvalidScheme((*scheme).to_string()));
        }
        alternatives.push(format!("{}:(?://)?", regex::escape(scheme)));
    }
    Ok(alternatives.join("|"))
}

/// Uncompiled source of the pattern for `kind`
pub fn pattern_source(kind: LinkKind, schemes: &[&str]) -> Result<String, PatternError> {
    let source = match kind {
        LinkKind::FullUrl => format!(
            "(?:{})(?:(?:{USERINFO})?(?:{DOMAIN}|{IPV4})/?(?:{})?)",
            scheme_alternation(schemes)?,
            trail()
        ),
        LinkKind::WwwUrl => format!(r"www\.(?:{DOMAIN})/?(?:{})?", trail()),
        LinkKind::Email => format!("{EMAIL_LOCAL_PART}@(?:{DOMAIN})"),
    };
    Ok(source)
}

fn compile(kind: LinkKind, source: &str) -> Result<Regex, PatternError> {
    RegexBuilder::new(source)
        .size_limit(PATTERN_SIZE_LIMIT)
        .dfa_size_limit(PATTERN_SIZE_LIMIT)
        .build()
        .map_err(|source| PatternError::Regex { kind, source })
}

/// Build the patterns for every enabled link kind, in pass order.
///
/// Kinds that are switched off are omitted entirely. An empty or malformed scheme list is only an
/// error when absolute links are enabled.
pub fn build_patterns<P: SchemePolicy + ?Sized>(
    settings: &FilterSettings,
    policy: &P,
) -> Result<Vec<LinkPattern>, PatternError> {
    let schemes = policy.allowed_schemes();
    let mut patterns = Vec::new();

    for kind in LinkKind::ALL {
        if !kind.is_enabled(settings) {
            continue;
        }
        let source = pattern_source(kind, &schemes)?;
        patterns.push(LinkPattern {
            kind,
            regex: compile(kind, &source)?,
        });
    }

    log::debug!(
        "Built {} link pattern(s): {}",
        patterns.len(),
        patterns.iter().map(|p| p.kind.name()).collect::<Vec<_>>().join(", ")
    );

    Ok(patterns)
}
