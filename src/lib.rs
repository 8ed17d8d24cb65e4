//! Turn bare URLs, `www.` addresses and email addresses in HTML fragments into links.
//!
//! Existing markup, attribute values, comments and the content of `a`, `script`, `style`, `code`
//! and `pre` elements are left untouched. The input is split lexically, so fragments do not need to
//! be well-formed HTML.
//!
//! ```
//! use autolinker_lib::{Linker, config::FilterSettings, policy::SchemeList};
//!
//! let linker = Linker::new(&FilterSettings::default(), &SchemeList::default()).unwrap();
//! assert_eq!(
//!     linker.linkify("Contact me@example.com now"),
//!     "Contact <a href=\"mailto:me@example.com\">me@example.com</a> now"
//! );
//! ```

pub mod comments;
pub mod config;
pub mod exit_codes;
pub mod ignore_tracker;
pub mod linker;
pub mod patterns;
pub mod policy;
pub mod replacer;
pub mod tokenizer;

pub use crate::config::{Config, ConfigError, FilterSettings};
pub use crate::linker::Linker;
pub use crate::patterns::{LinkKind, PatternError};
pub use crate::policy::{SchemeList, SchemePolicy};

/// Link `input` with a filter built from `config`.
///
/// Builds the patterns on every call; keep a [`Linker`] around when filtering many fragments.
pub fn linkify(input: &str, config: &Config) -> Result<String, PatternError> {
    Ok(Linker::from_config(config)?.linkify(input))
}
