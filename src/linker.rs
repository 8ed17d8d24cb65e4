//! Pass orchestration
//!
//! One pass per enabled link kind, in the fixed order absolute URLs, `www.` addresses, email
//! addresses. Every pass protects comments, re-tokenizes the previous pass's output, links the
//! eligible text chunks, reassembles and restores comments. Anchors inserted by an earlier pass are
//! therefore plain markup (and an ignored `<a>` region) to every later pass.

use crate::comments::CommentStore;
use crate::config::{Config, FilterSettings};
use crate::ignore_tracker::IgnoreTracker;
use crate::patterns::{LinkKind, LinkPattern, PatternError, build_patterns};
use crate::policy::SchemePolicy;
use crate::replacer::{DisplayOptions, LinkReplacer};
use crate::tokenizer::{reassemble, tokenize};
use std::borrow::Cow;

/// Scratch state for one `linkify` call. Never shared between calls.
struct PassContext<'a> {
    comments: CommentStore,
    display: DisplayOptions<'a>,
    links: usize,
}

impl<'a> PassContext<'a> {
    fn new(settings: &'a FilterSettings) -> Self {
        Self {
            comments: CommentStore::new(),
            display: DisplayOptions {
                max_length: settings.max_display_length,
                ellipsis: &settings.ellipsis,
            },
            links: 0,
        }
    }
}

/// Compiled link filter.
///
/// Immutable once built, so a single `Linker` can serve many inputs, including from several
/// threads at once.
#[derive(Debug, Clone)]
pub struct Linker {
    settings: FilterSettings,
    schemes: Vec<String>,
    patterns: Vec<LinkPattern>,
}

impl Linker {
    /// Build a filter for `settings`, taking absolute-link schemes from `policy`
    pub fn new<P: SchemePolicy + ?Sized>(settings: &FilterSettings, policy: &P) -> Result<Self, PatternError> {
        Ok(Self {
            settings: settings.clone(),
            schemes: policy.allowed_schemes().into_iter().map(str::to_string).collect(),
            patterns: build_patterns(settings, policy)?,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, PatternError> {
        Self::new(&config.filter, &config.policy)
    }

    pub fn settings(&self) -> &FilterSettings {
        &self.settings
    }

    /// Link kinds this filter runs, in pass order
    pub fn passes(&self) -> impl Iterator<Item = LinkKind> + '_ {
        self.patterns.iter().map(|p| p.kind)
    }

    /// Link every URL, `www.` address and email address outside markup and ignored elements
    pub fn linkify(&self, input: &str) -> String {
        let mut ctx = PassContext::new(&self.settings);
        let mut text = input.to_string();

        for pattern in &self.patterns {
            text = self.run_pass(pattern, &text, &mut ctx);
        }

        log::debug!("Inserted {} link(s) in {} pass(es)", ctx.links, self.patterns.len());
        text
    }

    /// Like [`Linker::linkify`], for raw bytes.
    ///
    /// Input that is not valid UTF-8 cannot be matched and is returned unchanged.
    pub fn linkify_bytes<'b>(&self, input: &'b [u8]) -> Cow<'b, [u8]> {
        match std::str::from_utf8(input) {
            Ok(text) => Cow::Owned(self.linkify(text).into_bytes()),
            Err(e) => {
                log::warn!("Input is not valid UTF-8 ({e}), leaving it unchanged");
                Cow::Borrowed(input)
            }
        }
    }

    fn run_pass(&self, pattern: &LinkPattern, input: &str, ctx: &mut PassContext<'_>) -> String {
        let protected = ctx.comments.protect(input);
        let replacer = LinkReplacer::new(pattern, &self.schemes, ctx.display);
        let mut tracker = IgnoreTracker::new();
        let mut pass_links = 0;

        let chunks: Vec<Cow<'_, str>> = tokenize(&protected)
            .into_iter()
            .map(|chunk| {
                if tracker.visit(&chunk) {
                    let (linked, count) = replacer.replace(chunk.as_str());
                    pass_links += count;
                    linked
                } else {
                    Cow::Borrowed(chunk.as_str())
                }
            })
            .collect();

        let replaced = reassemble(&chunks);
        let restored = ctx.comments.restore(&replaced).into_owned();

        log::debug!(
            "{} pass: {} link(s), {} comment(s) protected",
            pattern.kind,
            pass_links,
            ctx.comments.len()
        );
        ctx.links += pass_links;

        restored
    }
}
