//! URL scheme allow-list
//!
//! The set of schemes recognised in absolute links is owned by whatever security policy the host
//! application runs. The filter only ever asks for the list through [`SchemePolicy`].

use serde::{Deserialize, Serialize};

/// Schemes accepted when no policy is configured.
pub const DEFAULT_SCHEMES: &[&str] = &[
    "http", "https", "ftp", "news", "nntp", "tel", "telnet", "mailto", "irc", "ssh", "sftp", "webcal", "rtsp",
];

/// Supplies the ordered list of URL schemes that absolute links may start with.
pub trait SchemePolicy {
    /// Allowed schemes, in the order they should be tried.
    fn allowed_schemes(&self) -> Vec<&str>;

    /// Check whether `scheme` is allowed (ASCII case-insensitive)
    fn allows(&self, scheme: &str) -> bool {
        self.allowed_schemes().iter().any(|s| s.eq_ignore_ascii_case(scheme))
    }
}

impl<T: AsRef<str>> SchemePolicy for [T] {
    fn allowed_schemes(&self) -> Vec<&str> {
        self.iter().map(|s| s.as_ref()).collect()
    }
}

impl<T: AsRef<str>> SchemePolicy for Vec<T> {
    fn allowed_schemes(&self) -> Vec<&str> {
        self.as_slice().allowed_schemes()
    }
}

/// Owned scheme list, loadable from the `[policy]` section of the configuration file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct SchemeList {
    /// Schemes that may prefix an absolute link
    pub allowed_schemes: Vec<String>,
}

impl Default for SchemeList {
    fn default() -> Self {
        Self {
            allowed_schemes: DEFAULT_SCHEMES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl SchemeList {
    pub fn new<I, S>(schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_schemes: schemes.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a comma-separated list such as `http,https,ftp`
    pub fn parse_list(list: &str) -> Self {
        Self::new(list.split(',').map(str::trim).filter(|s| !s.is_empty()))
    }
}

impl SchemePolicy for SchemeList {
    fn allowed_schemes(&self) -> Vec<&str> {
        self.allowed_schemes.allowed_schemes()
    }
}

/// Whether `text` begins with one of `schemes` followed by a colon.
pub fn has_allowed_scheme<P: SchemePolicy + ?Sized>(text: &str, policy: &P) -> bool {
    match text.split_once(':') {
        Some((scheme, _)) if !scheme.is_empty() => policy.allows(scheme),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_list_contains_common_schemes() {
        let list = SchemeList::default();
        assert!(list.allows("http"));
        assert!(list.allows("HTTPS"));
        assert!(list.allows("mailto"));
        assert!(!list.allows("javascript"));
    }

    #[test]
    fn test_parse_list_trims_and_skips_empty_entries() {
        let list = SchemeList::parse_list(" http , https,, ftp ");
        assert_eq!(list.allowed_schemes, vec!["http", "https", "ftp"]);
    }

    #[test]
    fn test_slices_act_as_policies() {
        let schemes = ["gopher", "http"];
        assert_eq!(schemes[..].allowed_schemes(), vec!["gopher", "http"]);
        assert!(has_allowed_scheme("gopher://example.com", &schemes[..]));
    }

    #[test]
    fn test_has_allowed_scheme() {
        let list = SchemeList::default();
        assert!(has_allowed_scheme("http://example.com", &list));
        assert!(has_allowed_scheme("MAILTO:me@example.com", &list));
        assert!(!has_allowed_scheme("www.example.com", &list));
        assert!(!has_allowed_scheme("javascript:alert(1)", &list));
        assert!(!has_allowed_scheme(":nothing", &list));
    }
}
