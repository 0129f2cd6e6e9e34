//! Ordered link categories and the regular expressions behind them.
//!
//! Categories with a fixed shape (protocol URLs, `www.` hosts, e-mail
//! addresses, the generic domain fallback) are compile-time validated with
//! `lazy_regex!`. Categories driven by a host or suffix list are assembled at
//! startup from [`super::tables`] so the matching engine can be tested with
//! any table contents.

// lazy_regex! uses once_cell internally
#![allow(clippy::non_std_lazy_statics)]

use lazy_regex::lazy_regex;
use regex::Regex;
use std::fmt;
use std::ops::Range;
use thiserror::Error;

use super::tables::{KNOWN_SUFFIXES, PLATFORM_SHORT_LINK_HOSTS, SHORTENER_HOSTS};

/// Characters accepted after a host: RFC 3986 reserved and unreserved set plus `%`.
const PATH_CHARS: &str = r"[\w\-.~:/?#\[\]@!$&'()*+,;=%]";

/// `http://` or `https://`, host, optional port, optional path/query/fragment.
static RE_PROTOCOL_URL: lazy_regex::Lazy<Regex> =
    lazy_regex!(r"(?i)\bhttps?://[\w\-.]+(?::[0-9]+)?(?:[/?#][\w\-.~:/?#\[\]@!$&'()*+,;=%]*)?");

/// `www.` host with the same trailing structure as a protocol URL.
static RE_WWW_HOST: lazy_regex::Lazy<Regex> =
    lazy_regex!(r"(?i)\bwww\.[\w\-.]+(?::[0-9]+)?(?:[/?#][\w\-.~:/?#\[\]@!$&'()*+,;=%]*)?");

/// `local@domain.tld`, with whatever path is glued to it.
static RE_EMAIL: lazy_regex::Lazy<Regex> =
    lazy_regex!(r"\b[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}\b(?:[/?#][\w\-.~:/?#\[\]@!$&'()*+,;=%]*)?");

/// Any DNS-like label sequence whose last label has at least two letters.
static RE_GENERIC_DOMAIN: lazy_regex::Lazy<Regex> = lazy_regex!(
    r"(?i)\b(?:[a-z0-9](?:[a-z0-9\-]{0,61}[a-z0-9])?\.)+[a-z]{2,}\b(?::[0-9]+)?(?:[/?#][\w\-.~:/?#\[\]@!$&'()*+,;=%]*)?"
);

/// Trailing characters that end a sentence rather than a link.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', '\'', '"'];

/// One link-matching rule of the pattern table.
///
/// The declaration order is the table order: specific formats first, the
/// generic domain fallback last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LinkCategory {
    /// `http(s)://host[:port][/path]`
    ProtocolUrl,
    /// `www.host[:port][/path]`
    WwwHost,
    /// `name.<known suffix>[/path]`
    KnownSuffix,
    /// Known URL shortener host followed by a path.
    Shortener,
    /// `local@domain.tld`
    Email,
    /// Chat-invite and messaging deep links followed by a path.
    PlatformShortLink,
    /// Catch-all for anything domain-shaped the other categories missed.
    GenericDomain,
}

impl LinkCategory {
    /// All categories in table order.
    pub const ALL: [Self; 7] = [
        Self::ProtocolUrl,
        Self::WwwHost,
        Self::KnownSuffix,
        Self::Shortener,
        Self::Email,
        Self::PlatformShortLink,
        Self::GenericDomain,
    ];

    /// Position in the pattern table; lower wins ties.
    #[must_use]
    pub const fn priority(self) -> usize {
        self as usize
    }

    /// Categories matching a host without scheme or `www.` prefix.
    #[must_use]
    pub const fn is_bare_host(self) -> bool {
        matches!(self, Self::KnownSuffix | Self::GenericDomain)
    }

    /// Short label used in logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ProtocolUrl => "protocol_url",
            Self::WwwHost => "www_host",
            Self::KnownSuffix => "known_suffix",
            Self::Shortener => "shortener",
            Self::Email => "email",
            Self::PlatformShortLink => "platform_short_link",
            Self::GenericDomain => "generic_domain",
        }
    }
}

impl fmt::Display for LinkCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Errors raised while assembling a [`PatternTable`].
#[derive(Error, Debug)]
pub enum PatternError {
    /// A table-driven category was given an empty table
    #[error("Empty lookup table for {0} links")]
    EmptyTable(LinkCategory),
    /// The assembled expression did not compile
    #[error("Invalid {category} pattern: {source}")]
    Invalid {
        /// Category whose pattern failed
        category: LinkCategory,
        /// Underlying regex error
        #[source]
        source: regex::Error,
    },
}

/// A link found in a text, as a byte range into that text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkMatch {
    /// Category that produced the match
    pub category: LinkCategory,
    /// Byte range of the link
    pub range: Range<usize>,
}

impl LinkMatch {
    /// The matched substring of `text`.
    #[must_use]
    pub fn as_str<'t>(&self, text: &'t str) -> &'t str {
        &text[self.range.clone()]
    }
}

#[derive(Debug, Clone)]
struct LinkRule {
    category: LinkCategory,
    regex: Regex,
}

/// Ordered set of link categories.
#[derive(Debug, Clone)]
pub struct PatternTable {
    rules: Vec<LinkRule>,
}

impl PatternTable {
    /// Pattern table built from the bundled suffix and host tables.
    ///
    /// # Errors
    ///
    /// Returns a `PatternError` if a generated pattern fails to compile.
    pub fn standard() -> Result<Self, PatternError> {
        Self::with_tables(KNOWN_SUFFIXES, SHORTENER_HOSTS, PLATFORM_SHORT_LINK_HOSTS)
    }

    /// Pattern table built from caller-supplied lookup tables.
    ///
    /// # Errors
    ///
    /// Returns `PatternError::EmptyTable` if any table is empty, or
    /// `PatternError::Invalid` if a generated pattern fails to compile.
    pub fn with_tables(
        suffixes: &[&str],
        shortener_hosts: &[&str],
        platform_hosts: &[&str],
    ) -> Result<Self, PatternError> {
        let known_suffix = format!(
            r"(?i)\b[\w\-.]+\.(?:{})\b(?::[0-9]+)?(?:[/?#]{PATH_CHARS}*)?",
            alternation(LinkCategory::KnownSuffix, suffixes)?
        );
        let shortener = format!(
            r"(?i)\b(?:{})/{PATH_CHARS}+",
            alternation(LinkCategory::Shortener, shortener_hosts)?
        );
        let platform = format!(
            r"(?i)\b(?:{})/{PATH_CHARS}+",
            alternation(LinkCategory::PlatformShortLink, platform_hosts)?
        );

        let rules = vec![
            LinkRule {
                category: LinkCategory::ProtocolUrl,
                regex: RE_PROTOCOL_URL.clone(),
            },
            LinkRule {
                category: LinkCategory::WwwHost,
                regex: RE_WWW_HOST.clone(),
            },
            compile(LinkCategory::KnownSuffix, &known_suffix)?,
            compile(LinkCategory::Shortener, &shortener)?,
            LinkRule {
                category: LinkCategory::Email,
                regex: RE_EMAIL.clone(),
            },
            compile(LinkCategory::PlatformShortLink, &platform)?,
            LinkRule {
                category: LinkCategory::GenericDomain,
                regex: RE_GENERIC_DOMAIN.clone(),
            },
        ];

        Ok(Self { rules })
    }

    /// Categories in table order.
    pub fn categories(&self) -> impl Iterator<Item = LinkCategory> + '_ {
        self.rules.iter().map(|rule| rule.category)
    }

    /// Every match of every category in `text`, overlapping ones included.
    ///
    /// Matches are grouped by category in table order and ordered by position
    /// within a category. Trailing sentence punctuation is not part of a match,
    /// and a bare host directly followed by `://` is the tail of a word glued to
    /// a URL scheme, not a link of its own.
    #[must_use]
    pub fn candidates(&self, text: &str) -> Vec<LinkMatch> {
        let mut found = Vec::new();
        for rule in &self.rules {
            for m in rule.regex.find_iter(text) {
                let range = trim_link_end(text, m.range());
                if rule.category.is_bare_host() && text[range.end..].starts_with("://") {
                    continue;
                }
                if !range.is_empty() {
                    found.push(LinkMatch {
                        category: rule.category,
                        range,
                    });
                }
            }
        }
        found
    }
}

/// Case-insensitive alternation of escaped entries, longest first.
fn alternation(category: LinkCategory, entries: &[&str]) -> Result<String, PatternError> {
    let mut escaped: Vec<String> = entries
        .iter()
        .map(|entry| entry.trim())
        .filter(|entry| !entry.is_empty())
        .map(regex::escape)
        .collect();
    if escaped.is_empty() {
        return Err(PatternError::EmptyTable(category));
    }
    escaped.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    escaped.dedup();
    Ok(escaped.join("|"))
}

fn compile(category: LinkCategory, pattern: &str) -> Result<LinkRule, PatternError> {
    Regex::new(pattern)
        .map(|regex| LinkRule { category, regex })
        .map_err(|source| PatternError::Invalid { category, source })
}

/// Drops trailing punctuation, and a closing parenthesis without an opening one.
fn trim_link_end(text: &str, range: Range<usize>) -> Range<usize> {
    let mut end = range.end;
    loop {
        let span = &text[range.start..end];
        let Some(last) = span.chars().next_back() else {
            break;
        };
        let unbalanced_paren = last == ')' && !span.contains('(');
        if TRAILING_PUNCTUATION.contains(&last) || unbalanced_paren {
            end -= last.len_utf8();
        } else {
            break;
        }
    }
    range.start..end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> PatternTable {
        match PatternTable::standard() {
            Ok(table) => table,
            Err(e) => panic!("standard table failed to build: {e}"),
        }
    }

    fn matches_of(category: LinkCategory, text: &str) -> Vec<String> {
        table()
            .candidates(text)
            .into_iter()
            .filter(|m| m.category == category)
            .map(|m| m.as_str(text).to_string())
            .collect()
    }

    #[test]
    fn categories_follow_table_order() {
        let order: Vec<_> = table().categories().collect();
        assert_eq!(order, LinkCategory::ALL.to_vec());
        for (index, category) in LinkCategory::ALL.iter().enumerate() {
            assert_eq!(category.priority(), index);
        }
    }

    #[test]
    fn protocol_url_with_port_and_query() {
        assert_eq!(
            matches_of(
                LinkCategory::ProtocolUrl,
                "go to HTTPS://example.org:8443/a/b?x=1&y=2#top now"
            ),
            vec!["HTTPS://example.org:8443/a/b?x=1&y=2#top"]
        );
    }

    #[test]
    fn www_host_without_scheme() {
        assert_eq!(
            matches_of(LinkCategory::WwwHost, "see www.example.com/page."),
            vec!["www.example.com/page"]
        );
    }

    #[test]
    fn known_suffix_requires_listed_suffix() {
        assert_eq!(
            matches_of(LinkCategory::KnownSuffix, "shop at deals.store/today"),
            vec!["deals.store/today"]
        );
        assert!(matches_of(LinkCategory::KnownSuffix, "open notes.qqq").is_empty());
    }

    #[test]
    fn known_suffix_does_not_stop_inside_a_label() {
        assert_eq!(
            matches_of(LinkCategory::KnownSuffix, "example.company"),
            vec!["example.company"]
        );
    }

    #[test]
    fn shortener_needs_a_path() {
        assert_eq!(
            matches_of(LinkCategory::Shortener, "bit.ly/3xYz and bit.ly"),
            vec!["bit.ly/3xYz"]
        );
    }

    #[test]
    fn email_address() {
        assert_eq!(
            matches_of(LinkCategory::Email, "mail John.Doe+tag@mail.example.com today"),
            vec!["John.Doe+tag@mail.example.com"]
        );
    }

    #[test]
    fn platform_short_links() {
        assert_eq!(
            matches_of(
                LinkCategory::PlatformShortLink,
                "t.me/channel discord.gg/abc wa.me/15551234567"
            ),
            vec!["t.me/channel", "discord.gg/abc", "wa.me/15551234567"]
        );
    }

    #[test]
    fn generic_domain_fallback() {
        assert_eq!(
            matches_of(LinkCategory::GenericDomain, "host sub.example.qqq/path ok"),
            vec!["sub.example.qqq/path"]
        );
        assert!(matches_of(LinkCategory::GenericDomain, "e.g. this").is_empty());
    }

    #[test]
    fn bare_domains_keep_port_query_and_fragment() {
        for category in [LinkCategory::KnownSuffix, LinkCategory::GenericDomain] {
            assert_eq!(
                matches_of(
                    category,
                    "at example.com:8080/admin, example.com?ref=abc and example.com#top."
                ),
                vec!["example.com:8080/admin", "example.com?ref=abc", "example.com#top"]
            );
        }
        assert_eq!(
            matches_of(LinkCategory::KnownSuffix, "is it example.com? yes: example.com: ok"),
            vec!["example.com", "example.com"]
        );
    }

    #[test]
    fn email_keeps_a_glued_path() {
        assert_eq!(
            matches_of(LinkCategory::Email, "mail a@b.com/x now"),
            vec!["a@b.com/x"]
        );
    }

    #[test]
    fn bare_host_glued_to_a_scheme_is_skipped() {
        let text = "word.https://evil.com/x";
        assert!(!matches_of(LinkCategory::GenericDomain, text).contains(&"word.https".to_string()));
        assert_eq!(
            matches_of(LinkCategory::ProtocolUrl, text),
            vec!["https://evil.com/x"]
        );
    }

    #[test]
    fn trailing_punctuation_is_trimmed() {
        assert_eq!(
            matches_of(LinkCategory::ProtocolUrl, "(http://a.com/x), then http://b.com/y!"),
            vec!["http://a.com/x", "http://b.com/y"]
        );
        assert_eq!(
            matches_of(LinkCategory::ProtocolUrl, "http://w.org/Foo_(bar)"),
            vec!["http://w.org/Foo_(bar)"]
        );
    }

    #[test]
    fn custom_tables_drive_table_categories() -> Result<(), PatternError> {
        let table = PatternTable::with_tables(&["zz"], &["sho.rt"], &["chat.to"])?;
        let text = "a.zz sho.rt/x chat.to/y";
        let found: Vec<_> = table
            .candidates(text)
            .into_iter()
            .filter(|m| m.category != LinkCategory::GenericDomain)
            .map(|m| (m.category, m.as_str(text).to_string()))
            .collect();
        assert_eq!(
            found,
            vec![
                (LinkCategory::KnownSuffix, "a.zz".to_string()),
                (LinkCategory::Shortener, "sho.rt/x".to_string()),
                (LinkCategory::PlatformShortLink, "chat.to/y".to_string()),
            ]
        );
        Ok(())
    }

    #[test]
    fn empty_table_is_rejected() {
        let result = PatternTable::with_tables(&[], &["bit.ly"], &["t.me"]);
        assert!(matches!(
            result,
            Err(PatternError::EmptyTable(LinkCategory::KnownSuffix))
        ));
    }
}
