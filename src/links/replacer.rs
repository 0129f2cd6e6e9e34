//! Link substitution engine.
//!
//! All categories are matched against the original text in one pass. Overlaps
//! are resolved leftmost-longest, with the pattern table order breaking ties
//! between spans that start at the same byte and have the same length. The
//! output is then rebuilt once, so no category ever sees text another
//! category already rewrote.

use std::borrow::Cow;
use std::ops::Range;
use tracing::debug;

use super::patterns::{LinkMatch, PatternError, PatternTable};

/// Result of running the engine over one text.
///
/// `replacements == 0` implies `text` equals the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    /// Processed text
    pub text: String,
    /// Number of links that were rewritten
    pub replacements: usize,
}

#[derive(Debug, Clone)]
enum Span {
    /// An occurrence of the canonical link itself
    Canonical(Range<usize>),
    Link(LinkMatch),
}

impl Span {
    fn range(&self) -> &Range<usize> {
        match self {
            Self::Canonical(range) => range,
            Self::Link(m) => &m.range,
        }
    }

    /// Canonical occurrences win ties, then table order.
    fn rank(&self) -> usize {
        match self {
            Self::Canonical(_) => 0,
            Self::Link(m) => m.category.priority() + 1,
        }
    }
}

/// Rewrites every detected link to one canonical link.
#[derive(Debug, Clone)]
pub struct LinkReplacer {
    table: PatternTable,
    canonical: String,
}

impl LinkReplacer {
    /// Replacer over the standard pattern table.
    ///
    /// # Examples
    ///
    /// ```
    /// use link_swap_bot::links::LinkReplacer;
    ///
    /// let replacer = LinkReplacer::new("https://safe.example/go").expect("patterns compile");
    /// let result = replacer.substitute("Check http://evil.com/x now");
    /// assert_eq!(result.text, "Check https://safe.example/go now");
    /// assert_eq!(result.replacements, 1);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a `PatternError` if the standard pattern table fails to build.
    pub fn new(canonical: impl Into<String>) -> Result<Self, PatternError> {
        Ok(Self::with_table(PatternTable::standard()?, canonical))
    }

    /// Replacer over a caller-supplied pattern table.
    #[must_use]
    pub fn with_table(table: PatternTable, canonical: impl Into<String>) -> Self {
        Self {
            table,
            canonical: canonical.into(),
        }
    }

    /// The configured canonical link.
    #[must_use]
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// The pattern table in use.
    #[must_use]
    pub const fn table(&self) -> &PatternTable {
        &self.table
    }

    /// Links that [`Self::substitute`] would rewrite, in text order.
    #[must_use]
    pub fn find_links(&self, text: &str) -> Vec<LinkMatch> {
        let canonical = self.canonical.trim();
        self.resolve(text)
            .into_iter()
            .filter_map(|span| match span {
                Span::Link(m) if m.as_str(text).trim() != canonical => Some(m),
                _ => None,
            })
            .collect()
    }

    /// Replaces every link in `text` with the canonical link.
    #[must_use]
    pub fn substitute(&self, text: &str) -> Substitution {
        if text.is_empty() {
            return Substitution {
                text: String::new(),
                replacements: 0,
            };
        }

        let canonical = self.canonical.trim();
        let mut output = String::with_capacity(text.len());
        let mut replacements = 0;
        let mut last_end = 0;

        for span in self.resolve(text) {
            let Span::Link(m) = span else {
                continue;
            };
            let original = m.as_str(text);
            if original.trim() == canonical {
                continue;
            }
            output.push_str(&text[last_end..m.range.start]);
            output.push_str(&self.canonical);
            last_end = m.range.end;
            replacements += 1;
            debug!(category = %m.category, link = %original, "Replaced link");
        }

        if replacements == 0 {
            return Substitution {
                text: text.to_string(),
                replacements,
            };
        }

        output.push_str(&text[last_end..]);
        debug!(replacements, "Link substitution finished");
        Substitution {
            text: output,
            replacements,
        }
    }

    /// Like [`Self::substitute`], but hands back the input itself when nothing
    /// was replaced.
    ///
    /// # Examples
    ///
    /// ```
    /// use link_swap_bot::links::LinkReplacer;
    /// use std::borrow::Cow;
    ///
    /// let replacer = LinkReplacer::new("https://safe.example/go").expect("patterns compile");
    /// assert!(matches!(replacer.process("no links here"), Cow::Borrowed("no links here")));
    /// ```
    #[must_use]
    pub fn process<'a>(&self, text: &'a str) -> Cow<'a, str> {
        let result = self.substitute(text);
        if result.replacements == 0 {
            Cow::Borrowed(text)
        } else {
            Cow::Owned(result.text)
        }
    }

    /// [`Self::process`] for optional text such as a missing caption.
    #[must_use]
    pub fn process_optional<'a>(&self, text: Option<&'a str>) -> Option<Cow<'a, str>> {
        text.map(|t| self.process(t))
    }

    /// Non-overlapping spans in text order: leftmost start first, then the
    /// longest span, then canonical occurrences, then table order.
    fn resolve(&self, text: &str) -> Vec<Span> {
        let canonical = self.canonical.trim();
        let mut spans: Vec<Span> = self
            .table
            .candidates(text)
            .into_iter()
            .map(Span::Link)
            .collect();
        if !canonical.is_empty() {
            spans.extend(
                text.match_indices(canonical)
                    .map(|(start, found)| Span::Canonical(start..start + found.len())),
            );
        }

        spans.sort_by(|a, b| {
            let (ra, rb) = (a.range(), b.range());
            ra.start
                .cmp(&rb.start)
                .then_with(|| rb.len().cmp(&ra.len()))
                .then_with(|| a.rank().cmp(&b.rank()))
        });

        let mut resolved: Vec<Span> = Vec::new();
        let mut cursor = 0;
        for span in spans {
            if span.range().start < cursor {
                continue;
            }
            cursor = span.range().end;
            resolved.push(span);
        }
        resolved
    }
}
