//! The article record produced by a successful parse.
//!
//! A `NewsItem` only ever comes out of [`super::parse_news`]: if any of its
//! three fields is missing from the response the whole decode fails, so a
//! constructed item is always complete.

use std::fmt;

/// A single article from the content API.
///
/// Items keep the order the server returned them in; nothing in the crate
/// sorts or de-duplicates them.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct NewsItem {
    /// Headline, from `webTitle`.
    pub title: String,

    /// Section the article was published under, from `sectionName`
    /// (e.g. "World news").
    pub section: String,

    /// Link to the article page, from `webUrl`.
    pub url: String,
}

impl NewsItem {
    pub fn new(
        title: impl Into<String>,
        section: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            section: section.into(),
            url: url.into(),
        }
    }
}

impl fmt::Display for NewsItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.title, self.section)
    }
}
