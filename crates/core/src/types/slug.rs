//! Short-link slug type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Path segments served by the application itself.
///
/// A link registered under one of these could never be reached, because the
/// router matches the fixed routes before the slug catch-all.
pub const RESERVED_SLUGS: &[&str] = &[
    "login.html",
    "links",
    "links.html",
    "oauth",
    "health",
    "static",
];

/// Errors that can occur when parsing a [`Slug`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SlugError {
    /// The input string is empty.
    #[error("slug cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("slug must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input starts with a slash, so it would never match a request path.
    #[error("slug cannot start with '/'")]
    LeadingSlash,
    /// The input contains whitespace or control characters.
    #[error("slug cannot contain whitespace or control characters")]
    InvalidCharacter,
    /// The input contains a character that request paths cannot carry
    /// verbatim (`%`, `?` or `#`).
    #[error("slug cannot contain '{0}'")]
    UnreachableCharacter(char),
    /// The input collides with a built-in route.
    #[error("slug '{0}' is reserved")]
    Reserved(String),
}

/// The path remainder that identifies a stored destination.
///
/// Slugs are matched exactly: no case folding, no trailing-slash trimming.
/// `Go/Docs` and `go/docs` are different links.
///
/// ```
/// use golinks_core::Slug;
///
/// assert_eq!(Slug::parse("docs/rust").unwrap().as_str(), "docs/rust");
/// assert!(Slug::parse("").is_err());
/// assert!(Slug::parse("oauth").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Maximum length of a slug.
    pub const MAX_LENGTH: usize = 500;

    /// Parse a `Slug` for registration.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, too long, starts with `/`,
    /// contains whitespace, control characters, `%`, `?` or `#`, or is a
    /// reserved route name.
    pub fn parse(s: &str) -> Result<Self, SlugError> {
        if s.is_empty() {
            return Err(SlugError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(SlugError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if s.starts_with('/') {
            return Err(SlugError::LeadingSlash);
        }

        if s.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(SlugError::InvalidCharacter);
        }

        if let Some(c) = s.chars().find(|c| matches!(c, '%' | '?' | '#')) {
            return Err(SlugError::UnreachableCharacter(c));
        }

        let head = s.split('/').next().unwrap_or(s);
        if RESERVED_SLUGS.contains(&head) {
            return Err(SlugError::Reserved(s.to_owned()));
        }

        Ok(Self(s.to_owned()))
    }

    /// Wrap a slug taken verbatim from a request path or a datastore key.
    ///
    /// Lookups must not reject anything: an invalid slug is simply one that
    /// was never registered.
    #[must_use]
    pub fn from_path(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Returns the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the empty path remainder (`GET /`).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Slug {
    type Err = SlugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_slugs() {
        assert!(Slug::parse("example").is_ok());
        assert!(Slug::parse("foobar").is_ok());
        assert!(Slug::parse("docs/rust").is_ok());
        assert!(Slug::parse("Q3-Planning").is_ok());
    }

    #[test]
    fn test_parse_is_exact() {
        let slug = Slug::parse("Go/Docs/").unwrap();
        assert_eq!(slug.as_str(), "Go/Docs/");
        assert_ne!(slug, Slug::parse("go/docs").unwrap());
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Slug::parse(""), Err(SlugError::Empty));
    }

    #[test]
    fn test_parse_leading_slash() {
        assert_eq!(Slug::parse("/foo"), Err(SlugError::LeadingSlash));
    }

    #[test]
    fn test_parse_whitespace() {
        assert_eq!(Slug::parse("foo bar"), Err(SlugError::InvalidCharacter));
        assert_eq!(Slug::parse("foo\n"), Err(SlugError::InvalidCharacter));
    }

    #[test]
    fn test_parse_unreachable_characters() {
        assert_eq!(
            Slug::parse("a%20b"),
            Err(SlugError::UnreachableCharacter('%'))
        );
        assert_eq!(
            Slug::parse("foo?bar"),
            Err(SlugError::UnreachableCharacter('?'))
        );
        assert_eq!(
            Slug::parse("foo#bar"),
            Err(SlugError::UnreachableCharacter('#'))
        );
    }

    #[test]
    fn test_parse_reserved() {
        for reserved in RESERVED_SLUGS {
            assert!(matches!(Slug::parse(reserved), Err(SlugError::Reserved(_))));
        }
        assert!(matches!(
            Slug::parse("oauth/callback"),
            Err(SlugError::Reserved(_))
        ));
        assert!(Slug::parse("oauthx").is_ok());
    }

    #[test]
    fn test_parse_too_long() {
        let long = "a".repeat(Slug::MAX_LENGTH + 1);
        assert!(matches!(Slug::parse(&long), Err(SlugError::TooLong { .. })));
    }

    #[test]
    fn test_from_path_accepts_anything() {
        assert!(Slug::from_path("").is_empty());
        assert_eq!(Slug::from_path("has space").as_str(), "has space");
    }
}
