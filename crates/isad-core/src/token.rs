//! Album token extraction.
//!
//! Shared album URLs look like `https://www.icloud.com/sharedalbum/#B0aGWZGqDGHAhDX`;
//! everything after the first `#` is the opaque token that identifies the
//! collection to the sharedstreams service.

use crate::error::ScanError;

/// Opaque token identifying one shared album. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionToken(String);

impl CollectionToken {
    /// Extracts the token from an album URL: the substring after the first `#`.
    ///
    /// Fails with [`ScanError::InvalidUrl`] when the URL has no fragment (or
    /// an empty one). No network activity happens before this check.
    pub fn from_album_url(album_url: &str) -> Result<Self, ScanError> {
        match album_url.split_once('#') {
            Some((_, token)) if !token.is_empty() => Ok(Self(token.to_string())),
            _ => Err(ScanError::InvalidUrl(album_url.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CollectionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_fragment() {
        let t =
            CollectionToken::from_album_url("https://www.icloud.com/sharedalbum/#B0aGWZGqDGHAhDX")
                .unwrap();
        assert_eq!(t.as_str(), "B0aGWZGqDGHAhDX");
    }

    #[test]
    fn keeps_everything_after_first_hash() {
        let t = CollectionToken::from_album_url("https://example.com/a#b#c").unwrap();
        assert_eq!(t.as_str(), "b#c");
    }

    #[test]
    fn missing_fragment_is_an_input_error() {
        let err = CollectionToken::from_album_url("https://www.icloud.com/sharedalbum/")
            .unwrap_err();
        assert!(matches!(err, ScanError::InvalidUrl(_)));
    }

    #[test]
    fn empty_fragment_is_an_input_error() {
        assert!(CollectionToken::from_album_url("https://example.com/x#").is_err());
    }
}
