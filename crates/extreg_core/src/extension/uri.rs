//! Canonical package URI parsing.
//!
//! Packages are published under URIs of the form
//! `http://www.sbml.org/sbml/level<L>/version<V>/<package>/version<P>`.
//! Other URIs are accepted as opaque lookup keys.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{Display, Formatter};

const PACKAGE_URI_PREFIX: &str = "http://www.sbml.org/sbml";

static PACKAGE_URI_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^http://www\.sbml\.org/sbml/level(?P<level>[1-9][0-9]*)/version(?P<version>[1-9][0-9]*)/(?P<package>[a-z][a-z0-9_]*)/version(?P<package_version>[1-9][0-9]*)$",
    )
    .expect("package uri pattern is valid")
});

/// Structured view of a canonical package URI.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageUri {
    pub level: u32,
    pub version: u32,
    pub package: String,
    pub package_version: u32,
}

impl PackageUri {
    pub fn new(package: &str, level: u32, version: u32, package_version: u32) -> Self {
        Self {
            level,
            version,
            package: package.to_string(),
            package_version,
        }
    }

    /// Parses a canonical package URI; returns `None` for any other form.
    pub fn parse(value: &str) -> Option<Self> {
        let captures = PACKAGE_URI_PATTERN.captures(value.trim())?;
        Some(Self {
            level: captures["level"].parse().ok()?,
            version: captures["version"].parse().ok()?,
            package: captures["package"].to_string(),
            package_version: captures["package_version"].parse().ok()?,
        })
    }
}

impl Display for PackageUri {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{PACKAGE_URI_PREFIX}/level{}/version{}/{}/version{}",
            self.level, self.version, self.package, self.package_version
        )
    }
}

/// Returns whether `value` is usable as an opaque URI lookup key.
pub(crate) fn is_valid_uri_key(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty()
        && trimmed == value
        && trimmed.contains(':')
        && !trimmed.chars().any(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::{is_valid_uri_key, PackageUri};

    #[test]
    fn parses_canonical_package_uri() {
        let uri = PackageUri::parse("http://www.sbml.org/sbml/level3/version1/layout/version1")
            .expect("canonical uri");
        assert_eq!(uri, PackageUri::new("layout", 3, 1, 1));
    }

    #[test]
    fn formats_back_to_canonical_form() {
        let uri = PackageUri::new("render", 3, 1, 1);
        assert_eq!(
            uri.to_string(),
            "http://www.sbml.org/sbml/level3/version1/render/version1"
        );
        assert_eq!(PackageUri::parse(&uri.to_string()), Some(uri));
    }

    #[test]
    fn ignores_non_canonical_uris() {
        for uri in [
            "http://projects.eml.ac.uk/sbml/level2",
            "http://www.sbml.org/sbml/level3/version1/Layout/version1",
            "http://www.sbml.org/sbml/level0/version1/layout/version1",
            "http://www.sbml.org/sbml/level3/version1/layout",
        ] {
            assert!(PackageUri::parse(uri).is_none(), "{uri} must not parse");
        }
    }

    #[test]
    fn validates_uri_keys() {
        assert!(is_valid_uri_key("urn:example:pkg"));
        assert!(is_valid_uri_key("http://projects.eml.ac.uk/sbml/level2"));
        assert!(!is_valid_uri_key(""));
        assert!(!is_valid_uri_key(" urn:padded "));
        assert!(!is_valid_uri_key("no-scheme"));
        assert!(!is_valid_uri_key("urn:with space"));
    }
}
