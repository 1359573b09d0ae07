//! Core types for cask management.

use crate::error::{Error, Result};
use std::fmt;

/// A validated cask token, e.g. `firefox` or `visual-studio-code@insiders`.
///
/// The token becomes a path component under the caskroom and is embedded in
/// the ask-pass dialog text, so only characters Homebrew itself uses in cask
/// tokens are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CaskName(String);

impl CaskName {
    /// Validate and wrap a cask token.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();

        if name.is_empty() {
            return Err(Error::InvalidName {
                name,
                reason: "name is empty",
            });
        }

        if name == "." || name == ".." {
            return Err(Error::InvalidName {
                name,
                reason: "name is a relative path component",
            });
        }

        if !name.chars().all(is_token_char) {
            return Err(Error::InvalidName {
                name,
                reason: "only letters, digits and - _ . @ + are allowed",
            });
        }

        Ok(Self(name))
    }

    /// The token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '@' | '+')
}

impl fmt::Display for CaskName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CaskName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_real_cask_tokens() {
        for name in [
            "firefox",
            "visual-studio-code",
            "temurin@17",
            "font-fira-code",
            "1password",
            "libreoffice-language-pack",
        ] {
            assert_eq!(CaskName::new(name).unwrap().as_str(), name);
        }
    }

    #[test]
    fn test_rejects_path_traversal() {
        assert!(CaskName::new("..").is_err());
        assert!(CaskName::new(".").is_err());
        assert!(CaskName::new("../etc").is_err());
        assert!(CaskName::new("homebrew/cask/firefox").is_err());
    }

    #[test]
    fn test_rejects_shell_metacharacters() {
        for name in ["", "foo bar", "foo\"bar", "$(whoami)", "a`b`", "x;y"] {
            assert!(
                matches!(CaskName::new(name), Err(Error::InvalidName { .. })),
                "expected {name:?} to be rejected"
            );
        }
    }
}
