//! Classification verdicts.

use std::fmt;

/// Verdict represents the outcome of classifying a domain.
///
/// Variants are listed in precedence order: the first list a domain
/// appears on decides the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Verdict {
    /// Domain is on the explicit allow list
    ExplicitAllow = 0,
    /// Domain or a parent is on the suffix allow list
    SuffixAllow = 1,
    /// Domain is on the explicit block list
    ExplicitBlock = 2,
    /// Domain or a parent is on the suffix block list
    SuffixBlock = 3,
    /// Domain is on no list
    #[default]
    ImplicitAllow = 4,
}

impl Verdict {
    /// Whether queries for the domain should be blocked.
    pub fn is_blocked(self) -> bool {
        matches!(self, Verdict::ExplicitBlock | Verdict::SuffixBlock)
    }

    /// Whether resolution may proceed.
    pub fn is_allowed(self) -> bool {
        !self.is_blocked()
    }

    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::ExplicitAllow => "explicit-allow",
            Verdict::SuffixAllow => "suffix-allow",
            Verdict::ExplicitBlock => "explicit-block",
            Verdict::SuffixBlock => "suffix-block",
            Verdict::ImplicitAllow => "implicit-allow",
        }
    }

    /// Human readable explanation, as printed by the `check` command.
    pub fn describe(&self, domain: &str) -> String {
        match self {
            Verdict::ExplicitAllow => format!("domain {:?} on explicit allow list", domain),
            Verdict::SuffixAllow => format!("domain {:?} on suffix allow list", domain),
            Verdict::ExplicitBlock => format!("domain {:?} on explicit block list", domain),
            Verdict::SuffixBlock => format!("domain {:?} on suffix block list", domain),
            Verdict::ImplicitAllow => format!("domain {:?} is implicitly allowable", domain),
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocked() {
        assert!(Verdict::ExplicitBlock.is_blocked());
        assert!(Verdict::SuffixBlock.is_blocked());
        assert!(!Verdict::ExplicitAllow.is_blocked());
        assert!(!Verdict::SuffixAllow.is_blocked());
        assert!(Verdict::ImplicitAllow.is_allowed());
    }

    #[test]
    fn test_verdict_display() {
        assert_eq!(Verdict::ExplicitAllow.to_string(), "explicit-allow");
        assert_eq!(Verdict::SuffixBlock.to_string(), "suffix-block");
    }

    #[test]
    fn test_describe() {
        assert_eq!(
            Verdict::ImplicitAllow.describe("example.com"),
            "domain \"example.com\" is implicitly allowable"
        );
    }
}
