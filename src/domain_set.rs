//! Hash-backed set of domain strings.

use ahash::AHashSet;

/// A set of unique domain names.
///
/// Entries are stored exactly as given; normalization is the caller's
/// (or the extractor's) job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainSet {
    domains: AHashSet<String>,
}

impl DomainSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty set with room for `capacity` domains.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            domains: AHashSet::with_capacity(capacity),
        }
    }

    /// Insert a single domain. Returns `true` if it was not present.
    pub fn insert(&mut self, domain: impl Into<String>) -> bool {
        self.domains.insert(domain.into())
    }

    /// Insert every domain from a slice.
    pub fn insert_all<S: AsRef<str>>(&mut self, domains: &[S]) {
        self.domains
            .extend(domains.iter().map(|d| d.as_ref().to_string()));
    }

    /// Merge another set into this one.
    pub fn merge(&mut self, other: DomainSet) {
        if self.domains.is_empty() {
            self.domains = other.domains;
        } else {
            self.domains.extend(other.domains);
        }
    }

    /// Exact membership test.
    #[inline]
    pub fn contains(&self, domain: &str) -> bool {
        self.domains.contains(domain)
    }

    /// Suffix membership test.
    ///
    /// Leading and trailing dots are ignored at every step. The domain
    /// matches if it, or any parent domain obtained by stripping leftmost
    /// labels, is a member.
    pub fn contains_suffix(&self, domain: &str) -> bool {
        if self.domains.is_empty() {
            return false;
        }

        let mut current = domain;
        loop {
            current = current.trim_matches('.');
            if current.is_empty() {
                return false;
            }
            if self.domains.contains(current) {
                return true;
            }
            match current.find('.') {
                Some(idx) => current = &current[idx + 1..],
                None => return false,
            }
        }
    }

    /// Number of domains in the set.
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Iterate over the domains in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.domains.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for DomainSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            domains: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<String>> Extend<S> for DomainSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.domains.extend(iter.into_iter().map(Into::into));
    }
}
