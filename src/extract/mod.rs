//! Domain extraction from raw list data.
//!
//! An [`Extractor`] turns a byte stream (a local file or an HTTP body) into
//! a deduplicated [`DomainSet`]. The shape of the input is declared with an
//! [`ExtractMode`]; new list formats are added as new modes without the
//! classification store knowing about them.

mod generic;

pub use generic::GenericExtractor;

use std::io::Read;

use crate::{DomainSet, Result};

/// Extractor trait defines how list data becomes a set of domains.
pub trait Extractor: Send + Sync {
    /// Extract every domain found in `reader`.
    ///
    /// Read failures and undecodable input are errors. What happens to an
    /// individual unparseable line depends on the extractor's [`LinePolicy`].
    fn extract(&self, reader: &mut dyn Read) -> Result<DomainSet>;
}

/// Supported list formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExtractMode {
    /// Line oriented domain lists, including hosts-file syntax
    #[default]
    Generic,
}

impl ExtractMode {
    /// Build the extractor for this mode.
    pub fn extractor(self, policy: LinePolicy) -> Box<dyn Extractor> {
        match self {
            ExtractMode::Generic => Box::new(GenericExtractor::new(policy)),
        }
    }

    /// Get the name of this mode.
    pub fn name(&self) -> &'static str {
        match self {
            ExtractMode::Generic => "generic",
        }
    }
}

/// What to do with a line that holds no recognizable domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LinePolicy {
    /// Drop the line and keep going
    #[default]
    Skip,
    /// Fail the whole extraction
    Strict,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_extractor() {
        let ex = ExtractMode::Generic.extractor(LinePolicy::Skip);
        let mut input: &[u8] = b"example.com\n";
        let set = ex.extract(&mut input).unwrap();
        assert!(set.contains("example.com"));
        assert_eq!(ExtractMode::default().name(), "generic");
    }
}
