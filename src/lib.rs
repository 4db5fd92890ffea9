//! dnsveto - Layered allow/block domain classification for DNS filtering.
//!
//! This crate decides, for a DNS query name, whether resolution should
//! proceed or be blocked. Decisions come from four domain sets assembled
//! from inline configuration, local list files, directories of list files
//! and remote block lists.
//!
//! # Features
//!
//! - **Exact and suffix matching**: `example.com` on a suffix list covers
//!   every name below it
//! - **Allow overrides block**: any allow signal beats any block signal
//! - **Heterogeneous sources**: plain domain lists and hosts files, local or
//!   over HTTP (gzip bodies are decompressed)
//! - **Fail-soft remote lists**: an unreachable list is logged and skipped
//! - **Thread-safe reads**: built [`Sets`] are immutable
//!
//! # Quick Start
//!
//! ```ignore
//! use dnsveto::{CoreConfig, Sets, Verdict};
//!
//! let mut config = CoreConfig::from_env()?;
//! config.apply_defaults();
//!
//! let sets = Sets::new(config)?;
//! match sets.classify("ads.example.com") {
//!     Verdict::ExplicitBlock | Verdict::SuffixBlock => println!("blocked"),
//!     _ => println!("allowed"),
//! }
//! ```
//!
//! # Matching Priority
//!
//! 1. Explicit allow
//! 2. Suffix allow
//! 3. Explicit block
//! 4. Suffix block
//! 5. Implicit allow (no list matched)

mod domain_set;
mod error;
mod resolver;
mod verdict;

pub mod config;
pub mod defaults;
pub mod extract;
pub mod fetch;
pub mod sets;

// Re-export core types
pub use domain_set::DomainSet;
pub use error::{Error, Result};
pub use resolver::UpstreamResolver;
pub use verdict::Verdict;

pub use config::{Channel, CoreConfig, Forward};
pub use defaults::Lists;
pub use extract::{ExtractMode, Extractor, GenericExtractor, LinePolicy};
pub use fetch::{Downloader, Getter, HttpGetter, ListDownloader};
pub use sets::{Sets, SetsBuilder, Sizes};
