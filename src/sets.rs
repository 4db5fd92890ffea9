//! Classification store.
//!
//! [`Sets`] holds the four domain sets a query is checked against and is
//! built once from a [`CoreConfig`]. After construction it is read-only and
//! can be shared freely between query-handling threads.
//!
//! # Sources
//!
//! Each set is filled, in order, from:
//! 1. Inline entries in the configuration (taken verbatim)
//! 2. A single list file
//! 3. Every regular file of a list directory (sub-directories are skipped)
//!
//! The block set additionally receives the default remote bundle unless
//! defaults are disabled. Remote failures are logged and skipped; local
//! file and directory failures abort construction.
//!
//! # Precedence
//!
//! 1. Explicit allow
//! 2. Suffix allow
//! 3. Explicit block
//! 4. Suffix block
//! 5. Implicit allow

use std::fs::{self, File};
use std::path::Path;

use crate::config::{Channel, CoreConfig};
use crate::defaults::{self, Lists};
use crate::extract::{ExtractMode, Extractor, LinePolicy};
use crate::fetch::{Downloader, HttpGetter, ListDownloader};
use crate::{DomainSet, Error, Result, Verdict};

/// Number of entries in each of the four sets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sizes {
    pub allow: usize,
    pub allow_suffix: usize,
    pub block: usize,
    pub suffix_block: usize,
}

/// Sets enables efficient look-ups of whether a domain should be allowed or blocked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sets {
    allow: DomainSet,
    allow_suffix: DomainSet,
    block: DomainSet,
    suffix_block: DomainSet,
}

impl Sets {
    /// Build sets from `config`, fetching the default bundle over HTTP
    /// unless `no_defaults` is set. List hosts are resolved through the
    /// `forward` upstreams.
    pub fn new(config: CoreConfig) -> Result<Self> {
        if config.no_defaults {
            return SetsBuilder::new(config).build();
        }

        match HttpGetter::new(&config.forward) {
            Ok(getter) => {
                let downloader = ListDownloader::new(getter);
                SetsBuilder::new(config).downloader(&downloader).build()
            }
            Err(e) => {
                log::error!("failed to create HTTP client, skip default lists: {}", e);
                SetsBuilder::new(config).build()
            }
        }
    }

    /// Build sets from `config`, fetching defaults with `downloader`.
    pub fn with_downloader(config: CoreConfig, downloader: &dyn Downloader) -> Result<Self> {
        SetsBuilder::new(config).downloader(downloader).build()
    }

    /// Build sets directly from in-memory domain sets.
    pub fn from_parts(
        allow: DomainSet,
        allow_suffix: DomainSet,
        block: DomainSet,
        suffix_block: DomainSet,
    ) -> Self {
        Self {
            allow,
            allow_suffix,
            block,
            suffix_block,
        }
    }

    /// Get the number of entries in each set.
    pub fn sizes(&self) -> Sizes {
        Sizes {
            allow: self.allow.len(),
            allow_suffix: self.allow_suffix.len(),
            block: self.block.len(),
            suffix_block: self.suffix_block.len(),
        }
    }

    /// Whether domain is on the explicit allow list.
    #[inline]
    pub fn allow(&self, domain: &str) -> bool {
        self.allow.contains(domain)
    }

    /// Whether domain, or one of its parents, is on the suffix allow list.
    #[inline]
    pub fn allow_by_suffix(&self, domain: &str) -> bool {
        self.allow_suffix.contains_suffix(domain)
    }

    /// Whether domain is on the explicit block list.
    #[inline]
    pub fn block_by_match(&self, domain: &str) -> bool {
        self.block.contains(domain)
    }

    /// Whether domain, or one of its parents, is on the suffix block list.
    #[inline]
    pub fn block_by_suffix(&self, domain: &str) -> bool {
        self.suffix_block.contains_suffix(domain)
    }

    /// Classify a domain. The first matching list wins; any allow signal
    /// overrides every block signal.
    ///
    /// Exact lookups ignore a trailing dot, so `example.com.` and
    /// `example.com` always classify the same.
    pub fn classify(&self, domain: &str) -> Verdict {
        if self.allow(domain) || self.allow(fqdn_trimmed(domain)) {
            Verdict::ExplicitAllow
        } else if self.allow_by_suffix(domain) {
            Verdict::SuffixAllow
        } else if self.block_by_match(domain) || self.block_by_match(fqdn_trimmed(domain)) {
            Verdict::ExplicitBlock
        } else if self.block_by_suffix(domain) {
            Verdict::SuffixBlock
        } else {
            Verdict::ImplicitAllow
        }
    }

    /// Whether queries for domain should be blocked.
    pub fn is_blocked(&self, domain: &str) -> bool {
        self.classify(domain).is_blocked()
    }
}

/// Strip a single trailing root dot.
fn fqdn_trimmed(domain: &str) -> &str {
    domain.strip_suffix('.').unwrap_or(domain)
}

/// Assembles [`Sets`] from a configuration.
pub struct SetsBuilder<'a> {
    config: CoreConfig,
    downloader: Option<&'a dyn Downloader>,
    defaults: &'a Lists,
    extractor: Box<dyn Extractor>,
}

impl<'a> SetsBuilder<'a> {
    /// Create a builder for `config` with no downloader.
    ///
    /// Without a downloader the default bundle is never fetched.
    pub fn new(config: CoreConfig) -> Self {
        Self {
            config,
            downloader: None,
            defaults: defaults::defaults(),
            extractor: ExtractMode::Generic.extractor(LinePolicy::Skip),
        }
    }

    /// Fetch the default bundle with `downloader`.
    pub fn downloader(mut self, downloader: &'a dyn Downloader) -> Self {
        self.downloader = Some(downloader);
        self
    }

    /// Use a different default bundle.
    pub fn defaults(mut self, lists: &'a Lists) -> Self {
        self.defaults = lists;
        self
    }

    /// Use a different malformed-line policy for local files.
    pub fn line_policy(mut self, policy: LinePolicy) -> Self {
        self.extractor = ExtractMode::Generic.extractor(policy);
        self
    }

    /// Build the sets. Consumes the configuration.
    pub fn build(self) -> Result<Sets> {
        let config = self.config;
        let extractor = self.extractor.as_ref();

        let mut block = DomainSet::with_capacity(100);

        if !config.no_defaults {
            match self.downloader {
                Some(downloader) => block.merge(downloader.download(self.defaults)),
                None => log::warn!("no downloader configured, skip default lists"),
            }
        }

        let allow = load_channel(&config.allow, DomainSet::new(), extractor)?;
        let allow_suffix = load_channel(&config.allow_suffix, DomainSet::new(), extractor)?;
        let block = load_channel(&config.block, block, extractor)?;
        let suffix_block = load_channel(&config.suffix_block, DomainSet::new(), extractor)?;

        let sets = Sets {
            allow,
            allow_suffix,
            block,
            suffix_block,
        };

        let sizes = sets.sizes();
        log::info!("domains on explicit allow-list(s): {}", sizes.allow);
        log::info!("domains on suffix allow-list(s): {}", sizes.allow_suffix);
        log::info!("domains on explicit block-list(s): {}", sizes.block);
        log::info!("domains on suffix block-list(s): {}", sizes.suffix_block);

        Ok(sets)
    }
}

/// Merge every source of `channel` into `set`.
fn load_channel(
    channel: &Channel,
    mut set: DomainSet,
    extractor: &dyn Extractor,
) -> Result<DomainSet> {
    set.insert_all(&channel.inline);

    if let Some(ref file) = channel.file {
        set.merge(load_file(file, extractor)?);
    }

    if let Some(ref dir) = channel.dir {
        load_dir(dir, &mut set, extractor)?;
    }

    Ok(set)
}

/// Extract the domains of a single list file.
fn load_file(path: &Path, extractor: &dyn Extractor) -> Result<DomainSet> {
    let mut file = File::open(path).map_err(|source| Error::OpenFile {
        path: path.to_path_buf(),
        source,
    })?;

    let set = extractor.extract(&mut file).map_err(|e| Error::Extract {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;

    log::debug!("loaded {} domains from {:?}", set.len(), path);
    Ok(set)
}

/// Merge every regular file in `dir` into `set`, in file name order.
fn load_dir(dir: &Path, set: &mut DomainSet, extractor: &dyn Extractor) -> Result<()> {
    let read_dir_err = |source: std::io::Error| Error::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = fs::read_dir(dir)
        .map_err(read_dir_err)?
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(read_dir_err)?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            continue;
        }
        set.merge(load_file(&path, extractor)?);
    }

    Ok(())
}
