//! Remote list fetching.
//!
//! This module provides:
//! - [`Getter`]: fetch one remote list and extract its domains
//! - [`Downloader`]: fetch a bundle of lists, skipping sources that fail
//!
//! Gzip compressed bodies are decompressed before extraction.

use flate2::read::GzDecoder;
use std::io::Read;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Forward;
use crate::defaults::Lists;
use crate::extract::{ExtractMode, Extractor, LinePolicy};
use crate::resolver::UpstreamResolver;
use crate::{DomainSet, Error, Result};

/// Default per-request timeout for remote lists.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// User agent sent with every list request.
pub fn user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

/// A Getter downloads a single source list.
pub trait Getter {
    /// Fetch `source` and extract its domains.
    fn get(&self, source: &str) -> Result<DomainSet>;
}

/// A Downloader downloads every source of a bundle.
pub trait Downloader {
    /// Fetch all sources in `lists` and return the union of the ones that
    /// succeeded. Individual failures are logged and skipped.
    fn download(&self, lists: &Lists) -> DomainSet;
}

/// HTTP implementation of [`Getter`].
pub struct HttpGetter {
    client: reqwest::blocking::Client,
    extractor: Box<dyn Extractor>,
}

impl HttpGetter {
    /// Create a getter using the generic extractor and the default timeout.
    ///
    /// List hosts are resolved through the `forward` upstreams, or the
    /// system resolver when it names none.
    pub fn new(forward: &Forward) -> Result<Self> {
        Self::with_timeout(forward, DEFAULT_TIMEOUT)
    }

    /// Create a getter with a custom per-request timeout.
    pub fn with_timeout(forward: &Forward, timeout: Duration) -> Result<Self> {
        let mut builder = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent());

        if !forward.addresses.is_empty() {
            let resolver = UpstreamResolver::new(forward)?;
            log::debug!(
                "resolving list hosts through {:?} ({})",
                resolver.upstreams(),
                forward.server_name
            );
            builder = builder.dns_resolver(Arc::new(resolver));
        }

        Ok(Self {
            client: builder.build()?,
            extractor: ExtractMode::Generic.extractor(LinePolicy::Skip),
        })
    }

    /// Replace the extractor used on response bodies.
    pub fn with_extractor(mut self, extractor: Box<dyn Extractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Check if data is gzip compressed.
    fn is_gzip(data: &[u8]) -> bool {
        data.len() >= 2 && data[0] == 0x1f && data[1] == 0x8b
    }
}

impl Getter for HttpGetter {
    fn get(&self, source: &str) -> Result<DomainSet> {
        // the response is dropped, and its connection released, on every return path
        let response = self.client.get(source).send()?;

        let code = response.status().as_u16();
        if code >= 400 {
            return Err(Error::Status {
                url: source.to_string(),
                code,
            });
        }

        let raw_data = response.bytes()?;

        let single = if Self::is_gzip(&raw_data) {
            let mut decoder = GzDecoder::new(&raw_data[..]);
            let mut data = Vec::new();
            decoder.read_to_end(&mut data).map_err(Error::Decompress)?;
            self.extractor.extract(&mut &data[..])?
        } else {
            self.extractor.extract(&mut &raw_data[..])?
        };

        log::info!("got {} domains from {:?}", single.len(), source);

        Ok(single)
    }
}

/// Sequential [`Downloader`] over any [`Getter`].
pub struct ListDownloader<G> {
    getter: G,
}

impl<G: Getter> ListDownloader<G> {
    /// Create a downloader that fetches each source with `getter`.
    pub fn new(getter: G) -> Self {
        Self { getter }
    }

    /// Get a reference to the underlying getter.
    pub fn getter(&self) -> &G {
        &self.getter
    }
}

impl<G: Getter> Downloader for ListDownloader<G> {
    fn download(&self, lists: &Lists) -> DomainSet {
        let mut combo = DomainSet::with_capacity(100);
        for source in lists.all() {
            match self.getter.get(source) {
                Ok(single) => combo.merge(single),
                Err(e) => {
                    log::error!("failed to fetch source {:?}, skip: {}", source, e);
                }
            }
        }
        combo
    }
}
