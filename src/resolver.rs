//! Name resolution for list downloads through the configured upstreams.
//!
//! List hosts are resolved over DNS-over-TLS against the [`Forward`]
//! addresses instead of the system resolver.

use hickory_resolver::config::{NameServerConfigGroup, ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;
use once_cell::sync::OnceCell;
use reqwest::dns::{Addrs, Name, Resolve, Resolving};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use crate::config::Forward;
use crate::{Error, Result};

/// DNS-over-TLS port of every upstream.
pub const DOT_PORT: u16 = 853;

/// Parse forward addresses into upstream IPs.
pub fn upstream_ips(forward: &Forward) -> Result<Vec<IpAddr>> {
    forward
        .addresses
        .iter()
        .map(|address| {
            address
                .trim()
                .parse::<IpAddr>()
                .map_err(|_| Error::Config(format!("invalid upstream address {:?}", address)))
        })
        .collect()
}

/// [`Resolve`] implementation querying the forward upstreams in order.
#[derive(Clone)]
pub struct UpstreamResolver {
    config: ResolverConfig,
    opts: ResolverOpts,
    // created on first lookup, inside the client's runtime
    state: Arc<OnceCell<TokioAsyncResolver>>,
}

impl UpstreamResolver {
    /// Create a resolver for the upstreams named by `forward`.
    pub fn new(forward: &Forward) -> Result<Self> {
        let ips = upstream_ips(forward)?;
        if ips.is_empty() {
            return Err(Error::Config("no upstream addresses to resolve through".to_string()));
        }

        let group =
            NameServerConfigGroup::from_ips_tls(&ips, DOT_PORT, forward.server_name.clone(), true);
        let config = ResolverConfig::from_parts(None, Vec::new(), group);

        let mut opts = ResolverOpts::default();
        if forward.max_fails > 0 {
            opts.attempts = forward.max_fails as usize;
        }

        Ok(Self {
            config,
            opts,
            state: Arc::new(OnceCell::new()),
        })
    }

    /// Socket addresses of the upstreams, in query order.
    pub fn upstreams(&self) -> Vec<SocketAddr> {
        self.config
            .name_servers()
            .iter()
            .map(|ns| ns.socket_addr)
            .collect()
    }

    /// TLS name the upstreams must present.
    pub fn server_name(&self) -> Option<&str> {
        self.config
            .name_servers()
            .first()
            .and_then(|ns| ns.tls_dns_name.as_deref())
    }

    /// Attempts per query before giving up on an upstream.
    pub fn attempts(&self) -> usize {
        self.opts.attempts
    }
}

impl Resolve for UpstreamResolver {
    fn resolve(&self, name: Name) -> Resolving {
        let this = self.clone();
        Box::pin(async move {
            let resolver = this
                .state
                .get_or_init(|| TokioAsyncResolver::tokio(this.config.clone(), this.opts.clone()));
            let lookup = resolver.lookup_ip(name.as_str()).await?;
            log::debug!("resolved {} through upstreams", name.as_str());

            let addrs: Addrs = Box::new(
                lookup
                    .into_iter()
                    .map(|ip| SocketAddr::new(ip, 0))
                    .collect::<Vec<_>>()
                    .into_iter(),
            );
            Ok::<_, Box<dyn std::error::Error + Send + Sync>>(addrs)
        })
    }
}
