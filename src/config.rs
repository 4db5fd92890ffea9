//! Configuration consumed when building [`Sets`](crate::Sets).
//!
//! A [`CoreConfig`] can be assembled by hand, read from `DNSVETO_*`
//! environment variables, or loaded from YAML.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Prefix shared by every environment variable.
pub const ENV_PREFIX: &str = "DNSVETO_";

/// Port used when none is configured.
pub const DEFAULT_PORT: u16 = 5301;

/// Upstream resolvers used when none are configured.
pub const DEFAULT_UPSTREAMS: &[&str] = &["1.1.1.1", "1.0.0.1"];

/// TLS server name for the default upstreams.
pub const DEFAULT_SERVER_NAME: &str = "cloudflare-dns.com";

/// Upstream max-fails used when none is configured.
pub const DEFAULT_MAX_FAILS: u32 = 2;

/// Sources feeding one of the four domain sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Channel {
    /// Domains given directly in configuration
    pub inline: Vec<String>,
    /// Single list file
    pub file: Option<PathBuf>,
    /// Directory whose regular files are all list files
    pub dir: Option<PathBuf>,
}

impl Channel {
    /// Whether the channel names no source at all.
    pub fn is_empty(&self) -> bool {
        self.inline.is_empty() && self.file.is_none() && self.dir.is_none()
    }
}

/// Upstream forwarding parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Forward {
    /// Ordered upstream resolver addresses
    pub addresses: Vec<String>,
    /// TLS server name of the upstreams
    pub server_name: String,
    /// Failures before an upstream is considered down
    pub max_fails: u32,
}

/// Full configuration of the filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub port: u16,
    pub no_debug: bool,
    pub no_log: bool,
    /// Exact-match allow list
    pub allow: Channel,
    /// Suffix-match allow list
    pub allow_suffix: Channel,
    /// Exact-match block list
    pub block: Channel,
    /// Suffix-match block list
    pub suffix_block: Channel,
    /// Skip the built-in remote block lists
    pub no_defaults: bool,
    pub forward: Forward,
}

impl CoreConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    ///
    /// `lookup` receives full variable names such as `DNSVETO_PORT`.
    pub fn from_env_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = EnvReader { lookup };

        let mut addresses = Vec::new();
        addresses.extend(env.string("UPSTREAM_1"));
        addresses.extend(env.string("UPSTREAM_2"));

        Ok(Self {
            port: env.number("PORT")?.unwrap_or(0),
            no_debug: env.flag("NO_DEBUG")?,
            no_log: env.flag("NO_LOG")?,
            allow: env.channel("ALLOW"),
            allow_suffix: env.channel("ALLOW_SUFFIX"),
            block: env.channel("BLOCK"),
            suffix_block: env.channel("SUFFIX"),
            no_defaults: env.flag("NO_DEFAULTS")?,
            forward: Forward {
                addresses,
                server_name: env.string("UPSTREAM_NAME").unwrap_or_default(),
                max_fails: env.number("UPSTREAM_MAX_FAILS")?.unwrap_or(0),
            },
        })
    }

    /// Parse configuration from YAML. Omitted fields take their zero value.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Render configuration as YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Fill in defaults for any unset port and forwarding parameters.
    pub fn apply_defaults(&mut self) {
        if self.port == 0 {
            self.port = DEFAULT_PORT;
        }
        if self.forward.addresses.is_empty() {
            self.forward.addresses = DEFAULT_UPSTREAMS.iter().map(|s| s.to_string()).collect();
        }
        if self.forward.server_name.is_empty() {
            self.forward.server_name = DEFAULT_SERVER_NAME.to_string();
        }
        if self.forward.max_fails == 0 {
            self.forward.max_fails = DEFAULT_MAX_FAILS;
        }
    }

    /// Check the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        if !self.no_defaults && self.forward.addresses.is_empty() {
            return Err(Error::Config(
                "at least one upstream address is required when defaults are enabled".to_string(),
            ));
        }
        crate::resolver::upstream_ips(&self.forward)?;
        Ok(())
    }

    /// Report the effective configuration.
    pub fn log(&self) {
        log::info!("port: {}", self.port);
        log::info!("no-debug: {}", self.no_debug);
        log::info!("no-log: {}", self.no_log);
        log::info!("defaults: {}", !self.no_defaults);
        log_channel("allow", &self.allow);
        log_channel("allow-suffix", &self.allow_suffix);
        log_channel("block", &self.block);
        log_channel("suffix-block", &self.suffix_block);
        log::info!("forward upstreams: {:?}", self.forward.addresses);
        log::info!("forward name: {}", self.forward.server_name);
        log::info!("forward max fails: {}", self.forward.max_fails);
    }
}

fn log_channel(name: &str, channel: &Channel) {
    log::info!("{} domains: {:?}", name, channel.inline);
    if let Some(ref file) = channel.file {
        log::info!("{} file: {:?}", name, file);
    }
    if let Some(ref dir) = channel.dir {
        log::info!("{} dir: {:?}", name, dir);
    }
}

/// Typed access to prefixed environment variables.
struct EnvReader<F> {
    lookup: F,
}

impl<F: Fn(&str) -> Option<String>> EnvReader<F> {
    fn var_name(key: &str) -> String {
        format!("{}{}", ENV_PREFIX, key)
    }

    /// Non-empty, trimmed value.
    fn string(&self, key: &str) -> Option<String> {
        (self.lookup)(&Self::var_name(key))
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn list(&self, key: &str) -> Vec<String> {
        self.string(key)
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn path(&self, key: &str) -> Option<PathBuf> {
        self.string(key).map(PathBuf::from)
    }

    fn flag(&self, key: &str) -> Result<bool> {
        match self.string(key) {
            None => Ok(false),
            Some(v) => match v.to_lowercase().as_str() {
                "1" | "true" | "t" | "yes" | "y" | "on" => Ok(true),
                "0" | "false" | "f" | "no" | "n" | "off" => Ok(false),
                _ => Err(Error::Env {
                    var: Self::var_name(key),
                    value: v,
                }),
            },
        }
    }

    fn number<T: std::str::FromStr>(&self, key: &str) -> Result<Option<T>> {
        match self.string(key) {
            None => Ok(None),
            Some(v) => v.parse().map(Some).map_err(|_| Error::Env {
                var: Self::var_name(key),
                value: v,
            }),
        }
    }

    fn channel(&self, key: &str) -> Channel {
        Channel {
            inline: self.list(key),
            file: self.path(&format!("{}_FILE", key)),
            dir: self.path(&format!("{}_DIR", key)),
        }
    }
}
