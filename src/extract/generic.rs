//! Generic line oriented list parser.

use std::io::{BufRead, BufReader, Read};
use std::net::IpAddr;

use once_cell::sync::Lazy;
use regex::Regex;

use super::{Extractor, LinePolicy};
use crate::{DomainSet, Error, Result};

/// Hostname with at least two labels. Underscores are tolerated since
/// real block lists contain them.
static DOMAIN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[a-z0-9_](?:[a-z0-9_-]{0,61}[a-z0-9_])?\.)+[a-z0-9_](?:[a-z0-9_-]{0,61}[a-z0-9_])?$")
        .unwrap()
});

/// Names that appear in stock hosts files and are never block targets.
const HOSTS_BOILERPLATE: &[&str] = &[
    "localhost",
    "localhost.localdomain",
    "local",
    "broadcasthost",
    "ip6-localhost",
    "ip6-loopback",
    "ip6-localnet",
    "ip6-mcastprefix",
    "ip6-allnodes",
    "ip6-allrouters",
    "ip6-allhosts",
    "0.0.0.0",
];

/// Parses plain domain lists and hosts files.
///
/// ```text
/// # comment
/// ads.example.com
/// 0.0.0.0 tracker.example.com
/// 127.0.0.1 a.example.com b.example.com  # trailing comment
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericExtractor {
    policy: LinePolicy,
}

impl GenericExtractor {
    /// Create a new extractor with the given malformed-line policy.
    pub fn new(policy: LinePolicy) -> Self {
        Self { policy }
    }

    /// Get the malformed-line policy.
    pub fn policy(&self) -> LinePolicy {
        self.policy
    }

    /// Parse a single line into the domains it names and the names it
    /// rejected.
    ///
    /// Returns `None` when the line has content but is not a list entry.
    fn parse_line(line: &str) -> Option<(Vec<String>, Vec<&str>)> {
        let mut tokens = line.split_whitespace().peekable();
        let first = *tokens.peek()?;

        // hosts syntax: address followed by one or more names
        let hosts_line = first.parse::<IpAddr>().is_ok();
        let candidates: Vec<&str> = if hosts_line {
            tokens.skip(1).collect()
        } else {
            tokens.collect()
        };

        if !hosts_line && candidates.len() != 1 {
            return None;
        }

        let mut domains = Vec::with_capacity(candidates.len());
        let mut rejected = Vec::new();
        for candidate in candidates {
            let domain = candidate.trim_end_matches('.').to_lowercase();
            if HOSTS_BOILERPLATE.contains(&domain.as_str()) {
                continue;
            }
            if domain.parse::<IpAddr>().is_ok() || !DOMAIN_PATTERN.is_match(&domain) {
                rejected.push(candidate);
                continue;
            }
            domains.push(domain);
        }

        Some((domains, rejected))
    }

    fn malformed(&self, number: usize, content: &str) -> Result<()> {
        match self.policy {
            LinePolicy::Skip => {
                log::debug!("skipping malformed line {}: {:?}", number, content);
                Ok(())
            }
            LinePolicy::Strict => Err(Error::MalformedLine {
                line: number,
                content: content.to_string(),
            }),
        }
    }
}

impl Extractor for GenericExtractor {
    fn extract(&self, reader: &mut dyn Read) -> Result<DomainSet> {
        let mut set = DomainSet::with_capacity(1024);
        let mut buf_reader = BufReader::new(reader);
        let mut buf = Vec::new();
        let mut number = 0;

        loop {
            buf.clear();
            if buf_reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            number += 1;

            // list files in the wild carry latin-1 comments
            let line = String::from_utf8_lossy(&buf);

            // Remove comments
            let content = match line.find(|c: char| c == '#' || c == '!') {
                Some(pos) => &line[..pos],
                None => &line[..],
            };
            let content = content.trim();

            if content.is_empty() {
                continue;
            }

            match Self::parse_line(content) {
                Some((domains, rejected)) => {
                    if !rejected.is_empty() {
                        if self.policy == LinePolicy::Strict {
                            self.malformed(number, content)?;
                        }
                        log::debug!("skipping bad names on line {}: {:?}", number, rejected);
                    }
                    set.extend(domains);
                }
                None => self.malformed(number, content)?,
            }
        }

        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(policy: LinePolicy, text: &str) -> Result<DomainSet> {
        let mut input = text.as_bytes();
        GenericExtractor::new(policy).extract(&mut input)
    }

    #[test]
    fn test_plain_list() {
        let text = r#"
# Comment
example.com
Ads.Example.NET.

tracker.example.org # inline comment
! adblock style comment
example.com
"#;

        let set = extract(LinePolicy::Skip, text).unwrap();
        assert_eq!(set.len(), 3);
        assert!(set.contains("example.com"));
        assert!(set.contains("ads.example.net"));
        assert!(set.contains("tracker.example.org"));
    }

    #[test]
    fn test_hosts_format() {
        let text = r#"
127.0.0.1 localhost
::1 ip6-localhost ip6-loopback
255.255.255.255 broadcasthost
0.0.0.0 0.0.0.0
0.0.0.0 ads.example.com
127.0.0.1 a.example.com b.example.com
"#;

        let set = extract(LinePolicy::Strict, text).unwrap();
        assert_eq!(set.len(), 3);
        assert!(set.contains("ads.example.com"));
        assert!(set.contains("a.example.com"));
        assert!(set.contains("b.example.com"));
        assert!(!set.contains("localhost"));
    }

    #[test]
    fn test_malformed_lines_skipped_by_default() {
        let text = "good.example.com\nnot a domain\n||adblock^rule\nsingle\nalso.good.com\n";

        let set = extract(LinePolicy::default(), text).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains("good.example.com"));
        assert!(set.contains("also.good.com"));
    }

    #[test]
    fn test_malformed_line_strict() {
        let text = "good.example.com\nnot a domain\n";

        match extract(LinePolicy::Strict, text) {
            Err(Error::MalformedLine { line, content }) => {
                assert_eq!(line, 2);
                assert_eq!(content, "not a domain");
            }
            other => panic!("expected malformed line error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_utf8_is_tolerated() {
        let mut input: &[u8] = b"ads.example.com\n# maintained by Ren\xe9\ntracker.example.com\n";
        let set = GenericExtractor::new(LinePolicy::Strict)
            .extract(&mut input)
            .unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains("ads.example.com"));
        assert!(set.contains("tracker.example.com"));
    }

    #[test]
    fn test_invalid_utf8_domain_is_malformed() {
        let mut input: &[u8] = &[b'a', b'.', b'c', 0xff, 0xfe, b'\n', b'b', b'.', b'c', b'\n'];
        let set = GenericExtractor::default().extract(&mut input).unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.contains("b.c"));
    }

    #[test]
    fn test_hosts_line_keeps_valid_names() {
        let text = "0.0.0.0 ads.example.com myrouter\n127.0.0.1 -bad-.example.com a.example.com\n";

        let set = extract(LinePolicy::Skip, text).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains("ads.example.com"));
        assert!(set.contains("a.example.com"));

        match extract(LinePolicy::Strict, text) {
            Err(Error::MalformedLine { line, content }) => {
                assert_eq!(line, 1);
                assert_eq!(content, "0.0.0.0 ads.example.com myrouter");
            }
            other => panic!("expected malformed line error, got {:?}", other),
        }
    }

    #[test]
    fn test_read_error_is_fatal() {
        struct Broken;

        impl Read for Broken {
            fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "disk gone"))
            }
        }

        let result = GenericExtractor::default().extract(&mut Broken);
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_empty_input() {
        let set = extract(LinePolicy::Strict, "").unwrap();
        assert!(set.is_empty());
    }
}
