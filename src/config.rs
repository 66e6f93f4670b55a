//! Configuration types for tldsgen
//!
//! Everything has a default, so an empty TOML file (or no file at all)
//! reproduces the stock run: the IANA root zone list plus the Public Suffix
//! List, written to `tlds.go` in package `xurls`.

use crate::error::{Error, Result};
use crate::extract::LineMatcher;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// IANA's list of delegated top-level domains, one uppercase label per line
pub const IANA_TLDS_URL: &str = "https://data.iana.org/TLD/tlds-alpha-by-domain.txt";

/// The Public Suffix List
pub const PUBLIC_SUFFIX_LIST_URL: &str = "https://publicsuffix.org/list/effective_tld_names.dat";

/// Top-level configuration
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Feeds to merge, in registration order (default: IANA then PSL)
    #[serde(default = "default_feeds")]
    pub feeds: Vec<FeedConfig>,

    /// Where and how the artifact is written
    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feeds: default_feeds(),
            output: OutputConfig::default(),
        }
    }
}

/// One remote source of TLD tokens
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedConfig {
    /// HTTP(S) location of the feed
    pub url: String,

    /// Which lines of the feed carry a TLD
    pub rule: LineRule,
}

impl FeedConfig {
    /// Create a feed configuration
    pub fn new(url: impl Into<String>, rule: LineRule) -> Self {
        Self {
            url: url.into(),
            rule,
        }
    }
}

/// Rule selecting the candidate token on a feed line
///
/// In TOML: `rule = { kind = "plain-list" }`, `rule = { kind = "structured" }`
/// or `rule = { kind = "pattern", regex = "^[a-z]+$" }`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum LineRule {
    /// Every line not starting with `#` is a TLD (IANA format)
    PlainList,
    /// Only lines without `/` or `.` are TLDs (Public Suffix List format)
    Structured,
    /// The first match of a regular expression on the line
    Pattern {
        /// Regular expression, compiled once per run
        regex: String,
    },
}

/// Artifact output settings
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutputConfig {
    /// Destination file (default: "tlds.go")
    #[serde(default = "default_output_path")]
    pub path: PathBuf,

    /// Go package declared by the artifact (default: "xurls")
    #[serde(default = "default_package")]
    pub package: String,

    /// Write to a temporary file and rename it over the destination (default: true)
    ///
    /// When disabled the destination is truncated and written in place, so a
    /// failed write can leave it empty or partial.
    #[serde(default = "default_true")]
    pub atomic: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            package: default_package(),
            atomic: true,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Missing keys fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("failed to read {}: {}", path.display(), e),
            key: None,
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the text is not valid TOML for [`Config`].
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config {
            message: e.to_string(),
            key: None,
        })
    }

    /// Check the configuration before any network or file work starts
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the first offending key.
    pub fn validate(&self) -> Result<()> {
        if self.feeds.is_empty() {
            return Err(Error::config("at least one feed is required", "feeds"));
        }

        for (i, feed) in self.feeds.iter().enumerate() {
            validate_feed_url(&feed.url).map_err(|message| {
                Error::config(message, format!("feeds[{}].url", i))
            })?;
            LineMatcher::compile(&feed.rule).map_err(|e| match e {
                Error::Config { message, .. } => {
                    Error::config(message, format!("feeds[{}].rule", i))
                }
                other => other,
            })?;
        }

        if !is_go_identifier(&self.output.package) {
            return Err(Error::config(
                format!("'{}' is not a valid Go package name", self.output.package),
                "output.package",
            ));
        }

        if self.output.path.as_os_str().is_empty() {
            return Err(Error::config("must not be empty", "output.path"));
        }

        Ok(())
    }
}

fn validate_feed_url(raw: &str) -> std::result::Result<(), String> {
    let parsed = url::Url::parse(raw).map_err(|e| format!("invalid URL '{}': {}", raw, e))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(format!("unsupported scheme '{}' in '{}'", scheme, raw)),
    }
}

fn is_go_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn default_feeds() -> Vec<FeedConfig> {
    vec![
        FeedConfig::new(IANA_TLDS_URL, LineRule::PlainList),
        FeedConfig::new(PUBLIC_SUFFIX_LIST_URL, LineRule::Structured),
    ]
}

fn default_output_path() -> PathBuf {
    PathBuf::from("tlds.go")
}

fn default_package() -> String {
    "xurls".to_string()
}

fn default_true() -> bool {
    true
}
