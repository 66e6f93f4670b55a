//! # tldsgen
//!
//! Generates the list of public top-level domains used by URL matchers.
//!
//! Two authoritative feeds are fetched concurrently: the IANA root zone list
//! and the Public Suffix List. Each feed's lines are filtered by a feed
//! specific rule, tokens are lowercased, punycode labels are dropped, and
//! the union is sorted and written out as a Go source file declaring
//! `var TLDs = []string{...}`.
//!
//! Every run recomputes the whole list. Any failure, whether a feed that
//! cannot be fetched or an artifact that cannot be written, fails the run:
//! a partial list is never written.
//!
//! ## Quick Start
//!
//! ```no_run
//! use tldsgen::{Config, generate};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let list = generate(&Config::default()).await?;
//!     println!("wrote {} TLDs", list.tlds.len());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Concurrent feed merging
pub mod aggregate;
/// Artifact rendering and writing
pub mod artifact;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Candidate token extraction
pub mod extract;
/// Feed retrieval
pub mod fetch;
/// TLD canonicalization
pub mod normalize;

pub use aggregate::{Aggregator, Feed, TldList, TldSet};
pub use artifact::{ArtifactWriter, Template};
pub use config::{Config, FeedConfig, LineRule, OutputConfig};
pub use error::{Error, Result};
pub use extract::LineMatcher;
pub use fetch::Fetcher;

/// Run the whole pipeline for `config` and write the artifact
///
/// The configuration is validated and the template compiled before any
/// request is made. The artifact is only written once every feed has been
/// merged successfully.
///
/// # Errors
///
/// Returns the first error of the run; see [`Error`] for the kinds.
pub async fn generate(config: &Config) -> Result<TldList> {
    config.validate()?;

    let template = Template::new()?;
    let writer =
        ArtifactWriter::new(template, config.output.package.clone()).atomic(config.output.atomic);

    let aggregator = Aggregator::from_config(config, Fetcher::new()?)?;
    let list = aggregator.run().await?;

    writer.write(&list, &config.output.path).await?;
    Ok(list)
}
