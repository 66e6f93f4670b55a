//! Concurrent merge of every feed into one sorted, deduplicated TLD list
//!
//! Each feed gets its own task running fetch, extract and normalize. The only
//! state the tasks share is the [`TldSet`] they insert into. The aggregator
//! waits for every task, even after one has failed, and only then decides
//! whether the run produced a list or an error.

use crate::config::{Config, FeedConfig};
use crate::error::{Error, Result};
use crate::extract::{LineMatcher, extract};
use crate::fetch::Fetcher;
use crate::normalize::normalize;
use futures::StreamExt;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// A feed location paired with its compiled line rule
#[derive(Clone, Debug)]
pub struct Feed {
    url: String,
    matcher: LineMatcher,
}

impl Feed {
    /// Create a feed from an already compiled matcher
    pub fn new(url: impl Into<String>, matcher: LineMatcher) -> Self {
        Self {
            url: url.into(),
            matcher,
        }
    }

    /// Build a feed from its configuration, compiling the line rule
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the rule's pattern is invalid.
    pub fn from_config(config: &FeedConfig) -> Result<Self> {
        Ok(Self::new(
            config.url.clone(),
            LineMatcher::compile(&config.rule)?,
        ))
    }

    /// Feed location
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Set of canonical TLDs shared by all feed tasks of a run
///
/// Clones are handles to the same set. Inserting is the only mutation and
/// inserting a TLD that is already present has no effect.
#[derive(Clone, Debug, Default)]
pub struct TldSet {
    inner: Arc<Mutex<HashSet<String>>>,
}

impl TldSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a TLD; returns `false` if it was already present
    pub async fn insert(&self, tld: String) -> bool {
        self.inner.lock().await.insert(tld)
    }

    /// Number of distinct TLDs collected so far
    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    /// Whether nothing has been collected yet
    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }

    /// Snapshot of the contents in ascending byte order
    pub async fn sorted(&self) -> Vec<String> {
        let mut tlds: Vec<String> = self.inner.lock().await.iter().cloned().collect();
        tlds.sort_unstable();
        tlds
    }
}

/// Outcome of a successful run
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TldList {
    /// Canonical TLDs, strictly ascending
    pub tlds: Vec<String>,

    /// Feed locations in registration order
    pub sources: Vec<String>,
}

/// Runs every feed concurrently and merges their TLDs
pub struct Aggregator {
    fetcher: Fetcher,
    feeds: Vec<Feed>,
}

impl Aggregator {
    /// Create an aggregator over `feeds`, kept in the given order
    pub fn new(fetcher: Fetcher, feeds: Vec<Feed>) -> Self {
        Self { fetcher, feeds }
    }

    /// Build an aggregator for the configured feeds
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a feed's rule does not compile.
    pub fn from_config(config: &Config, fetcher: Fetcher) -> Result<Self> {
        let feeds = config
            .feeds
            .iter()
            .map(Feed::from_config)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(fetcher, feeds))
    }

    /// Registered feeds
    pub fn feeds(&self) -> &[Feed] {
        &self.feeds
    }

    /// Fetch every feed and return the merged, sorted list
    ///
    /// One task is spawned per feed. When a task fails the others are not
    /// cancelled; every task is awaited before the first recorded error is
    /// returned. There is no partial result.
    ///
    /// # Errors
    ///
    /// Returns the first feed failure observed: [`Error::Transport`],
    /// [`Error::HttpStatus`], [`Error::Stream`], or [`Error::Task`] if a task
    /// panicked.
    pub async fn run(&self) -> Result<TldList> {
        let set = TldSet::new();
        let mut sources = Vec::with_capacity(self.feeds.len());
        let mut tasks = JoinSet::new();

        for feed in &self.feeds {
            sources.push(feed.url.clone());

            let fetcher = self.fetcher.clone();
            let feed = feed.clone();
            let set = set.clone();
            tasks.spawn(async move { collect_feed(&fetcher, &feed, &set).await });
        }

        let mut first_error: Option<Error> = None;
        while let Some(joined) = tasks.join_next().await {
            match joined.map_err(Error::from).and_then(|outcome| outcome) {
                Ok(accepted) => debug!(accepted, "feed task finished"),
                Err(e) => {
                    warn!(error = %e, "feed task failed");
                    first_error.get_or_insert(e);
                }
            }
        }

        if let Some(e) = first_error {
            return Err(e);
        }

        let tlds = set.sorted().await;
        info!(
            tlds = tlds.len(),
            feeds = sources.len(),
            "merged TLDs from all feeds"
        );
        Ok(TldList { tlds, sources })
    }
}

/// Fetch one feed and insert its accepted TLDs; returns how many tokens
/// survived normalization
async fn collect_feed(fetcher: &Fetcher, feed: &Feed, set: &TldSet) -> Result<usize> {
    info!("Fetching {}", feed.url);

    let reader = fetcher.fetch(&feed.url).await?;
    let tokens = extract(reader, feed.matcher.clone());
    futures::pin_mut!(tokens);

    let mut accepted = 0usize;
    while let Some(token) = tokens.next().await {
        let token = token.map_err(|source| Error::Stream {
            url: feed.url.clone(),
            source,
        })?;
        if let Some(tld) = normalize(&token) {
            set.insert(tld).await;
            accepted += 1;
        }
    }

    debug!(url = %feed.url, accepted, "feed extracted");
    Ok(accepted)
}
