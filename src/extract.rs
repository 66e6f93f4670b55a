//! Line-oriented extraction of candidate TLD tokens from feed bodies

use crate::config::LineRule;
use crate::error::{Error, Result};
use futures::{Stream, StreamExt};
use regex::Regex;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_stream::wrappers::SplitStream;

/// Lines starting with this character are comments in plain-list feeds
pub const COMMENT_MARKER: char = '#';

/// A compiled [`LineRule`]
///
/// Compiling happens once per feed before its task starts, so a bad pattern
/// is reported as a configuration error instead of failing mid-run.
#[derive(Clone, Debug)]
pub enum LineMatcher {
    /// Any line not starting with [`COMMENT_MARKER`]
    PlainList,
    /// Any line containing neither `/` nor `.`
    Structured,
    /// First match of the expression
    Pattern(Regex),
}

impl LineMatcher {
    /// Compile a configured rule
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a pattern rule does not compile.
    pub fn compile(rule: &LineRule) -> Result<Self> {
        match rule {
            LineRule::PlainList => Ok(Self::PlainList),
            LineRule::Structured => Ok(Self::Structured),
            LineRule::Pattern { regex } => Regex::new(regex)
                .map(Self::Pattern)
                .map_err(|e| Error::Config {
                    message: format!("invalid pattern '{}': {}", regex, e),
                    key: None,
                }),
        }
    }

    /// The candidate token on `line`, if the line qualifies
    ///
    /// Trailing whitespace is never part of a token, and an empty candidate
    /// counts as no match.
    #[must_use]
    pub fn find<'a>(&self, line: &'a str) -> Option<&'a str> {
        let candidate = match self {
            Self::PlainList => {
                if line.starts_with(COMMENT_MARKER) {
                    return None;
                }
                line.trim_end()
            }
            Self::Structured => {
                if line.contains(['/', '.']) {
                    return None;
                }
                line.trim_end()
            }
            Self::Pattern(re) => re.find(line)?.as_str().trim_end(),
        };
        (!candidate.is_empty()).then_some(candidate)
    }
}

/// Lazily extract candidate tokens from a feed body.
///
/// The body is split on `\n` and a trailing `\r` is dropped from each line.
/// Lines are decoded as UTF-8 lossily. Tokens come out in body order, at
/// most one per line. A read error is yielded as an `Err` item; callers are
/// expected to stop there.
pub fn extract<R>(reader: R, matcher: LineMatcher) -> impl Stream<Item = std::io::Result<String>>
where
    R: AsyncBufRead + Unpin,
{
    SplitStream::new(reader.split(b'\n')).filter_map(move |line| {
        let token = match line {
            Ok(bytes) => {
                let text = String::from_utf8_lossy(&bytes);
                let text = text.strip_suffix('\r').unwrap_or(&text);
                matcher.find(text).map(|t| Ok(t.to_string()))
            }
            Err(e) => Some(Err(e)),
        };
        std::future::ready(token)
    })
}
