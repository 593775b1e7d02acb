use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
#[error("invalid stream filter {0:?}: expected all, stdout or stderr")]
pub struct InvalidStreamFilter(pub String);

/// Which output stream's records the decoder lets through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamFilter {
    #[default]
    All,
    Stdout,
    Stderr,
}

impl StreamFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamFilter::All => "all",
            StreamFilter::Stdout => "stdout",
            StreamFilter::Stderr => "stderr",
        }
    }

    /// Whether a record tagged `stream` passes. Untagged records only pass `All`.
    #[inline]
    pub fn accepts(&self, stream: Option<&str>) -> bool {
        match self {
            StreamFilter::All => true,
            _ => stream == Some(self.as_str()),
        }
    }
}

impl FromStr for StreamFilter {
    type Err = InvalidStreamFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(StreamFilter::All),
            "stdout" => Ok(StreamFilter::Stdout),
            "stderr" => Ok(StreamFilter::Stderr),
            other => Err(InvalidStreamFilter(other.to_string())),
        }
    }
}

impl fmt::Display for StreamFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
