//! The line the writer appends to the shared log.

use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDateTime};
use vshare_config::Identity;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";
const TIMESTAMP_PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const FIELD_SEPARATOR: &str = " | ";

#[derive(Debug, thiserror::Error)]
pub enum RecordParseError {
    #[error("missing field: {0}")]
    MissingField(&'static str),
    #[error("invalid timestamp: {0}")]
    Timestamp(#[from] chrono::ParseError),
    #[error("invalid iteration: {0}")]
    Iteration(String),
}

/// One identity record. Rendered as
/// `Pod: <host> | Node: <node> | Timestamp: <iso> | Iteration: <i>/<n>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedRecord {
    pub host: String,
    pub node: String,
    pub timestamp: NaiveDateTime,
    pub iteration: u32,
    pub total: u32,
}

impl SharedRecord {
    /// Stamp a record with the local wall clock.
    pub fn now(identity: &Identity, iteration: u32, total: u32) -> Self {
        Self {
            host: identity.hostname.clone(),
            node: identity.node.clone(),
            timestamp: Local::now().naive_local(),
            iteration,
            total,
        }
    }

    /// The record as it is stored: a single newline-terminated line.
    pub fn to_line(&self) -> String {
        format!("{}\n", self)
    }
}

impl fmt::Display for SharedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pod: {} | Node: {} | Timestamp: {} | Iteration: {}/{}",
            self.host,
            self.node,
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.iteration,
            self.total
        )
    }
}

fn field<'a>(
    parts: &mut impl Iterator<Item = &'a str>,
    prefix: &'static str,
) -> Result<&'a str, RecordParseError> {
    parts
        .next()
        .and_then(|p| p.strip_prefix(prefix))
        .ok_or(RecordParseError::MissingField(prefix))
}

impl FromStr for SharedRecord {
    type Err = RecordParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_end_matches(['\n', '\r']);
        let mut parts = line.split(FIELD_SEPARATOR);

        let host = field(&mut parts, "Pod: ")?;
        let node = field(&mut parts, "Node: ")?;
        let timestamp = field(&mut parts, "Timestamp: ")?;
        let iteration = field(&mut parts, "Iteration: ")?;

        let timestamp = NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_PARSE_FORMAT)?;
        let (i, n) = iteration
            .split_once('/')
            .ok_or_else(|| RecordParseError::Iteration(iteration.to_string()))?;
        let parse = |s: &str| {
            s.parse::<u32>()
                .map_err(|_| RecordParseError::Iteration(iteration.to_string()))
        };

        Ok(Self {
            host: host.to_string(),
            node: node.to_string(),
            timestamp,
            iteration: parse(i)?,
            total: parse(n)?,
        })
    }
}
