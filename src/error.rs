// Typed errors for boundary parsing and forecasting

use thiserror::Error;

/// A string from an external source (inventory file, query string) did not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value:?}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForecastError {
    #[error("series observation at index {index} is not a finite number")]
    NonFiniteObservation { index: usize },
}

/// Lowercase and fold `-`/space separators to `_` so "Fabric IP", "fabric-ip" and "fabric_ip" match.
pub(crate) fn normalize_token(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}
