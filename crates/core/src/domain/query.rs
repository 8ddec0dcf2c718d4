use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DecisionError;

/// A trimmed, non-empty product query.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Query(String);

impl Query {
    pub fn parse(raw: &str) -> Result<Self, DecisionError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DecisionError::InvalidInput);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in Unicode scalar values.
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for Query {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
