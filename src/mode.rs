use crate::error::TraceError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a batch of traces came from.
///
/// `Validate` traces are produced client-side, one per node, and are shown as a
/// flat list. `Test` and `Run` traces come from the server and carry the parent
/// linkage needed to rebuild real branching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    Validate,
    Test,
    Run,
}

/// How the forest is assembled for a given mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Flat,
    Linked,
}

impl RunMode {
    pub fn strategy(self) -> Strategy {
        match self {
            RunMode::Validate => Strategy::Flat,
            RunMode::Test | RunMode::Run => Strategy::Linked,
        }
    }
}

impl Strategy {
    /// Picks a strategy from a raw mode selector. Only `"validate"` is flat;
    /// any other selector, known or not, is treated as a linked run.
    pub fn from_selector(selector: &str) -> Self {
        if selector == "validate" {
            Strategy::Flat
        } else {
            Strategy::Linked
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Validate => write!(f, "validate"),
            RunMode::Test => write!(f, "test"),
            RunMode::Run => write!(f, "run"),
        }
    }
}

impl FromStr for RunMode {
    type Err = TraceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "validate" => Ok(RunMode::Validate),
            "test" => Ok(RunMode::Test),
            "run" => Ok(RunMode::Run),
            other => Err(TraceError::UnknownMode(other.to_string())),
        }
    }
}
