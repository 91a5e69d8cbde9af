use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Whether each build starts from a clean output tree.
///
/// - `Incremental`: run only the build command (default).
/// - `Clean`: run the clean command first, then the build command, as one
///   shell invocation (`clean && build`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CleanPolicy {
    Incremental,
    Clean,
}

impl Default for CleanPolicy {
    fn default() -> Self {
        CleanPolicy::Incremental
    }
}

impl FromStr for CleanPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "incremental" => Ok(CleanPolicy::Incremental),
            "clean" => Ok(CleanPolicy::Clean),
            other => Err(format!(
                "invalid clean policy: {other} (expected \"incremental\" or \"clean\")"
            )),
        }
    }
}

impl fmt::Display for CleanPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CleanPolicy::Incremental => f.write_str("incremental"),
            CleanPolicy::Clean => f.write_str("clean"),
        }
    }
}
