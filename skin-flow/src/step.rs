use serde::{Deserialize, Serialize};
use std::fmt;

/// The four views of the wizard, in the order a user normally walks them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    /// Collect name and age
    #[default]
    Info,
    /// Select (or replace) the image to analyze
    Upload,
    /// Analysis request in flight
    Predict,
    /// Show the diagnosis
    Result,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Info => "info",
            Step::Upload => "upload",
            Step::Predict => "predict",
            Step::Result => "result",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
