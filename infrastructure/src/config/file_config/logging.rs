//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// ```toml
/// [logging]
/// conversation_log = "logs/session.jsonl"   # JSONL transcript of events
/// dir = "logs"                              # daily diagnostic log files
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    pub conversation_log: Option<PathBuf>,
    pub dir: Option<PathBuf>,
}
