//! Knowledge configuration from TOML (`[knowledge]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Local market-document library
///
/// ```toml
/// [knowledge]
/// documents_dir = "market_docs"
/// top_k = 3
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileKnowledgeConfig {
    /// Directory holding `.txt` / `.md` documents
    pub documents_dir: PathBuf,
    /// Passages returned per query
    pub top_k: usize,
}

impl Default for FileKnowledgeConfig {
    fn default() -> Self {
        Self {
            documents_dir: PathBuf::from("market_docs"),
            top_k: 3,
        }
    }
}
