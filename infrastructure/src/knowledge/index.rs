//! Local market-document index
//!
//! Loads `.md` / `.txt` files from a directory, splits them into paragraphs
//! and answers questions with the paragraphs sharing the most terms with the
//! question.

use async_trait::async_trait;
use finadvisor_application::ports::knowledge_query::{KnowledgeError, KnowledgeQuery};
use glob::{Pattern, glob};
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Document extensions picked up from the library directory
const EXTENSIONS: [&str; 2] = ["md", "txt"];

/// Terms shorter than this are ignored
const MIN_TERM_LEN: usize = 3;

/// Skip documents larger than this (5 MB)
const MAX_DOCUMENT_SIZE: u64 = 5 * 1024 * 1024;

const STOPWORDS: [&str; 20] = [
    "the", "and", "for", "are", "was", "with", "that", "this", "from", "what", "how", "which",
    "will", "have", "has", "its", "into", "over", "about", "there",
];

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Knowledge directory not found: {0}")]
    MissingDirectory(PathBuf),

    #[error("Invalid pattern: {0}")]
    Pattern(String),

    #[error("Failed to read {path}: {message}")]
    Read { path: PathBuf, message: String },
}

/// One paragraph of a document
#[derive(Debug, Clone)]
struct Passage {
    source: String,
    text: String,
    terms: HashSet<String>,
}

/// In-memory term-overlap index over a directory of market documents
#[derive(Debug)]
pub struct LocalKnowledgeIndex {
    passages: Vec<Passage>,
    top_k: usize,
    term_pattern: Regex,
}

impl LocalKnowledgeIndex {
    /// Load every document under `dir` (recursively).
    ///
    /// A missing directory is an error; an empty one gives an empty index.
    pub fn load(dir: &Path, top_k: usize) -> Result<Self, IndexError> {
        if !dir.is_dir() {
            return Err(IndexError::MissingDirectory(dir.to_path_buf()));
        }

        let mut paths = Vec::new();
        for extension in EXTENSIONS {
            let pattern = format!(
                "{}/**/*.{}",
                Pattern::escape(&dir.display().to_string()),
                extension
            );
            let entries = glob(&pattern).map_err(|e| IndexError::Pattern(e.to_string()))?;
            paths.extend(entries.filter_map(Result::ok));
        }
        paths.sort();

        let mut documents = Vec::new();
        for path in paths {
            if fs::metadata(&path).map(|m| m.len()).unwrap_or(0) > MAX_DOCUMENT_SIZE {
                warn!("Skipping oversized document {}", path.display());
                continue;
            }
            let text = fs::read_to_string(&path).map_err(|e| IndexError::Read {
                path: path.clone(),
                message: e.to_string(),
            })?;
            let source = path
                .strip_prefix(dir)
                .unwrap_or(&path)
                .display()
                .to_string();
            documents.push((source, text));
        }

        let index = Self::from_documents(documents, top_k)?;
        info!(
            "Indexed {} passages from {}",
            index.passages.len(),
            dir.display()
        );
        Ok(index)
    }

    /// Build an index from `(source, text)` pairs
    pub fn from_documents(
        documents: impl IntoIterator<Item = (String, String)>,
        top_k: usize,
    ) -> Result<Self, IndexError> {
        let term_pattern =
            Regex::new(r"[A-Za-z0-9]+").map_err(|e| IndexError::Pattern(e.to_string()))?;
        let paragraph_break =
            Regex::new(r"\n\s*\n").map_err(|e| IndexError::Pattern(e.to_string()))?;

        let mut passages = Vec::new();
        for (source, text) in documents {
            for paragraph in paragraph_break.split(&text) {
                let paragraph = paragraph.trim();
                if paragraph.is_empty() {
                    continue;
                }
                passages.push(Passage {
                    source: source.clone(),
                    text: paragraph.to_string(),
                    terms: terms(&term_pattern, paragraph),
                });
            }
        }

        Ok(Self {
            passages,
            top_k: top_k.max(1),
            term_pattern,
        })
    }

    pub fn len(&self) -> usize {
        self.passages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    /// Best passages for `question`, highest overlap first; ties keep
    /// document order.
    fn search(&self, question: &str) -> Vec<&Passage> {
        let wanted = terms(&self.term_pattern, question);
        let mut scored: Vec<(usize, &Passage)> = self
            .passages
            .iter()
            .map(|p| (p.terms.intersection(&wanted).count(), p))
            .filter(|(score, _)| *score > 0)
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored
            .into_iter()
            .take(self.top_k)
            .map(|(_, p)| p)
            .collect()
    }
}

fn terms(pattern: &Regex, text: &str) -> HashSet<String> {
    pattern
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .filter(|t| t.len() >= MIN_TERM_LEN && !STOPWORDS.contains(&t.as_str()))
        .collect()
}

#[async_trait]
impl KnowledgeQuery for LocalKnowledgeIndex {
    async fn query(&self, question: &str) -> Result<String, KnowledgeError> {
        if question.trim().is_empty() {
            return Err(KnowledgeError::QueryFailed("empty question".to_string()));
        }

        let hits = self.search(question);
        debug!("Knowledge query {:?} matched {} passages", question, hits.len());
        if hits.is_empty() {
            return Ok(format!(
                "No market documents mention anything related to: {}",
                question
            ));
        }

        Ok(hits
            .iter()
            .map(|p| format!("[{}]\n{}", p.source, p.text))
            .collect::<Vec<_>>()
            .join("\n\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library() -> LocalKnowledgeIndex {
        LocalKnowledgeIndex::from_documents(
            vec![
                (
                    "commodities.md".to_string(),
                    "# Commodities\n\nGold prices are expected to remain stable in 2025.\n\n\
                     Oil demand is falling as electric vehicles spread."
                        .to_string(),
                ),
                (
                    "bonds.txt".to_string(),
                    "Government bond yields rose twice this year.\n\n\
                     Gold and bonds are classic hedges against equity risk."
                        .to_string(),
                ),
            ],
            2,
        )
        .unwrap()
    }

    #[test]
    fn test_paragraph_split() {
        assert_eq!(library().len(), 5);
    }

    #[tokio::test]
    async fn test_query_ranks_by_overlap() {
        let answer = library().query("gold prices outlook 2025").await.unwrap();
        let first = answer.split("\n\n").next().unwrap();
        assert!(first.starts_with("[commodities.md]"));
        assert!(answer.contains("Gold prices are expected"));
        assert!(answer.contains("classic hedges"));
        assert!(!answer.contains("Oil demand"));
    }

    #[tokio::test]
    async fn test_query_without_match() {
        let answer = library().query("cryptocurrency regulation").await.unwrap();
        assert!(answer.starts_with("No market documents"));
    }

    #[tokio::test]
    async fn test_empty_question_fails() {
        assert!(matches!(
            library().query("  ").await,
            Err(KnowledgeError::QueryFailed(_))
        ));
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("market_docs");
        assert!(matches!(
            LocalKnowledgeIndex::load(&missing, 3),
            Err(IndexError::MissingDirectory(_))
        ));
    }

    #[test]
    fn test_load_reads_md_and_txt_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("2025")).unwrap();
        fs::write(dir.path().join("equities.md"), "Equities rallied.").unwrap();
        fs::write(dir.path().join("2025").join("rates.txt"), "Rates held.").unwrap();
        fs::write(dir.path().join("ignored.csv"), "a,b,c").unwrap();

        let index = LocalKnowledgeIndex::load(dir.path(), 3).unwrap();
        assert_eq!(index.len(), 2);
        let sources: Vec<&str> = index.passages.iter().map(|p| p.source.as_str()).collect();
        assert!(sources.contains(&"equities.md"));
    }
}
