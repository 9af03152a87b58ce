//! Output format value object

use serde::{Deserialize, Serialize};

/// How a finished conversation is rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Every message in order (default)
    #[default]
    Transcript,
    /// Only the outcome and the final message
    Summary,
    /// JSON document with log and outcome
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "transcript" | "full" => Ok(OutputFormat::Transcript),
            "summary" => Ok(OutputFormat::Summary),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Invalid OutputFormat: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_transcript() {
        assert_eq!(OutputFormat::default(), OutputFormat::Transcript);
    }

    #[test]
    fn test_serialize_lowercase() {
        let json = serde_json::to_string(&OutputFormat::Summary).unwrap();
        assert_eq!(json, "\"summary\"");
    }

    #[test]
    fn test_deserialize_lowercase() {
        let format: OutputFormat = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(format, OutputFormat::Json);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("Full".parse::<OutputFormat>().unwrap(), OutputFormat::Transcript);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }
}
