//! Reply scripts for non-interactive runs

use finadvisor_application::ScriptedHumanInput;
use std::path::Path;

/// Parse a reply script: one reply per line.
///
/// Blank lines and lines starting with `#` are skipped.
pub fn parse_script(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Load a reply script from `path`.
///
/// Once the replies run out the human answers `END`, so a short script still
/// ends the session cleanly.
pub fn load_script(path: &Path) -> std::io::Result<ScriptedHumanInput> {
    let content = std::fs::read_to_string(path)?;
    Ok(ScriptedHumanInput::new(parse_script(&content)).with_final_reply("END"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script_skips_blanks_and_comments() {
        let replies = parse_script(
            "# answers for the advisor\n\
             I earn 6000 a month\n\
             \n\
             \x20 moderate risk, ten years  \n\
             APPROVE\n",
        );
        assert_eq!(
            replies,
            vec!["I earn 6000 a month", "moderate risk, ten years", "APPROVE"]
        );
    }

    #[test]
    fn test_empty_script() {
        assert!(parse_script("\n# nothing\n").is_empty());
    }
}
