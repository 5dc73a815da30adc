//! Subcommand implementations.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::json;

use atis_fetch::{extract_detailed, run, FetchConfig, SystemClock};

/// One full run: handshake, extraction, artifact.
pub async fn fetch(config: &FetchConfig, json_output: bool) -> Result<()> {
    let report = run(config, &SystemClock).await?;

    if json_output {
        println!(
            "{}",
            json!({
                "letter": report.artifact.letter,
                "updated_utc": report.artifact.updated_utc_string(),
                "strategy": report.strategy.name(),
                "output": report.output_path.display().to_string(),
            })
        );
    } else {
        println!("SUCCESS: ATIS={}", report.artifact.letter);
    }
    Ok(())
}

/// Replay the extractor on a saved fragment.
pub fn extract(file: &Path, json_output: bool) -> Result<()> {
    let html = read_fragment(file)?;
    let extraction = extract_detailed(&html)?;

    if json_output {
        println!(
            "{}",
            json!({
                "letter": extraction.letter,
                "strategy": extraction.strategy.name(),
            })
        );
    } else {
        println!(
            "ATIS={} (strategy: {})",
            extraction.letter, extraction.strategy
        );
    }
    Ok(())
}

fn read_fragment(file: &Path) -> Result<String> {
    if file == Path::new("-") {
        let mut html = String::new();
        std::io::stdin()
            .read_to_string(&mut html)
            .context("failed to read fragment from stdin")?;
        Ok(html)
    } else {
        std::fs::read_to_string(file)
            .with_context(|| format!("failed to read fragment {}", file.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fragment.html");
        std::fs::write(&path, r#"<tr data-grid-row="first"><td>S</td></tr>"#).unwrap();
        assert!(extract(&path, false).is_ok());
    }

    #[test]
    fn test_extract_failure_keeps_error_kind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fragment.html");
        std::fs::write(&path, "<div>closed</div>").unwrap();
        let err = extract(&path, true).unwrap_err();
        let kind = err
            .downcast_ref::<atis_fetch::AtisError>()
            .map(atis_fetch::AtisError::kind);
        assert_eq!(kind, Some("ExtractionError"));
    }

    #[test]
    fn test_extract_missing_file() {
        let err = extract(Path::new("/nonexistent/fragment.html"), false).unwrap_err();
        assert!(err.to_string().contains("failed to read fragment"));
    }
}
