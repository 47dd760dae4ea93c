use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::{PipelineRun, StageOutcome};

/// Write the machine-readable run report as pretty-printed JSON
pub fn write_run_json(run: &PipelineRun, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create file: {:?}", path))?;
    serde_json::to_writer_pretty(file, run).context("Failed to write run report")?;
    Ok(())
}

/// Human-readable run report format
pub struct HumanReport<'a> {
    run: &'a PipelineRun,
}

impl<'a> HumanReport<'a> {
    pub fn new(run: &'a PipelineRun) -> Self {
        Self { run }
    }

    /// Format the run as human-readable text
    pub fn format(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Run {}\n", self.run.run_id));
        output.push_str(&format!("Pipeline: {}\n", self.run.pipeline));
        output.push_str(&format!("Objective: {}\n", self.run.objective));
        output.push_str(&format!("Status: {}\n", self.run.status));
        output.push_str(&format!("Started: {}\n", self.run.started_at.to_rfc3339()));
        output.push('\n');

        for (i, stage) in self.run.stages.iter().enumerate() {
            let heading = match &stage.source {
                Some(label) => format!("[{}] {} ({})", i + 1, stage.stage, label),
                None => format!("[{}] {}", i + 1, stage.stage),
            };
            match &stage.outcome {
                StageOutcome::Ok { output: text } => {
                    output.push_str(&format!("{}: ok ({}ms)\n", heading, stage.elapsed_ms));
                    output.push_str(&wrap_text(text, 80));
                }
                StageOutcome::Error { detail } => {
                    output.push_str(&format!("{}: failed ({}ms)\n", heading, stage.elapsed_ms));
                    output.push_str(&wrap_text(detail, 80));
                }
            }
            output.push_str("\n\n");
        }

        if let Some(artifact) = &self.run.final_artifact {
            output.push_str("Final Artifact\n");
            output.push_str("--------------\n");
            output.push_str(&wrap_text(artifact, 80));
            output.push('\n');
        }

        if let Some(failure) = &self.run.failure {
            match &failure.source {
                Some(label) => output.push_str(&format!(
                    "Run failed at {} ({}): {}\n",
                    failure.stage, label, failure.cause
                )),
                None => output.push_str(&format!(
                    "Run failed at {}: {}\n",
                    failure.stage, failure.cause
                )),
            }
        }

        output
    }

    /// Write to a text file
    pub fn write_file(&self, path: &Path) -> Result<()> {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        write!(file, "{}", self.format())?;
        Ok(())
    }
}

/// Wrap each line at approximately the given width, keeping blank lines
fn wrap_text(text: &str, width: usize) -> String {
    let mut result = String::new();
    for (i, line) in text.lines().enumerate() {
        if i > 0 {
            result.push('\n');
        }
        result.push_str(&wrap_line(line, width));
    }
    result
}

fn wrap_line(line: &str, width: usize) -> String {
    let mut result = String::new();
    let mut line_len = 0;

    for word in line.split_whitespace() {
        if line_len + word.len() + 1 > width && line_len > 0 {
            result.push('\n');
            line_len = 0;
        }
        if line_len > 0 {
            result.push(' ');
            line_len += 1;
        }
        result.push_str(word);
        line_len += word.len();
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RunFailure, StageResult};

    fn sample_run() -> PipelineRun {
        let mut run = PipelineRun::begin("editorial", "cover the story");
        run.record(StageResult {
            stage: "analysis".to_string(),
            source: None,
            outcome: StageOutcome::Ok {
                output: "Key insight: prices fell.".to_string(),
            },
            elapsed_ms: 812,
        });
        run
    }

    #[test]
    fn test_format_succeeded_run() {
        let mut run = sample_run();
        run.finish_ok("The editorial text.");

        let report = HumanReport::new(&run).format();
        assert!(report.contains("Pipeline: editorial"));
        assert!(report.contains("Status: succeeded"));
        assert!(report.contains("[1] analysis: ok (812ms)"));
        assert!(report.contains("Key insight: prices fell."));
        assert!(report.contains("Final Artifact"));
        assert!(report.contains("The editorial text."));
        assert!(!report.contains("Run failed"));
    }

    #[test]
    fn test_format_failed_run() {
        let mut run = sample_run();
        run.record(StageResult {
            stage: "fact_check".to_string(),
            source: None,
            outcome: StageOutcome::Error {
                detail: "completion service returned HTTP 500: overloaded".to_string(),
            },
            elapsed_ms: 43,
        });
        run.fail(RunFailure {
            stage: "fact_check".to_string(),
            source: None,
            cause: "completion service returned HTTP 500: overloaded".to_string(),
        });

        let report = HumanReport::new(&run).format();
        assert!(report.contains("Status: failed"));
        assert!(report.contains("[2] fact_check: failed (43ms)"));
        assert!(report.contains("Run failed at fact_check: completion service returned"));
        assert!(!report.contains("Final Artifact"));
    }

    #[test]
    fn test_format_labels_multi_source_stages() {
        let mut run = PipelineRun::begin("editorial", "compare coverage");
        run.record(StageResult {
            stage: "analysis".to_string(),
            source: Some("source-2".to_string()),
            outcome: StageOutcome::Ok {
                output: "insight".to_string(),
            },
            elapsed_ms: 100,
        });
        run.finish_ok("done");

        let report = HumanReport::new(&run).format();
        assert!(report.contains("[1] analysis (source-2): ok (100ms)"));
    }

    #[test]
    fn test_wrap_text_keeps_blank_lines() {
        let text = "First paragraph here.\n\nSecond paragraph here.";
        let wrapped = wrap_text(text, 80);
        assert_eq!(wrapped, text);
    }

    #[test]
    fn test_wrap_line_width() {
        let line = "one two three four five six seven eight nine ten eleven twelve";
        let wrapped = wrap_line(line, 20);
        for piece in wrapped.lines() {
            assert!(piece.len() <= 25); // Allow some slack for long words
        }
        let rejoined = wrapped.replace('\n', " ");
        assert_eq!(rejoined, line);
    }

    #[test]
    fn test_write_json_round_trip() {
        let mut run = sample_run();
        run.finish_ok("The editorial text.");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        write_run_json(&run, &path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let parsed: PipelineRun = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.run_id, run.run_id);
        assert_eq!(parsed.stages.len(), 1);
        assert_eq!(parsed.final_artifact.as_deref(), Some("The editorial text."));
    }
}
