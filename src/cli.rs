use crate::api::{BaselineTriageData, CertaintyTriageData};
use crate::triage::types::Signal;
use crate::triage::{run_baseline_triage, run_certainty_triage};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TriageMode {
    Baseline,
    Certainty,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "gridops-triage",
    version,
    about = "EV charger outage-signal triage service"
)]
pub struct Args {
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,
    #[arg(long, default_value_t = 8000)]
    pub port: u16,
    #[arg(long, default_value_t = false)]
    pub print_openapi: bool,
    /// Triage a JSON array of signals, print the result and exit.
    #[arg(long)]
    pub triage_file: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = TriageMode::Certainty)]
    pub mode: TriageMode,
    /// Overrides the configured confidence threshold for --triage-file runs.
    #[arg(long, requires = "triage_file")]
    pub threshold: Option<f64>,
}

/// Run one pipeline over a signals file and render the result as pretty JSON.
pub fn triage_file(path: &Path, mode: TriageMode, threshold: f64) -> Result<String> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read signals file {}", path.display()))?;
    let signals: Vec<Signal> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse signals file {}", path.display()))?;

    let rendered = match mode {
        TriageMode::Baseline => serde_json::to_string_pretty(&BaselineTriageData {
            cases: run_baseline_triage(&signals),
        })?,
        TriageMode::Certainty => {
            let (cases, verification_tasks) = run_certainty_triage(&signals, threshold);
            serde_json::to_string_pretty(&CertaintyTriageData {
                cases,
                verification_tasks,
            })?
        }
    };
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_serve_locally() {
        let args = Args::try_parse_from(["gridops-triage"]).unwrap();
        assert_eq!(args.host, "127.0.0.1");
        assert_eq!(args.port, 8000);
        assert!(args.triage_file.is_none());
        assert_eq!(args.mode, TriageMode::Certainty);
    }

    #[test]
    fn one_shot_triage_flags() {
        let args = Args::try_parse_from([
            "gridops-triage",
            "--triage-file",
            "signals.json",
            "--mode",
            "baseline",
        ])
        .unwrap();
        assert_eq!(args.triage_file, Some(PathBuf::from("signals.json")));
        assert_eq!(args.mode, TriageMode::Baseline);
    }

    #[test]
    fn threshold_needs_triage_file() {
        assert!(Args::try_parse_from(["gridops-triage", "--threshold", "0.5"]).is_err());
        assert!(Args::try_parse_from(["gridops-triage", "--mode", "sideways"]).is_err());
    }

    #[test]
    fn triage_file_renders_selected_mode() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id":"sig_1","source":"ugc","timestamp":"2026-02-20T20:00:00Z","charger_id":"AUS_2002","lat":30.27,"lon":-97.74,"status":"degraded","text":"slow charging"}}]"#
        )
        .unwrap();

        let baseline: serde_json::Value =
            serde_json::from_str(&triage_file(file.path(), TriageMode::Baseline, 0.65).unwrap()).unwrap();
        assert_eq!(baseline["cases"][0]["id"], "case_aus_2002");
        assert!(baseline.get("verification_tasks").is_none());

        let certainty: serde_json::Value =
            serde_json::from_str(&triage_file(file.path(), TriageMode::Certainty, 0.65).unwrap()).unwrap();
        assert_eq!(certainty["verification_tasks"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn triage_file_reports_bad_input() {
        let err = triage_file(Path::new("/nonexistent/signals.json"), TriageMode::Baseline, 0.65)
            .unwrap_err();
        assert!(err.to_string().contains("failed to read signals file"));
    }
}
