//! services/audit.rs
//! Append-only JSONL logbook of engine activity.
//!
//! - Writes JSONL files under `.habitquest/logbook/`.
//! - Best-effort: logging never fails the operation being logged.

use chrono::Utc;
use once_cell::sync::OnceCell;
use serde::Serialize;
use serde_json::{Value, json};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use crate::commands::init::ensure_initialized_once;
use crate::config::CoreConfig;

/// Record a generic action event (lightweight telemetry).
///
/// # Arguments
/// * `agent` — Logical component name (e.g., `"commands"`, `"progression"`).
/// * `action` — Short verb label (e.g., `"checkin_applied"`, `"undo_applied"`).
/// * `details` — Arbitrary JSON payload (parameters, ids, amounts).
/// * `severity` — `"low" | "medium" | "high"` — for quick triage.
///
/// Appends a single JSON object to `actions.jsonl`.
pub fn record_action(agent: &str, action: &str, details: &Value, severity: &str) {
    if !audit_enabled() {
        return;
    }
    let entry = json!({
        "timestamp": Utc::now().to_rfc3339(),
        "event": "action",
        "agent": agent,
        "action": action,
        "severity": severity,
        "details": details
    });
    append_jsonl(&log_paths().actions, &entry);
}

// ----------- Helpers -----------

/// Append a single JSON value as a line to a JSONL file. Creates parent
/// directories if missing; ignores write errors to avoid crashing the caller.
fn append_jsonl<P: AsRef<std::path::Path>, S: Serialize>(path: P, val: &S) {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    if let Ok(mut f) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
    {
        if let Ok(line) = serde_json::to_string(val) {
            let _ = writeln!(f, "{}", line);
        }
    }
}

fn log_paths() -> &'static LogPaths {
    static CELL: OnceCell<LogPaths> = OnceCell::new();
    CELL.get_or_init(|| match ensure_initialized_once() {
        Ok(report) => LogPaths::from_config(&report.config),
        Err(_) => LogPaths::default(),
    })
}

fn audit_enabled() -> bool {
    static CELL: OnceCell<bool> = OnceCell::new();
    *CELL.get_or_init(|| {
        ensure_initialized_once()
            .map(|report| report.config.services.audit_enabled)
            .unwrap_or(true)
    })
}

#[derive(Clone)]
struct LogPaths {
    actions: PathBuf,
}

impl LogPaths {
    fn from_config(cfg: &CoreConfig) -> Self {
        Self {
            actions: cfg.logbook.actions.clone(),
        }
    }
}

impl Default for LogPaths {
    fn default() -> Self {
        let cfg = CoreConfig::default();
        Self::from_config(&cfg)
    }
}
