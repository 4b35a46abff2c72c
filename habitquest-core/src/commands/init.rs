// habitquest-core/src/commands/init.rs

use anyhow::{Context, Result};
use chrono::Utc;
use once_cell::sync::OnceCell;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::CoreConfig;

#[derive(Debug, Clone)]
pub struct InitReport {
    pub root: PathBuf,
    pub config: CoreConfig,
    pub created: Vec<String>,
    pub existed: Vec<String>,
}

// ---------- single global init gate ----------

static INIT: OnceCell<InitReport> = OnceCell::new();

/// Idempotent global initializer. Safe to call often.
/// Returns a &'static InitReport once initialization has completed.
pub fn ensure_initialized_once() -> Result<&'static InitReport> {
    INIT.get_or_try_init(ensure_initialized)
}

/// Resolve the HabitQuest root. Allow override via HABITQUEST_ROOT (tests).
fn habitquest_root() -> PathBuf {
    std::env::var_os("HABITQUEST_ROOT")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(".habitquest"))
}

/// Ensure the root directory tree, config file and logbook exist
/// (idempotent), then load the effective config.
pub fn ensure_initialized() -> Result<InitReport> {
    let root = habitquest_root();
    let mut created = Vec::new();
    let mut existed = Vec::new();

    ensure_dir(&root, "", &mut created, &mut existed)?;
    ensure_dir(&root, "cache", &mut created, &mut existed)?;
    ensure_dir(&root, "logbook", &mut created, &mut existed)?;

    ensure_file(
        &root,
        "config.toml",
        Some(DEFAULT_CONFIG_TOML),
        &mut created,
        &mut existed,
    )?;

    initialize_logbook_files(&root, &mut created, &mut existed)?;

    let config = CoreConfig::load(&root)?;

    Ok(InitReport {
        root,
        config,
        created,
        existed,
    })
}

fn ensure_dir(
    base: &Path,
    rel: &str,
    created: &mut Vec<String>,
    existed: &mut Vec<String>,
) -> Result<()> {
    let p = if rel.is_empty() {
        base.to_path_buf()
    } else {
        base.join(rel)
    };
    let label = if rel.is_empty() { "." } else { rel };
    if p.exists() {
        existed.push(label.to_string());
        return Ok(());
    }
    fs::create_dir_all(&p).with_context(|| format!("create_dir_all({:?})", p))?;
    created.push(label.to_string());
    Ok(())
}

fn ensure_file(
    base: &Path,
    rel_file: &str,
    content_if_absent: Option<&str>,
    created: &mut Vec<String>,
    existed: &mut Vec<String>,
) -> Result<()> {
    let p = base.join(rel_file);
    if p.exists() {
        existed.push(rel_file.to_string());
        return Ok(());
    }
    write_atomic(&p, content_if_absent.unwrap_or("").as_bytes())?;
    created.push(rel_file.to_string());
    Ok(())
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create_dir_all({:?})", parent))?;
    }
    let tmp = path.with_extension("tmp");
    {
        let mut f = OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(&tmp)
            .with_context(|| format!("open temp file {:?}", tmp))?;
        f.write_all(bytes)?;
        f.flush()?;
    }
    fs::rename(&tmp, path).with_context(|| format!("rename {:?} -> {:?}", tmp, path))?;
    Ok(())
}

fn ensure_seeded_jsonl(
    dir: &Path,
    file: &str,
    init_line: &str,
    created: &mut Vec<String>,
    existed: &mut Vec<String>,
) -> Result<()> {
    let p = dir.join(file);
    if !p.exists() {
        ensure_file(dir, file, Some(&format!("{init_line}\n")), created, existed)?;
        return Ok(());
    }
    existed.push(file.to_string());
    // If exists but empty, seed it
    if fs::metadata(&p)?.len() == 0 {
        let mut f = OpenOptions::new().append(true).open(&p)?;
        f.write_all(init_line.as_bytes())?;
        f.write_all(b"\n")?;
    }
    Ok(())
}

fn initialize_logbook_files(
    root: &Path,
    created: &mut Vec<String>,
    existed: &mut Vec<String>,
) -> Result<()> {
    let ts = Utc::now().to_rfc3339();
    let init_event = format!(
        r#"{{"ts":"{}","event":"system_init","agent":"system","data":{{"version":"0.1.0"}}}}"#,
        ts
    );

    // aggregate
    ensure_seeded_jsonl(root, "logbook.jsonl", &init_event, created, existed)?;

    // per-stream
    let log_dir = root.join("logbook");
    ensure_seeded_jsonl(&log_dir, "actions.jsonl", &init_event, created, existed)?;
    Ok(())
}

// ---------- defaults ----------

const DEFAULT_CONFIG_TOML: &str = r#"[system]
name = "habitquest"
version = "0.1.0"

[storage]
state_path = "cache/state.db"

[progression]
xp_per_checkin = 100
xp_per_level = 1000
streak_bonus_multiplier = 1.1
combo_unit_bonus = 25
combo_window_ms = 60000
undo_window_ms = 10000

[logbook]
path = "logbook"
aggregate = "logbook.jsonl"
actions = "logbook/actions.jsonl"

[services]
audit_enabled = true
tips_enabled = true
"#;
