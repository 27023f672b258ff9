//! Provenance sidecars: `<stem>.provenance.json` next to each artifact.
//!
//! The document is typed; each subcommand supplies its own `params` struct.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Debug, Serialize)]
pub struct Callsite {
    pub file: &'static str,
    pub line: u32,
}

#[derive(Debug, Serialize)]
pub struct Sidecar<P> {
    pub code_rev: String,
    pub fiberpack_version: &'static str,
    pub callsite: Callsite,
    pub params: P,
    pub outputs: Vec<PathBuf>,
}

impl<P: Serialize> Sidecar<P> {
    /// Describe `artifact`; the callsite is the caller of `new`.
    #[track_caller]
    pub fn new(artifact: &Path, params: P) -> Self {
        let caller = Location::caller();
        Self {
            code_rev: code_rev(),
            fiberpack_version: fiberpack::VERSION,
            callsite: Callsite {
                file: caller.file(),
                line: caller.line(),
            },
            params,
            outputs: vec![artifact.to_path_buf()],
        }
    }

    /// Write the sidecar beside the first output and return its path.
    pub fn write(&self) -> Result<PathBuf> {
        let artifact = self
            .outputs
            .first()
            .context("sidecar without an output artifact")?;
        let path = sidecar_path(artifact);
        fs::write(&path, serde_json::to_vec_pretty(self)?)
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(path)
    }
}

/// `out/fibers.csv` → `out/fibers.provenance.json`.
pub fn sidecar_path(artifact: &Path) -> PathBuf {
    artifact.with_extension("provenance.json")
}

/// `GIT_COMMIT` if set, else `git rev-parse HEAD`, else `"unknown"`.
pub fn code_rev() -> String {
    std::env::var("GIT_COMMIT")
        .ok()
        .filter(|rev| !rev.is_empty())
        .or_else(git_head)
        .unwrap_or_else(|| "unknown".to_owned())
}

fn git_head() -> Option<String> {
    let out = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    String::from_utf8(out.stdout)
        .ok()
        .map(|rev| rev.trim().to_owned())
}
