// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Process-level checks performed before anything is mounted.

use anyhow::{Context, Result, bail};
use memfs_core::MemFsConfig;
use nix::unistd::{Uid, geteuid, getuid};
use std::ffi::OsString;
use std::fs;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

/// Usage line printed when the command line has no mount point.
pub fn usage(program: &str) -> String {
    format!("usage:  {program} [FUSE and mount options] mount_point")
}

/// The mount point must be the last argument and must not look like a flag.
pub fn validate_argv(argv: &[OsString]) -> Result<()> {
    let program = argv
        .first()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| "memfs".to_string());

    // `--help`/`--version` are answered by clap before any mount attempt.
    if argv.iter().skip(1).any(|a| a == "--help" || a == "-h" || a == "--version" || a == "-V") {
        return Ok(());
    }

    match argv.last() {
        Some(last) if argv.len() >= 2 && !last.as_bytes().starts_with(b"-") => Ok(()),
        _ => bail!("{}", usage(&program)),
    }
}

fn is_superuser(real: Uid, effective: Uid) -> bool {
    real.is_root() || effective.is_root()
}

/// Refuse to run when either the real or the effective uid is root.
pub fn refuse_superuser(program: &str) -> Result<()> {
    if is_superuser(getuid(), geteuid()) {
        bail!("running {program} as root opens unacceptable security holes");
    }
    Ok(())
}

/// Load configuration from a JSON file, or defaults when none is given.
pub fn load_config(config_path: Option<&Path>) -> Result<MemFsConfig> {
    match config_path {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            let config = MemFsConfig::from_json_str(&content)
                .with_context(|| format!("parsing config {}", path.display()))?;
            Ok(config)
        }
        None => Ok(MemFsConfig::default()),
    }
}
