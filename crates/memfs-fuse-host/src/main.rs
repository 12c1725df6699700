// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! memfs FUSE host: mounts an in-memory directory tree
//!
//! Nothing persists past unmount. Built without the `fuse` feature the binary
//! only validates its arguments and configuration.

#[cfg(all(feature = "fuse", target_os = "linux"))]
mod adapter;
#[cfg_attr(not(all(feature = "fuse", target_os = "linux")), allow(dead_code))]
mod dispatch;
mod startup;

#[cfg(all(feature = "fuse", target_os = "linux"))]
use adapter::MemFsFuse;
use anyhow::Result;
use clap::Parser;
use memfs_core::Index;
use memfs_logging::CliLoggingArgs;
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "memfs", version, about = "Mount an in-memory filesystem")]
struct Args {
    /// Mount point for the filesystem
    mount_point: PathBuf,

    /// Raw FUSE mount option, comma separated or repeated
    #[arg(short = 'o', long = "option", value_name = "OPT")]
    options: Vec<String>,

    /// Configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Allow other users to access the filesystem
    #[arg(long)]
    allow_other: bool,

    /// Allow root to access the filesystem
    #[arg(long)]
    allow_root: bool,

    /// Auto unmount on process exit
    #[arg(long)]
    auto_unmount: bool,

    #[command(flatten)]
    logging: CliLoggingArgs,
}

impl Args {
    fn raw_options(&self) -> Vec<String> {
        self.options
            .iter()
            .flat_map(|opt| opt.split(','))
            .filter(|opt| !opt.is_empty())
            .map(str::to_string)
            .collect()
    }
}

fn main() -> Result<()> {
    let argv: Vec<OsString> = std::env::args_os().collect();
    let program = argv
        .first()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| "memfs".to_string());

    startup::validate_argv(&argv)?;
    let args = Args::parse_from(&argv);
    startup::refuse_superuser(&program)?;

    args.logging.init("memfs")?;

    info!("Starting memfs FUSE host");
    info!("Mount point: {}", args.mount_point.display());

    let config = startup::load_config(args.config.as_deref())?;
    info!("Configuration loaded: {:?}", config);

    let index = Arc::new(Index::new(&config));

    #[cfg(all(feature = "fuse", target_os = "linux"))]
    {
        let filesystem = MemFsFuse::new(Arc::clone(&index), &config);

        let mut mount_options = vec![
            fuser::MountOption::FSName("memfs".to_string()),
            fuser::MountOption::Subtype("memfs".to_string()),
        ];

        info!(
            "Cache policy: attr={}ms entry={}ms max_file_bytes={:?}",
            config.cache.attr_ttl_ms, config.cache.entry_ttl_ms, config.limits.max_file_bytes
        );

        if args.allow_other {
            mount_options.push(fuser::MountOption::AllowOther);
        }

        if args.allow_root {
            mount_options.push(fuser::MountOption::AllowRoot);
        }

        if args.auto_unmount {
            mount_options.push(fuser::MountOption::AutoUnmount);
        }

        mount_options.extend(args.raw_options().into_iter().map(fuser::MountOption::CUSTOM));

        info!("Mounting filesystem...");
        let session = fuser::spawn_mount2(filesystem, &args.mount_point, &mount_options)?;
        info!("memfs mounted; blocking until unmount");
        session.join();
        info!("memfs unmounted");
    }

    #[cfg(not(all(feature = "fuse", target_os = "linux")))]
    {
        tracing::warn!("FUSE support not compiled in. This binary is for testing only.");
        let root = index.status("/")?;
        info!(ino = root.ino, mode = %format!("{:o}", root.mode), "memfs index initialized");
        info!("To enable FUSE support, compile with: cargo build --features fuse");
    }

    Ok(())
}
