use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use recyclebin_core::{
	metadata, ErrorChannel, Identity, RecordFormat, RecycleBin, RecycleBinConfig, RecycleBinEntry,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "recyclebin", version, about = "Inspect, restore and purge $Recycle.Bin entries")]
struct Cli {
	/// Security identifier owning the recycle bin (defaults to the config's identity)
	#[arg(long, global = true)]
	sid: Option<String>,
	/// Volume root to search; repeat for several (overrides the config)
	#[arg(long = "volume", global = true)]
	volumes: Vec<PathBuf>,
	/// Config file (defaults to ~/.recyclebin/config.json)
	#[arg(long, global = true)]
	config: Option<PathBuf>,
	/// Print JSON instead of text
	#[arg(long, global = true)]
	json: bool,
	/// More logging (-v info, -vv debug)
	#[arg(short, long, action = clap::ArgAction::Count, global = true)]
	verbose: u8,
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// List recycled items
	List,
	/// Restore the most recently deleted item that lived at a path
	Restore {
		/// Original path of the item
		path: PathBuf,
	},
	/// Restore the item described by a $I metadata file
	RestoreEntry {
		/// Path of the $I file
		metadata: PathBuf,
	},
	/// Permanently delete the item described by a $I metadata file
	Delete {
		/// Path of the $I file
		metadata: PathBuf,
	},
	/// Permanently delete everything in the recycle bin
	Empty {
		/// Confirm the wipe
		#[arg(long)]
		yes: bool,
	},
	/// Decode a single $I metadata file
	Inspect {
		/// Path of the $I file
		file: PathBuf,
	},
}

fn main() -> Result<()> {
	let cli = Cli::parse();
	init_tracing(cli.verbose);

	if let Commands::Inspect { file } = &cli.command {
		return inspect(file, cli.json);
	}

	let config = load_config(&cli)?;
	let identity = resolve_identity(&cli, &config)?;
	let bin = RecycleBin::with_config(identity, &config)?;
	tracing::debug!("Opened {} recycle bin root(s) for {}", bin.roots().len(), bin.identity());

	match &cli.command {
		Commands::List => list(&bin, cli.json)?,
		Commands::Restore { path } => {
			let report = bin.restore_path(path)?;
			if cli.json {
				println!("{}", serde_json::to_string_pretty(&report)?);
			} else {
				println!("✅ Restored {} to {}", report.kind, report.restored_to.display());
				if !report.metadata_retired {
					println!("⚠️  Metadata record left behind; it will be removed by `empty`");
				}
			}
		}
		Commands::RestoreEntry { metadata } => {
			let entry = find_entry(&bin, metadata)?;
			let report = bin.restore(&entry)?;
			if cli.json {
				println!("{}", serde_json::to_string_pretty(&report)?);
			} else {
				println!("✅ Restored {} to {}", report.kind, report.restored_to.display());
			}
		}
		Commands::Delete { metadata } => {
			let entry = find_entry(&bin, metadata)?;
			bin.delete_permanently(&entry)?;
			println!("🗑️  Permanently deleted {}", entry.original_path().display());
		}
		Commands::Empty { yes } => {
			if !yes {
				bail!("Refusing to empty the recycle bin without --yes");
			}
			let report = bin.empty()?;
			if cli.json {
				println!("{}", serde_json::to_string_pretty(&report)?);
			} else {
				println!("🗑️  Removed {} item(s) from {} recycle bin(s)", report.removed, report.roots);
			}
		}
		Commands::Inspect { .. } => unreachable!(),
	}

	Ok(())
}

fn init_tracing(verbose: u8) {
	let default_level = match verbose {
		0 => "warn",
		1 => "info",
		_ => "debug",
	};
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn load_config(cli: &Cli) -> Result<RecycleBinConfig> {
	let mut config = match &cli.config {
		Some(path) => RecycleBinConfig::load(path)?,
		None => RecycleBinConfig::load_or_default()?,
	};
	if !cli.volumes.is_empty() {
		config.volumes = cli.volumes.clone();
	}
	Ok(config)
}

fn resolve_identity(cli: &Cli, config: &RecycleBinConfig) -> Result<Identity> {
	if let Some(sid) = &cli.sid {
		return Ok(Identity::new(sid.as_str())?);
	}
	config
		.identity()?
		.context("No identity given: pass --sid or set \"identity\" in the config file")
}

fn list(bin: &RecycleBin, json: bool) -> Result<()> {
	let channel = ErrorChannel::new().with(|failure| {
		eprintln!("⚠️  {}", failure);
	});
	let mut entries = bin.list(&channel);
	entries.sort_by(|a, b| b.deleted_at().cmp(&a.deleted_at()));

	if json {
		println!("{}", serde_json::to_string_pretty(&entries)?);
		return Ok(());
	}

	if entries.is_empty() {
		println!("📭 Recycle bin is empty");
		return Ok(());
	}

	println!("{:<20} {:>12}  {:<7} {}", "DELETED", "SIZE", "FORMAT", "ORIGINAL PATH");
	for entry in &entries {
		println!(
			"{:<20} {:>12}  {:<7} {}",
			entry.deleted_at().format("%Y-%m-%d %H:%M:%S"),
			entry.original_size(),
			entry.format(),
			entry.original_path().display()
		);
		println!("{:<20} {:>12}  {:<7} └─ {}", "", "", "", entry.metadata_path().display());
	}
	println!();
	println!("📈 {} item(s) in {} recycle bin(s)", entries.len(), bin.roots().len());
	Ok(())
}

fn find_entry(bin: &RecycleBin, metadata_path: &Path) -> Result<RecycleBinEntry> {
	bin.entry_for_metadata(metadata_path)
		.with_context(|| format!("No readable recycle bin entry for {}", metadata_path.display()))
}

#[derive(Serialize)]
struct InspectView<'a> {
	metadata_path: &'a Path,
	original_path: &'a Path,
	deleted_at: DateTime<Utc>,
	original_size: u64,
	format: RecordFormat,
}

fn inspect(file: &Path, json: bool) -> Result<()> {
	let record = metadata::read_metadata_file(file)
		.with_context(|| format!("Failed to decode {}", file.display()))?;

	if json {
		let view = InspectView {
			metadata_path: file,
			original_path: &record.original_path,
			deleted_at: record.deleted_at,
			original_size: record.original_size,
			format: record.format,
		};
		println!("{}", serde_json::to_string_pretty(&view)?);
	} else {
		println!("📋 {}", file.display());
		println!("  Original path: {}", record.original_path.display());
		println!("  Deleted at:    {}", record.deleted_at);
		println!("  Size:          {} bytes", record.original_size);
		println!("  Format:        {}", record.format);
	}
	Ok(())
}
