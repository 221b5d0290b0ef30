mod render;

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use gcode_settings_container::{InstanceContainer, SettingsContainer};
use gcode_settings_core::{
    GCodeProfileReader, ProfileReader, SettingsConfig, embed_profile, load_config_from_str,
};

use crate::render::{Format, render_container_error};

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "gcode-settings",
    version,
    about = "Read and embed the print profile stored in g-code ;SETTING_ comment lines"
)]
struct Cli {
    /// Output mode: "pretty" for human-readable output, "json" for
    /// machine-readable JSON. Defaults to "pretty" when stdout is a TTY,
    /// "json" otherwise.
    #[arg(long, global = true, value_parser = ["pretty", "json"])]
    output: Option<String>,

    /// JSON config file with optional "reader" and "writer" sections.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace).
    /// `RUST_LOG` takes precedence when set.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Read the profile embedded in a g-code file.
    Read { file: PathBuf },

    /// Print the unescaped serialized profile without loading it.
    Payload { file: PathBuf },

    /// Embed a profile into a g-code file, replacing any embedded one.
    Embed {
        file: PathBuf,
        /// Profile to embed, in container (INI) format.
        #[arg(long)]
        profile: PathBuf,
        /// Write the result back to the g-code file (in-place).
        #[arg(long, short)]
        write: bool,
    },
}

// ── Main ────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let format = Format::resolve_or_detect(cli.output.as_deref());
    let config = load_config(cli.config.as_deref())?;

    match cli.cmd {
        Cmd::Read { file } => cmd_read(&file, &config, format)?,
        Cmd::Payload { file } => cmd_payload(&file, &config, format)?,
        Cmd::Embed {
            file,
            profile,
            write,
        } => cmd_embed(&file, &profile, write, &config, format)?,
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

// ── Commands ────────────────────────────────────────────────────────────

fn cmd_read(file: &Path, config: &SettingsConfig, format: Format) -> Result<()> {
    let reader = GCodeProfileReader::<InstanceContainer>::from_config(config.reader.clone());
    let profile = reader.read(file);

    match format {
        Format::Json => {
            let out = serde_json::json!({
                "file": file.display().to_string(),
                "profile": profile,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => match &profile {
            Some(profile) => print!("{}", profile.to_serialized()),
            None => eprintln!("no profile found: {}", file.display()),
        },
    }

    if profile.is_none() {
        process::exit(1);
    }
    Ok(())
}

fn cmd_payload(file: &Path, config: &SettingsConfig, format: Format) -> Result<()> {
    let reader = GCodeProfileReader::<InstanceContainer>::from_config(config.reader.clone());
    let Some(payload) = reader.read_serialized(file)? else {
        eprintln!(
            "error: {} is not a .{} file",
            file.display(),
            reader.config().extension
        );
        process::exit(1);
    };

    match format {
        Format::Json => {
            let out = serde_json::json!({
                "file": file.display().to_string(),
                "payload": payload,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => print!("{payload}"),
    }
    Ok(())
}

fn cmd_embed(
    file: &Path,
    profile_path: &Path,
    write: bool,
    config: &SettingsConfig,
    format: Format,
) -> Result<()> {
    let gcode = fs::read_to_string(file)
        .with_context(|| format!("failed to read g-code file '{}'", file.display()))?;
    let source = fs::read_to_string(profile_path)
        .with_context(|| format!("failed to read profile '{}'", profile_path.display()))?;

    let id = profile_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut profile = InstanceContainer::new(id);
    if let Err(e) = profile.deserialize(&source) {
        render_container_error(&source, &profile_path.display().to_string(), &e, format);
        process::exit(1);
    }
    log::info!(
        "Loaded profile '{}' with {} values from {}",
        profile.name,
        profile.values.len(),
        profile_path.display()
    );

    let embedded = embed_profile(&gcode, &profile, &config.writer);

    if write {
        let changed = embedded != gcode;
        if changed {
            fs::write(file, &embedded)
                .with_context(|| format!("failed to write '{}'", file.display()))?;
        }
        status_message(format, changed, "embedded", "already embedded", file);
    } else {
        // Default: print the result to stdout.
        print!("{embedded}");
    }
    Ok(())
}

// ── Helpers ─────────────────────────────────────────────────────────────

/// Emit a status message for --write in the appropriate format.
fn status_message(format: Format, condition: bool, if_true: &str, if_false: &str, file: &Path) {
    let msg = if condition { if_true } else { if_false };
    match format {
        Format::Json => {
            let out = serde_json::json!({ "status": msg, "file": file.display().to_string() });
            println!(
                "{}",
                serde_json::to_string_pretty(&out).expect("status JSON serialization cannot fail")
            );
        }
        Format::Pretty => {
            eprintln!("{}: {}", msg, file.display());
        }
    }
}

/// Load `--config` if given, defaults otherwise.
fn load_config(path: Option<&Path>) -> Result<SettingsConfig> {
    let Some(path) = path else {
        return Ok(SettingsConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file '{}'", path.display()))?;
    load_config_from_str(&text)
        .with_context(|| format!("invalid config file '{}'", path.display()))
}
