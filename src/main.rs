//! `aafprobe`: inspect the essence files and locators an AAF composition
//! points at.
//!
//! ```bash
//! aafprobe riff take1.wav take2.aif --json
//! aafprobe riff summary.wav --summary
//! aafprobe uri "file:///C|/Audio%20Files/take1.wav" --decode
//! ```

use std::path::PathBuf;

use aafprobe_lib::{ParseFlags, RiffAudioFile, Uri, UriOptions, probe_files, uri};
use anyhow::{Result as R, anyhow};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "aafprobe", about = "Probe AAF external essence files and URIs", version)]
struct Cli {
    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read the audio format of WAV/AIFF files.
    Riff {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Stop after the format chunk.
        #[arg(long)]
        header_only: bool,

        /// The files are AAF essence summaries: stop at the data chunk header.
        #[arg(long)]
        summary: bool,

        #[arg(long)]
        json: bool,
    },

    /// Split a URI into its components.
    Uri {
        uri: String,

        /// Percent-decode every component.
        #[arg(long)]
        decode: bool,

        #[arg(long)]
        json: bool,
    },
}

fn main() -> R<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Riff {
            files,
            header_only,
            summary,
            json,
        } => {
            let mut flags = ParseFlags::NONE;
            flags.set(ParseFlags::HEADER_ONLY, header_only);
            flags.set(ParseFlags::AAF_SUMMARY, summary);
            cmd_riff(&files, flags, json)
        }
        Commands::Uri { uri, decode, json } => {
            let options = if decode {
                UriOptions::DECODE_ALL
            } else {
                UriOptions::NONE
            };
            cmd_uri(&uri, options, json)
        }
    }
}

fn riff_json(file: &RiffAudioFile) -> serde_json::Value {
    serde_json::json!({
        "channels": file.channels,
        "sample_rate": file.sample_rate,
        "sample_size": file.sample_size,
        "sample_count": file.sample_count,
        "pcm_audio_start_offset": file.pcm_audio_start_offset,
    })
}

fn cmd_riff(files: &[PathBuf], flags: ParseFlags, json: bool) -> R<()> {
    let results = probe_files(files, flags);
    let mut failures = 0;
    let mut entries = Vec::new();

    for (path, result) in files.iter().zip(results) {
        match result {
            Ok(file) if json => {
                let mut entry = riff_json(&file);
                entry["file"] = serde_json::json!(path.display().to_string());
                entries.push(entry);
            }
            Ok(file) => {
                println!("{}", path.display());
                println!("  Channels:      {}", file.channels);
                println!("  Sample rate:   {} Hz", file.sample_rate);
                println!("  Sample size:   {} bits", file.sample_size);
                println!("  Sample count:  {}", file.sample_count);
                println!("  Audio offset:  {}", file.pcm_audio_start_offset);
            }
            Err(e) => {
                tracing::error!("{:#}", e);
                failures += 1;
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    }

    if failures > 0 {
        return Err(anyhow!("{} of {} files could not be probed", failures, files.len()));
    }
    Ok(())
}

fn uri_json(uri: &Uri) -> serde_json::Value {
    serde_json::json!({
        "scheme": uri.scheme,
        "scheme_type": uri.scheme_type.as_str(),
        "authority": uri.authority,
        "userinfo": uri.userinfo,
        "user": uri.user,
        "pass": uri.pass,
        "host": uri.host,
        "port": uri.port,
        "path": uri.path,
        "query": uri.query,
        "fragment": uri.fragment,
        "flags": uri.flags.bits(),
        "localhost": uri.is_localhost(),
    })
}

fn cmd_uri(input: &str, options: UriOptions, json: bool) -> R<()> {
    let uri = uri::parse(input, options).map_err(|e| anyhow!("{}: {}", input, e))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&uri_json(&uri))?);
        return Ok(());
    }

    let show = |value: &Option<String>| value.as_deref().unwrap_or("-").to_string();
    println!("Scheme:    {} ({})", uri.scheme, uri.scheme_type);
    println!("Authority: {}", show(&uri.authority));
    println!("User:      {}", show(&uri.user));
    println!("Host:      {}", show(&uri.host));
    println!("Port:      {}", uri.port);
    println!("Path:      {}", show(&uri.path));
    println!("Query:     {}", show(&uri.query));
    println!("Fragment:  {}", show(&uri.fragment));
    println!("Flags:     {:?}", uri.flags);
    Ok(())
}
