//! raypoint - headless pointer session runner

use anyhow::Result;
use raypoint::config::PointerConfig;
use raypoint::script::ScriptFile;
use raypoint::session::{self, SessionConfig};
use raypoint_tracking::SelectorPolicy;
use std::{env, path::PathBuf};
use tracing::info;

fn main() -> Result<()> {
    // Initialize tracing with WARN level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    info!("Starting raypoint v{}", env!("CARGO_PKG_VERSION"));

    let cli = CliOptions::parse(env::args().skip(1));
    if cli.help {
        print_usage();
        return Ok(());
    }

    let mut pointer = match cli.config.as_deref() {
        Some(path) => PointerConfig::load_from_path(path),
        None => PointerConfig::load(),
    };
    if let Some(policy) = cli.policy {
        pointer.selector_policy = policy;
    }

    let script = match cli.script.as_deref() {
        Some(path) => ScriptFile::from_path(path)?,
        None => {
            info!("No --script given; running the built-in demo");
            ScriptFile::demo()
        }
    };

    let summary = session::run(SessionConfig {
        pointer,
        script,
        frames: cli.frames,
        record: cli.record,
    })?;

    if let Some(path) = cli.summary {
        summary.write_json(&path)?;
    }
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn print_usage() {
    println!(
        "usage: raypoint [--config PATH] [--script PATH] [--frames N] [--record PATH] \
         [--summary PATH] [--policy {}]",
        SelectorPolicy::ALL.map(SelectorPolicy::name).join("|")
    );
}

#[derive(Debug, Default)]
struct CliOptions {
    help: bool,
    config: Option<PathBuf>,
    script: Option<PathBuf>,
    frames: Option<u64>,
    record: Option<PathBuf>,
    summary: Option<PathBuf>,
    policy: Option<SelectorPolicy>,
}

impl CliOptions {
    fn parse<I: Iterator<Item = String>>(mut args: I) -> Self {
        let mut opts = CliOptions::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => opts.help = true,
                "--config" => {
                    if let Some(path) = args.next() {
                        opts.config = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--config requires a file path");
                    }
                }
                "--script" => {
                    if let Some(path) = args.next() {
                        opts.script = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--script requires a file path");
                    }
                }
                "--record" => {
                    if let Some(path) = args.next() {
                        opts.record = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--record requires a file path");
                    }
                }
                "--summary" => {
                    if let Some(path) = args.next() {
                        opts.summary = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--summary requires a file path");
                    }
                }
                "--frames" => {
                    if let Some(raw) = args.next() {
                        match raw.parse::<u64>() {
                            Ok(value) => opts.frames = Some(value),
                            Err(err) => {
                                tracing::error!(%err, value = %raw, "--frames must be an integer");
                            }
                        }
                    } else {
                        tracing::error!("--frames requires an integer");
                    }
                }
                "--policy" => {
                    if let Some(raw) = args.next() {
                        match SelectorPolicy::from_name(&raw) {
                            Some(policy) => opts.policy = Some(policy),
                            None => {
                                tracing::error!(value = %raw, "unknown --policy");
                            }
                        }
                    } else {
                        tracing::error!("--policy requires a value");
                    }
                }
                other => {
                    tracing::warn!(arg = %other, "ignoring unknown argument");
                }
            }
        }

        opts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliOptions {
        CliOptions::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn parses_all_flags() {
        let opts = parse(&[
            "--config",
            "pointer.toml",
            "--script",
            "demo.json",
            "--frames",
            "120",
            "--record",
            "out/frames.jsonl",
            "--policy",
            "first-valid-role",
        ]);
        assert_eq!(opts.config, Some(PathBuf::from("pointer.toml")));
        assert_eq!(opts.script, Some(PathBuf::from("demo.json")));
        assert_eq!(opts.frames, Some(120));
        assert_eq!(opts.record, Some(PathBuf::from("out/frames.jsonl")));
        assert_eq!(opts.policy, Some(SelectorPolicy::FirstValidRole));
    }

    #[test]
    fn bad_values_are_dropped() {
        let opts = parse(&["--frames", "many", "--policy", "left-first", "--bogus", "--record"]);
        assert_eq!(opts.frames, None);
        assert_eq!(opts.policy, None);
        assert_eq!(opts.record, None);
    }
}
