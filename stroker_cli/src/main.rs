mod cli;
mod error_fmt;
mod run;
mod transport;

use std::path::Path;

use clap::Parser;
use eyre::{Report, Result, WrapErr};
use rand::SeedableRng;
use rand::rngs::StdRng;
use stroker_core::trajectory::preview;
use stroker_core::{MotionParams, Settings, StrokerError};

use crate::cli::{Cli, Commands, FILE_GUARD, JSON_MODE};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};

fn main() {
    let _ = color_eyre::install();
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);

    if let Err(e) = real_main(cli) {
        tracing::debug!(error = ?e, "command failed");
        if JSON_MODE.get().copied().unwrap_or(false) {
            println!("{}", format_error_json(&e));
        } else {
            eprintln!("{}", humanize(&e));
        }
        std::process::exit(exit_code_for_error(&e));
    }
}

fn load_config(path: &Path) -> Result<stroker_config::Config> {
    stroker_config::load_file(path).map_err(|e| {
        Report::new(StrokerError::Config(format!("{}: {e:#}", path.display())))
    })
}

fn real_main(cli: Cli) -> Result<()> {
    // Preview works from built-in ranges when no config file is present.
    let cfg = match &cli.cmd {
        Commands::Preview { .. } if !cli.config.exists() => None,
        _ => Some(load_config(&cli.config)?),
    };
    init_tracing(cli.json, &cli.log_level, cfg.as_ref().map(|c| &c.logging))?;
    tracing::debug!(config = %cli.config.display(), "configuration loaded");

    match (cli.cmd, cfg) {
        (Commands::Run { seed }, Some(cfg)) => run::run(&cfg, seed),
        (Commands::SelfCheck, Some(cfg)) => self_check(&cfg, cli.json),
        (
            Commands::Preview {
                pattern,
                frames,
                top,
                bottom,
                back,
                forth,
                speed,
                seed,
            },
            cfg,
        ) => {
            let settings = cfg.as_ref().map(Settings::from).unwrap_or_default();
            let params = MotionParams {
                top,
                bottom,
                back,
                forth,
                speed,
            };
            let mut rng = StdRng::seed_from_u64(seed);
            let lines = preview(
                pattern,
                &params,
                &settings.ranges,
                settings.trajectory,
                &mut rng,
                frames,
            )
            .map_err(Report::new)?;
            for frame in lines {
                println!("{frame}");
            }
            Ok(())
        }
        (_, None) => Err(Report::new(StrokerError::Config(format!(
            "{} not found",
            cli.config.display()
        )))),
    }
}

fn self_check(cfg: &stroker_config::Config, json: bool) -> Result<()> {
    let mut t = transport::from_config(&cfg.transport)?;
    t.open()
        .map_err(|e| Report::new(stroker_core::transport_error::map_transport_error("open", e.as_ref())))?;
    t.close()
        .map_err(|e| Report::new(stroker_core::transport_error::map_transport_error("close", e.as_ref())))?;
    let patterns = Settings::from(cfg).selector.optional;
    if json {
        let names: Vec<&str> = patterns.iter().map(|k| k.name()).collect();
        println!(
            "{}",
            serde_json::json!({ "status": "ok", "port": cfg.transport.port, "debug": cfg.transport.debug, "patterns": names })
        );
    } else {
        println!("OK");
    }
    Ok(())
}

fn init_tracing(
    json: bool,
    level: &str,
    logging: Option<&stroker_config::Logging>,
) -> Result<()> {
    use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

    // An explicit --log-level wins over [logging] level; RUST_LOG wins over both.
    let level = match logging.and_then(|l| l.level.as_deref()) {
        Some(cfg_level) if level == "info" => cfg_level,
        _ => level,
    };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .wrap_err_with(|| format!("invalid log level {level:?}"))?;

    let console = if json {
        fmt::layer().json().with_writer(std::io::stderr).boxed()
    } else {
        fmt::layer().with_writer(std::io::stderr).boxed()
    };

    let file = match logging.and_then(|l| l.file.as_deref()) {
        Some(path) => {
            let path = Path::new(path);
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .ok_or_else(|| eyre::eyre!("logging.file has no file name"))?;
            let appender = match logging.and_then(|l| l.rotation.as_deref()) {
                Some("daily") => tracing_appender::rolling::daily(dir, name),
                Some("hourly") => tracing_appender::rolling::hourly(dir, name),
                _ => tracing_appender::rolling::never(dir, name),
            };
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = FILE_GUARD.set(guard);
            Some(fmt::layer().json().with_ansi(false).with_writer(writer).boxed())
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init()
        .map_err(|e| eyre::eyre!("install tracing subscriber: {e}"))
}
