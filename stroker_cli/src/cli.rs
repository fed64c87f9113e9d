//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

use stroker_core::GeneratorKind;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "stroker", version, about = "T-code motion scheduler")]
pub struct Cli {
    /// Path to config TOML
    #[arg(long, value_name = "FILE", default_value = "etc/stroker.toml")]
    pub config: PathBuf,

    /// Log as JSON lines instead of pretty
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Drive the transport from intent commands read on stdin
    #[command(long_about = "Drive the transport from intent commands read on stdin.\n\n\
        One command per line:\n  \
        stroke <n>[%|mm]     stroke window 0..n\n  \
        slide <min> <max>    stroke window min..max (percent)\n  \
        speed <n>[%]         speed in mm/s, or percent scaled by factors.speed_factor\n  \
        velocity <x>         raw velocity scaled by factors.velocity_factor\n  \
        mode 0|1             halt or run\n  \
        start | stop         halting always drops the speed to 0\n\n\
        Blank lines and lines starting with '#' are ignored. On end of input the \
        queued motion plays out before exit; Ctrl-C stops immediately.")]
    Run {
        /// Seed the pattern choice for reproducible runs
        #[arg(long, value_name = "N")]
        seed: Option<u64>,
    },
    /// Print the first frames of one pattern as T-code, without a transport
    Preview {
        /// Pattern name (costumed, full_stroke_with_roll, ..., tempest)
        #[arg(long, value_parser = parse_kind)]
        pattern: GeneratorKind,
        /// Number of frames to print
        #[arg(long, default_value_t = 20)]
        frames: usize,
        /// Stroke top, percent
        #[arg(long, default_value_t = 100)]
        top: i32,
        /// Stroke bottom, percent
        #[arg(long, default_value_t = 0)]
        bottom: i32,
        /// Secondary extent on the up phase, percent
        #[arg(long, default_value_t = 25)]
        back: i32,
        /// Secondary extent on the down phase, percent
        #[arg(long, default_value_t = 75)]
        forth: i32,
        /// Speed, mm/s
        #[arg(long, default_value_t = 200)]
        speed: u32,
        /// Seed for randomized patterns
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
    /// Validate the config and open/close the transport
    SelfCheck,
}

fn parse_kind(s: &str) -> Result<GeneratorKind, String> {
    s.parse::<GeneratorKind>().map_err(|e| e.to_string())
}
