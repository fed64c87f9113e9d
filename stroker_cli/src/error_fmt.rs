//! Human-readable error descriptions and structured JSON error formatting.

use stroker_core::StrokerError;

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    if let Some(se) = err.downcast_ref::<StrokerError>() {
        return match se {
            StrokerError::Domain(msg) => format!(
                "What happened: Motion request out of range ({msg}).\nLikely causes: A stroke or position outside 0-100%, or axis ranges whose min equals max.\nHow to fix: Send values within 0-100% and give every axis in [ranges] a non-empty span."
            ),
            StrokerError::Config(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Missing [ranges.*] table, unknown key, or out-of-range value in the TOML.\nHow to fix: Edit the config file (see etc/stroker.toml), then rerun."
            ),
            StrokerError::Transport(msg) if msg.contains("unavailable") || msg.starts_with("open") => format!(
                "What happened: Could not open the transport ({msg}).\nLikely causes: Wrong [transport] port, device unplugged, or no permission on the serial device.\nHow to fix: Check the port name and cabling, or set transport.debug = true to run without hardware."
            ),
            StrokerError::Transport(msg) => format!(
                "What happened: Transport failed while sending ({msg}).\nLikely causes: Device disconnected or serial link dropped mid-run.\nHow to fix: Reconnect the device and restart; motion is not resumed automatically."
            ),
            StrokerError::State(msg) => format!(
                "What happened: Internal state error ({msg}).\nLikely causes: Dispatch thread stopped unexpectedly.\nHow to fix: Re-run with --log-level=debug and report the log."
            ),
        };
    }

    let msg = err.to_string();
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes per error class; anything untyped returns 1.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    match err.downcast_ref::<StrokerError>() {
        Some(StrokerError::Domain(_)) => 3,
        Some(StrokerError::Config(_)) => 4,
        Some(StrokerError::Transport(_)) => 5,
        Some(StrokerError::State(_)) | None => 1,
    }
}

fn reason_name(err: &eyre::Report) -> &'static str {
    match err.downcast_ref::<StrokerError>() {
        Some(StrokerError::Domain(_)) => "Domain",
        Some(StrokerError::Config(_)) => "Config",
        Some(StrokerError::Transport(_)) => "Transport",
        Some(StrokerError::State(_)) => "State",
        None => "Error",
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;
    json!({
        "reason": reason_name(err),
        "exit_code": exit_code_for_error(err),
        "message": humanize(err),
    })
    .to_string()
}
