//! `stroker run`: stdin intent commands in, paced T-code out.

use std::io::BufRead;
use std::time::Duration;

use crossbeam_channel as xch;
use eyre::{Report, Result, WrapErr};
use rand::SeedableRng;
use rand::rngs::StdRng;
use stroker_core::{
    FillReport, FrameQueue, IntentEvent, Mode, Scheduler, Selector, Settings, SpeedUnit,
    StrokeUnit, StrokerError,
};
use stroker_traits::MonotonicClock;

use crate::transport;

/// One parsed stdin line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Intent(IntentEvent),
    /// Pause input processing; lets scripted sessions play motion out.
    Wait(Duration),
}

fn bad(line: &str, why: &str) -> StrokerError {
    StrokerError::Domain(format!("cannot parse {line:?}: {why}"))
}

fn number<T: std::str::FromStr>(line: &str, tok: Option<&str>, what: &str) -> Result<T, StrokerError> {
    tok.ok_or_else(|| bad(line, &format!("missing {what}")))?
        .parse::<T>()
        .map_err(|_| bad(line, &format!("{what} is not a number")))
}

/// Parse one command line. Blank lines and `#` comments yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, StrokerError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let mut toks = line.split_whitespace();
    let verb = toks.next().unwrap_or_default().to_ascii_lowercase();
    let event = match verb.as_str() {
        "stroke" => {
            let raw = toks.next().ok_or_else(|| bad(line, "missing value"))?;
            let (digits, unit) = if let Some(v) = raw.strip_suffix('%') {
                (v, StrokeUnit::Percent)
            } else if let Some(v) = raw.strip_suffix("mm") {
                (v, StrokeUnit::Millimetres)
            } else {
                (raw, StrokeUnit::Millimetres)
            };
            IntentEvent::SetStroke {
                value: number(line, Some(digits), "stroke")?,
                unit,
            }
        }
        "slide" => IntentEvent::Slide {
            min: toks.next().map(|t| number(line, Some(t), "min")).transpose()?,
            max: toks.next().map(|t| number(line, Some(t), "max")).transpose()?,
        },
        "speed" => {
            let raw = toks.next().ok_or_else(|| bad(line, "missing value"))?;
            let (digits, unit) = match raw.strip_suffix('%') {
                Some(v) => (v, SpeedUnit::Percent),
                None => (raw, SpeedUnit::MillimetresPerSecond),
            };
            IntentEvent::SetSpeed {
                value: number(line, Some(digits), "speed")?,
                unit,
            }
        }
        "velocity" => IntentEvent::SetVelocity(number(line, toks.next(), "velocity")?),
        "mode" => match toks.next() {
            Some("0") => IntentEvent::SetMode(Mode::Halting),
            Some("1") => IntentEvent::SetMode(Mode::Running),
            _ => return Err(bad(line, "mode must be 0 or 1")),
        },
        "start" => IntentEvent::Start,
        "stop" => IntentEvent::Stop,
        "wait" => {
            let ms: u64 = number(line, toks.next(), "milliseconds")?;
            return Ok(Some(Command::Wait(Duration::from_millis(ms))));
        }
        _ => return Err(bad(line, "unknown command")),
    };
    Ok(Some(Command::Intent(event)))
}

fn spawn_stdin_reader() -> xch::Receiver<String> {
    let (tx, rx) = xch::unbounded();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(l) => {
                    if tx.send(l).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "stdin read failed");
                    break;
                }
            }
        }
        tracing::debug!("stdin closed");
    });
    rx
}

fn log_fill(report: &FillReport) {
    match report.pattern {
        Some(kind) => tracing::debug!(
            pattern = %kind,
            frames = report.frames,
            total_ms = report.total_ms,
            "motion queued"
        ),
        None => tracing::debug!(session = %report.session, "queue cleared, idle"),
    }
}

pub fn run(cfg: &stroker_config::Config, seed: Option<u64>) -> Result<()> {
    let settings = Settings::from(cfg);
    let poll = settings.scheduler.poll;
    let queue = FrameQueue::new();
    let transport = transport::from_config(&cfg.transport)?;
    let scheduler = Scheduler::start(
        queue.clone(),
        transport,
        MonotonicClock::new(),
        settings.scheduler,
    )
    .wrap_err("start dispatch")?;
    let rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    };
    let mut selector = Selector::with_rng(queue.clone(), settings, rng);

    let (int_tx, interrupted) = xch::bounded::<()>(1);
    ctrlc::set_handler(move || {
        let _ = int_tx.try_send(());
    })
    .wrap_err("install Ctrl-C handler")?;

    let lines = spawn_stdin_reader();
    tracing::info!(port = %cfg.transport.port, debug = cfg.transport.debug, "stroker running");

    // Waits up to `d`; `Ok(true)` means Ctrl-C arrived and the queue was cleared.
    let pause = |d: Duration| -> Result<bool> {
        let step = xch::select! {
            recv(scheduler.failures()) -> e => e.ok(),
            recv(interrupted) -> _ => {
                tracing::info!("interrupted");
                queue.clear();
                return Ok(true);
            }
            default(d) => None,
        };
        match step {
            Some(e) => Err(Report::new(e)),
            None => Ok(false),
        }
    };

    loop {
        let msg = xch::select! {
            recv(lines) -> msg => msg.ok(),
            recv(scheduler.failures()) -> e => match e {
                Ok(e) => return Err(Report::new(e)),
                Err(_) => continue,
            },
            recv(interrupted) -> _ => {
                tracing::info!("interrupted");
                queue.clear();
                break;
            }
        };
        let Some(line) = msg else {
            tracing::info!(pending = queue.len(), "input finished; draining queue");
            while !queue.is_empty() {
                if pause(poll)? {
                    break;
                }
            }
            break;
        };
        match parse_command(&line) {
            Ok(None) => {}
            Ok(Some(Command::Intent(ev))) => match selector.apply(ev) {
                Ok(report) => log_fill(&report),
                Err(e) if matches!(
                    e.downcast_ref::<StrokerError>(),
                    Some(StrokerError::Domain(_))
                ) =>
                {
                    tracing::warn!(error = %e, "intent rejected");
                }
                Err(e) => return Err(e),
            },
            Ok(Some(Command::Wait(d))) => {
                if pause(d)? {
                    break;
                }
            }
            Err(e) => tracing::warn!(error = %e, "ignoring input line"),
        }
    }

    scheduler.stop()?;
    tracing::info!("stroker stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("stroke 80%", IntentEvent::SetStroke { value: 80, unit: StrokeUnit::Percent })]
    #[case("stroke 150mm", IntentEvent::SetStroke { value: 150, unit: StrokeUnit::Millimetres })]
    #[case("stroke 150", IntentEvent::SetStroke { value: 150, unit: StrokeUnit::Millimetres })]
    #[case("slide 10 90", IntentEvent::Slide { min: Some(10), max: Some(90) })]
    #[case("slide", IntentEvent::Slide { min: None, max: None })]
    #[case("speed 40%", IntentEvent::SetSpeed { value: 40, unit: SpeedUnit::Percent })]
    #[case("SPEED 250", IntentEvent::SetSpeed { value: 250, unit: SpeedUnit::MillimetresPerSecond })]
    #[case("velocity 1.5", IntentEvent::SetVelocity(1.5))]
    #[case("mode 1", IntentEvent::SetMode(Mode::Running))]
    #[case("mode 0", IntentEvent::SetMode(Mode::Halting))]
    #[case("  start ", IntentEvent::Start)]
    #[case("stop", IntentEvent::Stop)]
    fn parses_intent_commands(#[case] line: &str, #[case] expected: IntentEvent) {
        assert_eq!(parse_command(line), Ok(Some(Command::Intent(expected))));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("# comment")]
    fn skips_blank_and_comment_lines(#[case] line: &str) {
        assert_eq!(parse_command(line), Ok(None));
    }

    #[rstest]
    #[case("fly 3")]
    #[case("mode 2")]
    #[case("stroke")]
    #[case("speed fast")]
    #[case("slide 10 x")]
    fn rejects_malformed_lines(#[case] line: &str) {
        assert!(matches!(parse_command(line), Err(StrokerError::Domain(_))));
    }

    #[test]
    fn wait_is_a_script_pause() {
        assert_eq!(
            parse_command("wait 250"),
            Ok(Some(Command::Wait(Duration::from_millis(250))))
        );
    }
}
