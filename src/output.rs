// ABOUTME: Terminal feedback for the wardeploy binary.
// ABOUTME: Renders phases, warnings, and failures as text, bare results, or JSON lines.

use serde::Serialize;
use std::time::Instant;

use crate::deploy::{DeployPhase, ProgressEvent, ValidationFailure};

/// How much the binary prints, and in which format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Status lines, warnings, and a timed summary
    Normal,
    /// The final result and errors only
    Quiet,
    /// One JSON object per line
    Json,
}

/// Where a JSON line goes.
#[derive(Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

pub struct Output {
    mode: OutputMode,
    started: Option<Instant>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            started: None,
        }
    }

    pub fn start_timer(&mut self) {
        self.started = Some(Instant::now());
    }

    /// Seconds since [`Output::start_timer`], or `None` if it was never called.
    pub fn elapsed_secs(&self) -> Option<f64> {
        self.started.map(|t| t.elapsed().as_secs_f64())
    }

    /// Informational line; normal mode only.
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            println!("{message}");
        }
    }

    /// Normal mode shows the phase's status line, if it has one. JSON mode reports every phase.
    pub fn phase(&self, event: &ProgressEvent) {
        match self.mode {
            OutputMode::Normal => {
                if let Some(message) = event.message {
                    println!("  → {message}");
                }
            }
            OutputMode::Quiet => {}
            OutputMode::Json => self.json(
                Stream::Stdout,
                &JsonEvent {
                    event: "progress",
                    message: event.message.unwrap_or_default(),
                    phase: Some(event.phase),
                    duration_secs: self.elapsed_secs(),
                },
            ),
        }
    }

    pub fn success(&self, message: &str) {
        match (self.mode, self.elapsed_secs()) {
            (OutputMode::Normal, Some(secs)) => println!("{message} ({secs:.1}s)"),
            (OutputMode::Normal | OutputMode::Quiet, _) => println!("{message}"),
            (OutputMode::Json, duration_secs) => self.json(
                Stream::Stdout,
                &JsonEvent {
                    event: "success",
                    message,
                    phase: Some(DeployPhase::Done),
                    duration_secs,
                },
            ),
        }
    }

    pub fn warning(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => eprintln!("Warning: {message}"),
            OutputMode::Json => self.json(
                Stream::Stdout,
                &JsonEvent {
                    event: "warning",
                    message,
                    phase: None,
                    duration_secs: None,
                },
            ),
        }
    }

    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => eprintln!("Error: {message}"),
            OutputMode::Json => self.json(
                Stream::Stderr,
                &JsonEvent {
                    event: "error",
                    message,
                    phase: None,
                    duration_secs: self.elapsed_secs(),
                },
            ),
        }
    }

    /// Every problem that stopped a deployment before it began.
    pub fn validation_failure(&self, failure: &ValidationFailure) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => {
                eprintln!("Error: validation failed");
                for message in failure.messages() {
                    eprintln!("  - {message}");
                }
            }
            OutputMode::Json => self.json(
                Stream::Stderr,
                &JsonFailure {
                    event: "error",
                    message: "validation failed",
                    failure,
                },
            ),
        }
    }

    fn json<T: Serialize>(&self, stream: Stream, value: &T) {
        let Ok(line) = serde_json::to_string(value) else {
            return;
        };
        match stream {
            Stream::Stdout => println!("{line}"),
            Stream::Stderr => eprintln!("{line}"),
        }
    }
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    phase: Option<DeployPhase>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}

#[derive(Serialize)]
struct JsonFailure<'a> {
    event: &'a str,
    message: &'a str,
    #[serde(flatten)]
    failure: &'a ValidationFailure,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deploy::Problem;

    #[test]
    fn timer_is_unset_until_started() {
        let mut output = Output::new(OutputMode::Quiet);
        assert_eq!(output.elapsed_secs(), None);

        output.start_timer();
        assert!(output.elapsed_secs().is_some());
    }

    #[test]
    fn json_event_omits_empty_fields() {
        let event = JsonEvent {
            event: "warning",
            message: "backup kept",
            phase: None,
            duration_secs: None,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"event":"warning","message":"backup kept"}"#);
    }

    #[test]
    fn json_event_includes_phase() {
        let event = JsonEvent {
            event: "progress",
            message: "佈署中...",
            phase: Some(DeployPhase::Copying),
            duration_secs: None,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""phase":"copying""#));
    }

    #[test]
    fn json_failure_carries_problem_list() {
        let failure = ValidationFailure::single(Problem::ServerHomeNotUsable);
        let event = JsonFailure {
            event: "error",
            message: "validation failed",
            failure: &failure,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["problems"][0]["kind"], "server_home_not_usable");
    }
}
