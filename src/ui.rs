// UI layer: terminal output and prompts for the `ecd` binary. Rendering is
// kept in plain functions returning strings so it can be tested without a
// terminal; the `print_*`/`prompt_*` helpers do the actual I/O.

use std::time::Duration;

use anyhow::Result;
use crossterm::style::{Color, Stylize};
use dialoguer::{Confirm, Password};
use indicatif::{ProgressBar, ProgressStyle};

use crate::api::{already_submitted_message, pretty, Outcome, Submission};
use crate::types::{Answer, Inputs, Part, QuestId};

/// Spinner on stderr while a request is in flight. Hidden when stderr is
/// not a terminal.
pub fn spinner(msg: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(msg.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Text printed for a fetch: the whole map as indented JSON, or a single
/// part's plaintext. `Err(part)` when that part is not unlocked yet.
pub fn render_inputs(inputs: &Inputs, part: Option<Part>) -> Result<String, Part> {
    match part {
        Some(part) => inputs.get(&part.label()).cloned().ok_or(part),
        None => Ok(serde_json::to_string_pretty(inputs).unwrap_or_default()),
    }
}

pub fn part_unavailable(part: Part) -> String {
    format!("ERROR: part {part} is not available yet.")
}

/// Report line for a submission, or `None` when the outcome is only logged.
pub fn submission_report(sub: &Submission) -> Option<String> {
    match sub.outcome() {
        Outcome::Correct(data) => Some(format!(
            "Submitted {} to {} and got:\n{}",
            sub.answer,
            sub.url,
            pretty(&data)
        )),
        Outcome::AlreadySubmitted => Some(format!(
            "Submitted {} to {} and got {}",
            sub.answer,
            sub.url,
            already_submitted_message(sub)
        )),
        _ => None,
    }
}

/// Print the verdict with a colored tag, followed by the report if any.
pub fn print_submission(sub: &Submission) {
    let (tag, color) = match sub.outcome() {
        Outcome::Correct(_) => ("CORRECT".to_string(), Color::Green),
        Outcome::Incorrect(_) => ("INCORRECT".to_string(), Color::Red),
        Outcome::AlreadySubmitted => ("ALREADY SUBMITTED".to_string(), Color::Yellow),
        Outcome::Locked => ("LOCKED".to_string(), Color::Yellow),
        Outcome::Unexpected => (format!("HTTP {}", sub.status.as_u16()), Color::Red),
    };
    let tag = tag.with(color).bold();
    println!("{tag}");
    if let Some(report) = submission_report(sub) {
        println!("{report}");
    }
}

/// Ask before sending an answer.
pub fn confirm_submit(id: QuestId, part: Part, answer: &Answer) -> Result<bool> {
    let prompt = format!("Submit {answer} for part {part} of {id}?");
    Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
}

/// Read an auth token without echoing it.
pub fn prompt_token() -> Result<String> {
    let token: String = Password::new()
        .with_prompt("everybody-codes token (cookie value)")
        .interact()?;
    Ok(token.trim().to_string())
}
