// Command-line front end: `ecd <quest> <event> [--seed N] [--part P]`
// prints decrypted inputs, `--answer A` submits an answer instead.

use std::io::Write;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser};

use crate::api::ApiClient;
use crate::types::{Answer, Part, QuestId};
use crate::ui;

#[derive(Parser, Debug)]
#[command(
    name = "ecd",
    version,
    disable_version_flag = true,
    about = "Everybody Codes Data",
    long_about = "Fetch, decrypt and cache Everybody Codes puzzle inputs"
)]
pub struct Cli {
    /// Puzzle quest, e.g. 1-20
    pub quest: u32,

    /// Puzzle event, e.g. 2024 or 2025
    pub event: u32,

    /// Optional seed for the API (1-100)
    #[arg(long, value_name = "1-100")]
    pub seed: Option<u64>,

    /// Print only the specific part (1, 2 or 3)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=3))]
    pub part: Option<u8>,

    /// Submit this answer for --part instead of printing inputs
    #[arg(long, requires = "part")]
    pub answer: Option<String>,

    /// Submit without asking for confirmation
    #[arg(long, short = 'y', requires = "answer")]
    pub yes: bool,

    /// Only log the submission result, print nothing
    #[arg(long, short = 'q', requires = "answer")]
    pub quiet: bool,

    /// Prompt for the auth token and store it before continuing
    #[arg(long)]
    pub set_token: bool,

    /// Print version
    #[arg(short = 'v', long, action = ArgAction::Version, value_parser = clap::value_parser!(bool))]
    version: (),
}

impl Cli {
    /// Quest and event, tolerating them being given in swapped order.
    pub fn quest_id(&self) -> QuestId {
        QuestId::from_loose(self.quest, self.event)
    }

    pub fn part(&self) -> Option<Part> {
        self.part.and_then(|n| Part::try_from(n).ok())
    }
}

/// Run the parsed command, writing normal output to `out`.
pub fn run<W: Write>(client: &ApiClient, cli: &Cli, out: &mut W) -> Result<ExitCode> {
    if cli.set_token {
        let token = ui::prompt_token()?;
        client
            .cache()
            .store_token(&token)
            .context("Failed to store token")?;
    }

    let id = cli.quest_id();
    match &cli.answer {
        Some(raw) => submit(client, cli, id, raw),
        None => print_inputs(client, cli, id, out),
    }
}

fn print_inputs<W: Write>(client: &ApiClient, cli: &Cli, id: QuestId, out: &mut W) -> Result<ExitCode> {
    let spinner = ui::spinner("Fetching inputs...");
    let inputs = client.inputs(id, cli.seed);
    spinner.finish_and_clear();
    let inputs = inputs.with_context(|| format!("Failed to get inputs for {id}"))?;

    match ui::render_inputs(&inputs, cli.part()) {
        Ok(text) => {
            writeln!(out, "{text}")?;
            Ok(ExitCode::SUCCESS)
        }
        Err(part) => {
            eprintln!("{}", ui::part_unavailable(part));
            Ok(ExitCode::FAILURE)
        }
    }
}

fn submit(client: &ApiClient, cli: &Cli, id: QuestId, raw: &str) -> Result<ExitCode> {
    let Some(part) = cli.part() else {
        bail!("--answer needs --part");
    };
    let answer = Answer::parse(raw);
    if !cli.yes && !ui::confirm_submit(id, part, &answer)? {
        return Ok(ExitCode::SUCCESS);
    }

    let spinner = ui::spinner("Submitting...");
    let submission = client.submit(id, part, answer);
    spinner.finish_and_clear();
    let submission = submission.context("Failed to send answer")?;

    if !cli.quiet {
        ui::print_submission(&submission);
    }
    Ok(ExitCode::SUCCESS)
}
