//! Line-oriented driver for scripts and agents
//!
//! Reads one command per line and answers every line with one JSON object:
//! the game snapshot after the command, or an error for an unknown command.

use serde::Serialize;
use std::io::{self, BufRead, Write};
use tetris_core::{Action, Game, Snapshot};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Request {
    Play(Action),
    Tick,
    Reset,
    Quit,
}

fn parse_request(line: &str) -> Result<Request, String> {
    match line.trim().to_ascii_lowercase().as_str() {
        "tick" => Ok(Request::Tick),
        "reset" => Ok(Request::Reset),
        "quit" | "exit" => Ok(Request::Quit),
        other => other
            .parse::<Action>()
            .map(Request::Play)
            .map_err(|e| e.to_string()),
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Response {
    Snapshot(Snapshot),
    Error { error: String },
}

/// Run until `quit` or end of input
pub fn run<R: BufRead, W: Write>(game: &mut Game, input: R, mut output: W) -> io::Result<()> {
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let response = match parse_request(&line) {
            Ok(Request::Quit) => break,
            Ok(Request::Play(action)) => {
                game.apply(action);
                Response::Snapshot(game.snapshot())
            }
            Ok(Request::Tick) => {
                game.tick();
                Response::Snapshot(game.snapshot())
            }
            Ok(Request::Reset) => {
                game.reset();
                Response::Snapshot(game.snapshot())
            }
            Err(error) => {
                tracing::debug!("rejected headless command: {}", error);
                Response::Error { error }
            }
        };

        serde_json::to_writer(&mut output, &response)?;
        writeln!(output)?;
        output.flush()?;
    }

    tracing::info!(score = game.score(), "headless session finished");
    Ok(())
}
