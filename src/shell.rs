//! Line-oriented interactive loop over a loaded [`Session`].

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use crate::cli::ShellLine;
use crate::session::Session;

const PROMPT: &str = "aitrends> ";

/// Reads commands from `input` until `quit`, `exit` or end of input.
///
/// A command that fails prints `error: ...` and the loop keeps going.
pub fn run<R: BufRead, W: Write>(session: &Session, input: R, out: &mut W, json: bool) -> Result<()> {
    writeln!(
        out,
        "Loaded {}. Type `help` for commands, `quit` to leave.",
        session.source().display()
    )?;
    let mut lines = input.lines();
    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;
        let Some(line) = lines.next() else {
            writeln!(out)?;
            break;
        };
        let line = line.context("failed to read from stdin")?;
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => continue,
            ["quit" | "exit"] => break,
            _ => {}
        }
        debug!(command = %line.trim(), "shell command");

        let command = match ShellLine::try_parse_from(words.iter().copied()) {
            Ok(parsed) => parsed.command,
            // Covers `help` and `--help` as well as parse errors.
            Err(e) => {
                write!(out, "{}", e.render())?;
                continue;
            }
        };
        match session
            .execute(&command)
            .and_then(|report| report.render(json))
        {
            Ok(text) => writeln!(out, "{}", text.trim_end())?,
            Err(e) => writeln!(out, "error: {e:#}")?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use aitrends_io::{SequenceData, SequenceRecord};
    use aitrends_markov::{Distribution, MarkovConfig, MarkovModel, StateSet};

    fn session() -> Session {
        let data = SequenceData {
            records: vec![SequenceRecord {
                user_id: "u1".to_string(),
                states: vec!["A".to_string(), "B".to_string()],
            }],
            skipped: Vec::new(),
        };
        let states = StateSet::new(["A", "B"]).unwrap();
        let model = MarkovModel::fit(
            &data.records,
            states,
            Distribution::uniform(2),
            &MarkovConfig::new(),
        )
        .unwrap();
        Session::new(data, model, PathBuf::from("memory.csv"))
    }

    fn run_script(script: &str, json: bool) -> String {
        let mut out = Vec::new();
        run(&session(), script.as_bytes(), &mut out, json).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn runs_until_quit() {
        let out = run_script("matrix\nquit\nmatrix\n", false);
        assert_eq!(out.matches("Transition matrix").count(), 1);
    }

    #[test]
    fn continues_after_errors() {
        let out = run_script("recommend --top 0\nfrobnicate\n\nstationary\n", false);
        assert!(out.contains("error: failed to rank destinations"));
        assert!(out.contains("Long-run distribution"));
    }

    #[test]
    fn stops_at_end_of_input() {
        let out = run_script("initial", false);
        assert!(out.contains("Initial distribution"));
        assert!(out.ends_with('\n'));
    }

    #[test]
    fn nested_shell_rejected() {
        let out = run_script("shell\nexit\n", false);
        assert!(out.contains("error: already in the interactive shell"));
    }

    #[test]
    fn json_output() {
        let out = run_script("forecast -n 2\n", true);
        assert!(out.contains("\"report\": \"forecast\""));
        assert!(out.contains("\"steps\": 2"));
    }
}
