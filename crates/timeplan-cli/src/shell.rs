//! Interactive menu shell
//!
//! Reads an action name (or its menu number), prompts for each field listed in
//! the dispatch table, runs the action and prints the outcome. Errors from an
//! action are printed and the loop continues; `quit` or end of input stops it.

use std::io::{BufRead, Write};

use anyhow::Result;

use crate::app::{lookup, App, Outcome, ACTIONS};

const TITLE: &str = "Project Management";

/// Run the shell until `quit` or end of input
pub fn run<R: BufRead, W: Write>(app: &mut App, mut input: R, mut output: W) -> Result<()> {
    print_menu(&mut output)?;

    loop {
        let Some(choice) = prompt(&mut input, &mut output, ">")? else {
            break;
        };

        match choice.as_str() {
            "" => continue,
            "q" | "quit" | "exit" => break,
            "?" | "help" => {
                print_menu(&mut output)?;
                continue;
            }
            _ => {}
        }

        let Some(spec) = lookup(&choice) else {
            writeln!(output, "Unknown action '{}'. Type 'help' for the menu.", choice)?;
            continue;
        };

        let mut fields = Vec::with_capacity(spec.fields.len());
        for label in spec.fields {
            match prompt(&mut input, &mut output, &format!("{}:", label))? {
                Some(value) => fields.push(value),
                None => return Ok(()),
            }
        }

        match app.execute((spec.build)(fields)) {
            Ok(outcome) => print_outcome(&mut output, &outcome)?,
            Err(e) => {
                tracing::debug!(action = spec.key, error = %e, "action failed");
                writeln!(output, "error: {:#}", e)?;
            }
        }
    }

    output.flush()?;
    Ok(())
}

fn print_menu<W: Write>(output: &mut W) -> Result<()> {
    writeln!(output, "{}", TITLE)?;
    for (index, spec) in ACTIONS.iter().enumerate() {
        writeln!(output, "  {}) {:<13} {}", index + 1, spec.key, spec.label)?;
    }
    writeln!(output, "  q) quit")?;
    Ok(())
}

/// Print `label`, read one trimmed line. `None` at end of input.
fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W, label: &str) -> Result<Option<String>> {
    write!(output, "{} ", label)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        writeln!(output)?;
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

pub(crate) fn print_outcome<W: Write>(output: &mut W, outcome: &Outcome) -> Result<()> {
    if let Some(message) = &outcome.message {
        writeln!(output, "{}", message)?;
    }
    for line in &outcome.lines {
        writeln!(output, "{}", line)?;
    }
    Ok(())
}
