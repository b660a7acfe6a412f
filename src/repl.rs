use crate::error::{PKError, PKResult};
use crate::output::Renderer;
use crate::pipeline::Pipeline;
use log::{debug, error, warn};
use std::io::{BufRead, Write};

pub const PROMPT: &str =
    "Enter command (e.g., 'show me wellbutrin xl at 300 mg') or 'quit' to exit: ";
const QUIT: &str = "quit";

/// Counts reported when the loop ends.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionStats {
    pub rendered: usize,
    pub failed: usize,
}

/// Read commands line by line until `quit` or end of input. A bad command
/// prints a message and the loop asks again; only I/O on `input`/`output`
/// can end it early.
pub fn run_loop<R: BufRead, W: Write>(
    pipeline: &Pipeline<'_>,
    renderer: &dyn Renderer,
    mut input: R,
    mut output: W,
) -> PKResult<SessionStats> {
    let mut stats = SessionStats::default();
    let mut line = String::new();

    loop {
        write!(output, "{}", PROMPT)?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            debug!("End of input, leaving command loop");
            writeln!(output)?;
            break;
        }

        let command = line.trim();
        if command.eq_ignore_ascii_case(QUIT) {
            break;
        }
        if command.is_empty() {
            continue;
        }

        match run_command(pipeline, renderer, command) {
            Ok(()) => stats.rendered += 1,
            Err(e) => {
                stats.failed += 1;
                writeln!(output, "{}", user_message(&e))?;
            }
        }
    }

    Ok(stats)
}

/// Run a single command and hand the chart to the renderer.
pub fn run_command(pipeline: &Pipeline<'_>, renderer: &dyn Renderer, command: &str) -> PKResult<()> {
    let outcome = pipeline.run(command)?;
    renderer.render(&outcome.chart)
}

/// What to tell the user about a failed command.
pub fn user_message(error: &PKError) -> String {
    if error.is_user_facing() {
        warn!("Command rejected: {}", error);
        format!("{}. Please try again.", error)
    } else {
        error!("Command failed: {}", error);
        "Could not process that command. Please try again.".to_string()
    }
}
