use super::dispatch::run_text;
use anyhow::Result;
use opsassist::Config;
use opsassist::pipeline::Pipeline;
use opsassist::ui::style;
use std::future::Future;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

const PROMPT: &str = "Enter task > ";

#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Empty,
    Exit,
    Task(&'a str),
}

fn classify(line: &str) -> Input<'_> {
    let line = line.trim();
    if line.is_empty() {
        Input::Empty
    } else if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
        Input::Exit
    } else {
        Input::Task(line)
    }
}

/// Why the prompt loop stopped.
#[derive(Debug, PartialEq, Eq)]
enum SessionEnd {
    Exit,
    EndOfInput,
    Interrupted,
}

/// Prompt for tasks until `exit`, `quit`, end of input or Ctrl-C. A failed
/// task is reported and the loop continues.
pub async fn run(config: &Config) -> Result<()> {
    let pipeline = Pipeline::from_config(config)?;

    println!("{}", style::header("opsassist (interactive mode)"));
    println!("{}\n", style::dim("Type your task below, or 'exit' to quit."));

    let lines = BufReader::new(tokio::io::stdin()).lines();
    let pipeline = &pipeline;
    let end = prompt_loop(lines, tokio::signal::ctrl_c(), move |task| async move {
        run_text(pipeline, &task, false).await
    })
    .await?;

    match end {
        SessionEnd::Exit => println!("Exiting."),
        SessionEnd::EndOfInput => println!(),
        SessionEnd::Interrupted => println!("\nInterrupted. Exiting."),
    }
    Ok(())
}

/// One interrupt listener covers the whole session, so Ctrl-C is seen both
/// at the prompt and while a task is running. A running task is dropped.
async fn prompt_loop<R, I, T, F>(
    mut lines: Lines<R>,
    interrupt: I,
    mut run_task: T,
) -> Result<SessionEnd>
where
    R: AsyncBufRead + Unpin,
    I: Future,
    T: FnMut(String) -> F,
    F: Future<Output = Result<()>>,
{
    tokio::pin!(interrupt);

    loop {
        print!("{PROMPT}");
        std::io::stdout().flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = &mut interrupt => return Ok(SessionEnd::Interrupted),
        };
        let Some(line) = line else {
            return Ok(SessionEnd::EndOfInput);
        };

        match classify(&line) {
            Input::Empty => println!("Task cannot be empty\n"),
            Input::Exit => return Ok(SessionEnd::Exit),
            Input::Task(task) => {
                let outcome = tokio::select! {
                    outcome = run_task(task.to_string()) => outcome,
                    _ = &mut interrupt => return Ok(SessionEnd::Interrupted),
                };
                if let Err(e) = outcome {
                    tracing::warn!(error = %e, "Task failed");
                    println!("\n{} {e:#}\n", style::failure("Error:"));
                }
                println!();
            }
        }
    }
}
