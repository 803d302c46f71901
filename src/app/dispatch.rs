use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::cli::render;
use anyhow::{Result, bail};
use opsassist::Config;
use opsassist::pipeline::Pipeline;
use opsassist::ui::style;

/// Text-mode run of one task, printing each phase as it completes.
pub(crate) async fn run_text(pipeline: &Pipeline, task: &str, verbose: bool) -> Result<()> {
    println!("{} {task}", style::header("Task:"));
    println!("{}", render::rule());

    println!("\n{}", style::accent("1. Planning..."));
    let plan = pipeline.plan(task).await;
    if verbose {
        println!("{}", render::render_plan(&plan));
    }

    println!("\n{}", style::accent("2. Executing..."));
    let results = pipeline.execute(&plan).await;
    print!("{}", render::render_step_outcomes(&results));

    println!("\n{}", style::accent("3. Verifying and formatting..."));
    let report = pipeline.verify(task, &results).await?;

    println!("\n{}", render::render_report(&report));
    println!("{}", style::success("Task execution completed!"));
    Ok(())
}

async fn run_json(pipeline: &Pipeline, task: &str) -> Result<()> {
    let run = pipeline.run(task, None).await?;
    println!(
        "{}",
        serde_json::to_string_pretty(&render::json_output(&run))?
    );
    Ok(())
}

async fn execute_task(
    config: &Config,
    task: &str,
    verbose: bool,
    output: OutputFormat,
) -> Result<()> {
    let task = task.trim();
    if task.is_empty() {
        bail!("Task cannot be empty");
    }
    let pipeline = Pipeline::from_config(config)?;
    match output {
        OutputFormat::Text => run_text(&pipeline, task, verbose).await,
        OutputFormat::Json => run_json(&pipeline, task).await,
    }
}

async fn run_task(config: &Config, task: &str, verbose: bool, output: OutputFormat) -> Result<()> {
    let outcome = execute_task(config, task, verbose, output).await;

    if let (Err(e), OutputFormat::Json) = (&outcome, output) {
        println!(
            "{}",
            serde_json::to_string_pretty(&render::json_error(task, e))?
        );
    }
    outcome
}

pub async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Run {
            task,
            verbose,
            output,
        } => run_task(&config, &task, verbose, output).await,
        Commands::Interactive => super::interactive::run(&config).await,
        Commands::Serve { port, host } => {
            let host = host.unwrap_or_else(|| config.gateway.host.clone());
            let port = port.unwrap_or(config.gateway.port);
            opsassist::gateway::run_gateway(&host, port, config).await
        }
    }
}
