use anyhow::{Context as _, Result};
use clap::Parser;
use depscan::app::dto::OrphansResponse;
use depscan::app::engine::AnalysisEngine;
use depscan::cli::{self, Cli, Command, OutputFormat, ReportArgs};
use depscan::logger::init_logger;
use depscan::server::{http, mcp::DepscanMcpServer};
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logger(cli.verbose, cli.quiet);

    match cli.command {
        Command::Analyze(args) => report(args, |engine, args| {
            let options = args.target.options()?;
            let result = engine.analyze(&args.target.root, Some(&options))?;
            let has_cycles = !result.cycles.is_empty();
            let text = match args.target.format {
                OutputFormat::Text => cli::render_report(&result),
                OutputFormat::Json => cli::to_json(&result)?,
            };
            Ok((text, has_cycles))
        }),
        Command::Cycles(args) => report(args, |engine, args| {
            let options = args.target.options()?;
            let result = engine.cycles(&args.target.root, Some(&options))?;
            let has_cycles = result.cycle_count > 0;
            let text = match args.target.format {
                OutputFormat::Text => cli::render_cycles(&result),
                OutputFormat::Json => cli::to_json(&result)?,
            };
            Ok((text, has_cycles))
        }),
        Command::Orphans(args) => report(args, |engine, args| {
            let options = args.target.options()?;
            let result = engine.analyze(&args.target.root, Some(&options))?;
            let orphans = OrphansResponse::from(&result);
            let text = match args.target.format {
                OutputFormat::Text => cli::render_orphans(&orphans),
                OutputFormat::Json => cli::to_json(&orphans)?,
            };
            Ok((text, !result.cycles.is_empty()))
        }),
        Command::File { target, file } => {
            let options = target.options()?;
            let deps = AnalysisEngine::filesystem().file(&target.root, &file, Some(&options))?;
            match target.format {
                OutputFormat::Text => print!("{}", cli::render_file(&deps)),
                OutputFormat::Json => println!("{}", cli::to_json(&deps)?),
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Serve { target, addr } => {
            let engine = AnalysisEngine::filesystem().with_defaults(target.options()?);
            runtime()?.block_on(http::serve(engine, target.root, addr))?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Mcp { target } => {
            let engine = AnalysisEngine::filesystem().with_defaults(target.options()?);
            runtime()?.block_on(DepscanMcpServer::new(engine, target.root).serve_stdio())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Print a report and map `--fail-on-cycles` to the exit status.
fn report<F>(args: ReportArgs, run: F) -> Result<ExitCode>
where
    F: FnOnce(&AnalysisEngine, &ReportArgs) -> Result<(String, bool)>,
{
    let engine = AnalysisEngine::filesystem();
    let (text, has_cycles) = run(&engine, &args)?;
    match args.target.format {
        OutputFormat::Text => print!("{text}"),
        OutputFormat::Json => println!("{text}"),
    }
    if args.fail_on_cycles && has_cycles {
        tracing::error!("circular imports found");
        return Ok(ExitCode::from(1));
    }
    Ok(ExitCode::SUCCESS)
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start tokio runtime")
}
