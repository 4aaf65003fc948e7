use anyhow::{bail, Result};
use clap::Parser;
use colored::*;
use tracing_subscriber::EnvFilter;

use stealthrecon::cli::Cli;
use stealthrecon::delay::DelayScheduler;
use stealthrecon::engine::ReconEngine;
use stealthrecon::runner::Runner;
use stealthrecon::session::Session;
use stealthrecon::{report, tools};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "stealthrecon=debug"
    } else {
        "stealthrecon=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .init();

    if cli.delay_min > cli.delay_max {
        bail!(
            "--delay-min ({}) must not exceed --delay-max ({})",
            cli.delay_min,
            cli.delay_max
        );
    }

    tools::preflight()?;

    println!(
        "{} starting stealth reconnaissance",
        "[*]".truecolor(0, 255, 65)
    );
    println!(
        "{} delay between commands: {}s to {}s, per-command timeout {}s",
        "[*]".truecolor(0, 212, 255),
        cli.delay_min,
        cli.delay_max,
        cli.timeout
    );

    let label = cli.domain.as_deref().unwrap_or("batch_scan");
    let session = Session::create(&cli.output_dir, label)?;
    println!(
        "{} output directory created: {}",
        "[+]".truecolor(0, 255, 65),
        session.root().display()
    );

    let engine = ReconEngine::new(
        session,
        Runner::new(cli.timeout),
        DelayScheduler::new(cli.delay_min, cli.delay_max),
        DelayScheduler::between_targets(),
    );

    let stats = match (&cli.domain, &cli.file) {
        (Some(domain), None) => engine.run_single(domain).await?,
        (None, Some(path)) => engine.run_list(path).await?,
        _ => unreachable!("clap enforces exactly one of --domain / --file"),
    };

    let report_path = report::generate(engine.session())?;

    println!(
        "\n{} {}",
        "[+]".truecolor(0, 255, 65).bold(),
        "RECONNAISSANCE COMPLETE".truecolor(0, 255, 65).bold()
    );
    println!(
        "{} {} targets, {} commands issued, {} failures absorbed",
        "[+]".truecolor(0, 212, 255),
        stats.targets,
        stats.commands,
        stats.failures
    );
    println!(
        "{} all results are in {}",
        "[+]".truecolor(0, 255, 65),
        engine.session().root().display()
    );
    println!(
        "{} see {} for recommended next steps",
        "[+]".truecolor(0, 255, 65),
        report_path.display()
    );

    Ok(())
}
