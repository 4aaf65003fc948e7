use clap::Parser;
use std::io::Write;
use tempfile::tempdir;

use stealthrecon::cli::Cli;
use stealthrecon::delay::DelayScheduler;
use stealthrecon::engine::ReconEngine;
use stealthrecon::report;
use stealthrecon::runner::Runner;
use stealthrecon::session::{Session, CATEGORIES};

// A reserved TLD so no phase ever reaches a live host, even when the
// wrapped scanners happen to be installed.
const TARGET: &str = "host.invalid";

fn no_delay_engine(session: Session) -> ReconEngine {
    ReconEngine::new(
        session,
        Runner::new(5),
        DelayScheduler::new(0, 0),
        DelayScheduler::new(0, 0),
    )
}

#[test]
fn test_cli_requires_exactly_one_target() {
    assert!(Cli::try_parse_from(["stealthrecon"]).is_err());
    assert!(Cli::try_parse_from(["stealthrecon", "-d", "a.com", "-f", "list.txt"]).is_err());
    assert!(Cli::try_parse_from(["stealthrecon", "-d", "a.com"]).is_ok());
    assert!(Cli::try_parse_from(["stealthrecon", "-f", "list.txt"]).is_ok());
}

#[test]
fn test_cli_defaults() {
    let cli = Cli::try_parse_from(["stealthrecon", "-d", "a.com"]).unwrap();
    assert_eq!(cli.delay_min, 2);
    assert_eq!(cli.delay_max, 8);
    assert_eq!(cli.timeout, 600);
}

#[tokio::test]
async fn test_single_target_run_produces_full_layout() {
    let base = tempdir().unwrap();
    let session = Session::create(base.path(), TARGET).unwrap();
    let engine = no_delay_engine(session);

    let stats = engine.run_single(TARGET).await.unwrap();
    let report_path = report::generate(engine.session()).unwrap();

    // five category subdirectories, a command log and a summary report,
    // regardless of how many phases actually succeeded
    for category in CATEGORIES {
        assert!(engine.session().category_dir(category).is_dir());
    }
    assert!(engine.session().category_dir("logs").join("commands.log").is_file());
    assert!(report_path.is_file());

    assert_eq!(stats.targets, 1);
    // five phases, with the ad-hoc probe issuing two commands
    assert_eq!(stats.commands, 6);
    assert_eq!(stats.inter_target_pauses, 0);
}

#[tokio::test]
async fn test_failures_do_not_stop_the_sequence() {
    let base = tempdir().unwrap();
    let session = Session::create(base.path(), TARGET).unwrap();
    let engine = no_delay_engine(session);

    let stats = engine.run_single(TARGET).await.unwrap();

    // every invocation was logged even though phases failed or found nothing
    let log =
        std::fs::read_to_string(engine.session().category_dir("logs").join("commands.log")).unwrap();
    let entries = log.lines().filter(|l| l.starts_with('[')).count();
    assert_eq!(entries, stats.commands);
}

#[tokio::test]
async fn test_list_mode_processes_every_line() {
    let base = tempdir().unwrap();
    let list_path = base.path().join("targets.txt");
    let mut file = std::fs::File::create(&list_path).unwrap();
    writeln!(file, "a.invalid\n\nb.invalid\nc.invalid\n").unwrap();

    let session = Session::create(base.path(), "batch_scan").unwrap();
    let engine = no_delay_engine(session);

    let stats = engine.run_list(&list_path).await.unwrap();
    assert_eq!(stats.targets, 3);
    assert_eq!(stats.commands, 18);
    assert_eq!(stats.inter_target_pauses, 2);
}

#[tokio::test]
async fn test_list_mode_missing_file_aborts() {
    let base = tempdir().unwrap();
    let session = Session::create(base.path(), "batch_scan").unwrap();
    let engine = no_delay_engine(session);

    let result = engine.run_list(&base.path().join("no-such-list.txt")).await;
    assert!(result.is_err());

    // aborted before any phase: nothing was invoked, no report exists
    assert!(!engine.session().category_dir("logs").join("commands.log").exists());
    assert!(!engine.session().report_path().exists());
}

#[tokio::test]
async fn test_report_reflects_disk_state_after_run() {
    let base = tempdir().unwrap();
    let session = Session::create(base.path(), TARGET).unwrap();
    let engine = no_delay_engine(session);

    engine.run_single(TARGET).await.unwrap();
    let text = std::fs::read_to_string(report::generate(engine.session()).unwrap()).unwrap();

    // the command log always exists by the time the report is generated
    assert!(text.contains("LOGS:"));
    assert!(text.contains("commands.log"));
    assert!(text.contains("RECOMMENDED NEXT STEPS:"));

    // every listed file must exist on disk
    for line in text.lines().filter(|l| l.starts_with("  - ")) {
        let name = line.trim_start_matches("  - ");
        let found = CATEGORIES
            .iter()
            .any(|cat| engine.session().category_dir(cat).join(name).is_file());
        assert!(found, "report lists phantom file {name}");
    }
}
