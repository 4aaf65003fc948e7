use std::path::Path;

use anyhow::{Context, Result};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::delay::DelayScheduler;
use crate::phases::Phase;
use crate::runner::Runner;
use crate::session::Session;

/// Counters accumulated across a run; failures are informational only and
/// never influence control flow.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunStats {
    pub targets: usize,
    pub commands: usize,
    pub failures: usize,
    pub inter_target_pauses: usize,
}

/// Drives one or more targets through the fixed phase sequence, strictly
/// one command at a time with a randomized pause after each.
pub struct ReconEngine {
    session: Session,
    runner: Runner,
    pacing: DelayScheduler,
    target_gap: DelayScheduler,
}

impl ReconEngine {
    pub fn new(
        session: Session,
        runner: Runner,
        pacing: DelayScheduler,
        target_gap: DelayScheduler,
    ) -> Self {
        Self {
            session,
            runner,
            pacing,
            target_gap,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub async fn run_single(&self, target: &str) -> Result<RunStats> {
        let mut stats = RunStats::default();
        self.process_target(target, &mut stats).await;
        stats.targets = 1;
        Ok(stats)
    }

    /// Batch mode: every non-empty line of `path` is a target, processed in
    /// file order with a wider pause between consecutive targets. A missing
    /// list file aborts before any phase runs.
    pub async fn run_list(&self, path: &Path) -> Result<RunStats> {
        let targets = read_targets(path)?;
        println!(
            "{} processing {} domains from {}",
            "[*]".truecolor(0, 212, 255),
            targets.len(),
            path.display()
        );

        let pb = ProgressBar::new(targets.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.green/black} {pos}/{len} targets ({eta})")?
                .progress_chars("█▉▊▋▌▍▎▏ "),
        );

        let mut stats = RunStats::default();
        for (index, target) in targets.iter().enumerate() {
            println!(
                "{} domain {}/{}: {}",
                "[*]".truecolor(0, 212, 255),
                index + 1,
                targets.len(),
                target.white().bold()
            );
            self.process_target(target, &mut stats).await;
            stats.targets += 1;
            pb.inc(1);

            if index + 1 < targets.len() {
                println!("{} pausing before next target", "[*]".truecolor(128, 128, 128));
                self.target_gap.pause().await;
                stats.inter_target_pauses += 1;
            }
        }
        pb.finish_and_clear();

        Ok(stats)
    }

    /// Runs all five phases against one target. Phase failures are printed
    /// and counted but never stop the sequence.
    async fn process_target(&self, target: &str, stats: &mut RunStats) {
        println!("\n{}", "=".repeat(60).truecolor(64, 64, 64));
        println!(
            "{} reconnaissance of {}",
            "[*]".truecolor(0, 255, 65),
            target.white().bold()
        );
        println!("{}", "=".repeat(60).truecolor(64, 64, 64));

        for phase in Phase::SEQUENCE {
            info!(target, phase = phase.name(), "starting phase");
            println!(
                "\n{} {} against {}",
                "[*]".truecolor(0, 212, 255),
                phase.name(),
                target
            );

            for spec in phase.commands(target, &self.session) {
                println!(
                    "{} executing: {}",
                    "[*]".truecolor(128, 128, 128),
                    spec.command_line()
                );
                stats.commands += 1;

                match self.runner.run(&self.session, &spec).await {
                    Ok(()) => {
                        println!("{} {} completed", "[+]".truecolor(0, 255, 65), phase.name());
                        if let Some(out) = &spec.stdout_to {
                            println!(
                                "{} output saved to {}",
                                "[+]".truecolor(0, 255, 65),
                                out.display()
                            );
                        }
                    }
                    Err(err) => {
                        stats.failures += 1;
                        warn!(target, phase = phase.name(), error = %err, "phase command failed");
                        println!("{} {} failed: {}", "[!]".truecolor(255, 140, 0), phase.name(), err);
                    }
                }

                self.pacing.pause().await;
            }
        }

        println!(
            "\n{} reconnaissance complete for {}",
            "[+]".truecolor(0, 255, 65),
            target
        );
    }
}

/// Non-empty trimmed lines of the list file, in file order.
pub fn read_targets(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read target list {}", path.display()))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}
