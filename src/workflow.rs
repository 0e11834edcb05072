use crate::agents::{
    ListingSource, PackageListerAgent, PackageUpgraderAgent, PipExecutionAgent, StepOutcome,
    UpgradeReport,
};
use crate::config::Settings;
use crate::error::Result;
use crate::package::Package;
use crate::pip::CommandRunner;
use colored::Colorize;

/// How a run ended when nothing fatal happened
#[derive(Debug)]
pub enum RunOutcome {
    NothingToUpdate,
    DryRun(Vec<Package>),
    Batch(StepOutcome),
    Sequential(UpgradeReport),
}

impl RunOutcome {
    /// One-line description for the log
    pub fn summary(&self) -> String {
        match self {
            RunOutcome::NothingToUpdate => "nothing to update".to_string(),
            RunOutcome::DryRun(packages) => {
                format!("dry run, {} package(s) selected", packages.len())
            }
            RunOutcome::Batch(outcome) if outcome.is_success() => {
                "batch upgrade succeeded".to_string()
            }
            RunOutcome::Batch(_) => "batch upgrade failed".to_string(),
            RunOutcome::Sequential(report) => format!(
                "{} of {} package(s) upgraded, {} failed",
                report.successful.len(),
                report.total(),
                report.failed.len()
            ),
        }
    }
}

/// Execute the upgrade workflow
///
/// Only the listing step can fail the run. Self-update and upgrade failures
/// are printed and the run still completes.
pub fn execute_update(settings: &Settings, runner: &dyn CommandRunner) -> Result<RunOutcome> {
    println!("{}", "Upgrading installed Python packages...".cyan().bold());

    // Step 1: Resolve the pip invocation
    println!("\n{}", "1. Resolving pip command...".yellow());
    let pip = PipExecutionAgent::new(&settings.command, runner);
    println!("   Using {}", settings.command.to_string().bright_cyan());
    let upgrader = PackageUpgraderAgent::new(&pip).with_progress(settings.show_progress);

    // Step 2: Self-update
    if settings.skip_pip_update || settings.dry_run {
        println!("\n{}", "2. Skipping pip self-update".yellow());
    } else if settings.command_overridden {
        println!(
            "\n{}",
            "2. Skipping pip self-update (custom pip command configured)".yellow()
        );
    } else {
        println!("\n{}", "2. Updating pip...".yellow());
        match upgrader.self_update() {
            StepOutcome::Succeeded { warnings } => {
                println!("{}", "✓ pip is up to date".green());
                print_indented(&warnings);
            }
            StepOutcome::Failed { reason } => {
                println!("{}", "⚠ Could not update pip, continuing".red());
                print_indented(&reason);
            }
        }
    }

    // Step 3: List installed packages
    let source = if settings.outdated {
        println!("\n{}", "3. Listing outdated packages...".yellow());
        ListingSource::Outdated
    } else {
        println!("\n{}", "3. Listing installed packages...".yellow());
        ListingSource::Freeze
    };
    let discovered = PackageListerAgent::new(&pip).list(source, &settings.filter)?;
    println!(
        "{}",
        format!("✓ Found {} package(s)", discovered.len()).green()
    );

    // Step 4: Apply --only
    println!("\n{}", "4. Selecting packages...".yellow());
    let selected = settings.filter.apply(discovered);
    if selected.is_empty() {
        println!("\n{}", "No packages to update".yellow());
        return Ok(RunOutcome::NothingToUpdate);
    }
    print_packages(&selected);

    if settings.dry_run {
        println!(
            "\n{}",
            format!("Dry run: {} package(s) would be upgraded", selected.len()).cyan()
        );
        return Ok(RunOutcome::DryRun(selected));
    }

    // Step 5: Upgrade
    if settings.one_by_one {
        println!(
            "\n{}",
            format!("5. Upgrading {} package(s) one by one...", selected.len()).yellow()
        );
        let report = upgrader.upgrade_sequential(&selected);
        print_upgrade_report(&report);
        Ok(RunOutcome::Sequential(report))
    } else {
        println!(
            "\n{}",
            format!("5. Upgrading {} package(s)...", selected.len()).yellow()
        );
        let outcome = upgrader.upgrade_batch(&selected);
        match &outcome {
            StepOutcome::Succeeded { warnings } => {
                println!(
                    "\n{}",
                    "✨ All packages upgraded successfully!".green().bold()
                );
                if !warnings.trim().is_empty() {
                    println!("{}", "⚠ pip reported warnings:".yellow());
                    print_indented(warnings);
                }
            }
            StepOutcome::Failed { reason } => {
                println!("\n{}", "✗ Upgrade failed".red().bold());
                print_indented(reason);
                println!(
                    "\n{}",
                    "Retry with --one-by-one to see which package is failing.".dimmed()
                );
            }
        }
        Ok(RunOutcome::Batch(outcome))
    }
}

fn print_packages(packages: &[Package]) {
    println!("   {} package(s) selected:", packages.len());
    for package in packages {
        match (&package.version, &package.latest) {
            (Some(old), Some(new)) => println!(
                "   • {} {} → {}",
                package.name.as_str().white().bold(),
                old.red(),
                new.green()
            ),
            (Some(version), None) => {
                println!("   • {} {}", package.name.as_str().white().bold(), version.dimmed())
            }
            _ => println!("   • {}", package.name.as_str().white().bold()),
        }
    }
}

fn print_upgrade_report(report: &UpgradeReport) {
    println!("\n{}", "Upgrade Summary:".cyan().bold());
    println!("  {} package(s) processed", report.total());
    println!("  {} succeeded", report.successful.len().to_string().green());
    println!("  {} failed", report.failed.len().to_string().red());

    if !report.failed.is_empty() {
        log::warn!("Failed packages: {}", report.failed_names().join(", "));
        println!("\n{}:", "Failed packages".red());
        for (name, reason) in &report.failed {
            let last_line = reason.lines().last().unwrap_or_default();
            println!("  • {} {}", name.white().bold(), last_line.dimmed());
        }
    }
}

fn print_indented(text: &str) {
    for line in text.lines() {
        println!("   {}", line.dimmed());
    }
}
