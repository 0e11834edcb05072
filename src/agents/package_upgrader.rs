use crate::agents::PipExecutionAgent;
use crate::error::Result;
use crate::package::Package;
use crate::pip::CommandOutput;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

/// Result of a single recoverable pip call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// pip exited 0; `warnings` holds whatever it still wrote to stderr,
    /// such as dependency resolver conflicts
    Succeeded { warnings: String },
    Failed { reason: String },
}

impl StepOutcome {
    fn from_output(output: Result<CommandOutput>) -> Self {
        match output {
            Ok(output) if output.success() => StepOutcome::Succeeded {
                warnings: output.stderr.trim_end().to_string(),
            },
            Ok(output) => {
                let stderr = output.stderr.trim();
                let reason = if stderr.is_empty() {
                    format!("pip exited with code {}", output.code_label())
                } else {
                    stderr.to_string()
                };
                StepOutcome::Failed { reason }
            }
            Err(e) => StepOutcome::Failed {
                reason: e.to_string(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, StepOutcome::Succeeded { .. })
    }

    /// Non-empty stderr of a successful call
    pub fn warnings(&self) -> Option<&str> {
        match self {
            StepOutcome::Succeeded { warnings } if !warnings.trim().is_empty() => Some(warnings),
            _ => None,
        }
    }
}

/// Per-package results of a one-by-one upgrade
#[derive(Debug, Clone, Default)]
pub struct UpgradeReport {
    pub successful: Vec<String>,
    /// Package name and the error pip reported
    pub failed: Vec<(String, String)>,
}

impl UpgradeReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, name: &str, outcome: StepOutcome) {
        match outcome {
            StepOutcome::Succeeded { .. } => self.successful.push(name.to_string()),
            StepOutcome::Failed { reason } => self.failed.push((name.to_string(), reason)),
        }
    }

    pub fn total(&self) -> usize {
        self.successful.len() + self.failed.len()
    }

    pub fn failed_names(&self) -> Vec<&str> {
        self.failed.iter().map(|(name, _)| name.as_str()).collect()
    }
}

/// PackageUpgraderAgent performs the upgrade calls. None of its failures abort the run.
pub struct PackageUpgraderAgent<'a> {
    pip: &'a PipExecutionAgent<'a>,
    show_progress: bool,
}

impl<'a> PackageUpgraderAgent<'a> {
    pub fn new(pip: &'a PipExecutionAgent<'a>) -> Self {
        Self {
            pip,
            show_progress: true,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Upgrade pip itself
    pub fn self_update(&self) -> StepOutcome {
        let outcome = StepOutcome::from_output(self.pip.upgrade_pip());
        if let StepOutcome::Failed { reason } = &outcome {
            log::warn!("pip self-update failed: {}", reason);
        }
        outcome
    }

    /// Upgrade everything in a single pip call, streaming pip's output
    pub fn upgrade_batch(&self, packages: &[Package]) -> StepOutcome {
        let names: Vec<&str> = packages.iter().map(|p| p.name.as_str()).collect();
        let outcome = StepOutcome::from_output(self.pip.upgrade(&names, true));
        if let StepOutcome::Failed { reason } = &outcome {
            log::warn!("Batch upgrade failed: {}", reason);
        }
        outcome
    }

    /// Upgrade packages one pip call at a time, continuing past failures
    pub fn upgrade_sequential(&self, packages: &[Package]) -> UpgradeReport {
        let mut report = UpgradeReport::new();

        let pb = if self.show_progress {
            ProgressBar::new(packages.len() as u64)
        } else {
            ProgressBar::hidden()
        };
        if let Ok(style) = ProgressStyle::default_bar().template("  [{bar:40}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("=>-"));
        }

        for package in packages {
            let name = package.name.as_str();
            pb.set_message(format!("Upgrading {}", name));

            let outcome = StepOutcome::from_output(self.pip.upgrade(&[name], false));
            if outcome.is_success() {
                pb.suspend(|| {
                    println!("   {} {}", "✓".green(), name);
                    if let Some(warnings) = outcome.warnings() {
                        for line in warnings.lines() {
                            println!("     {}", line.dimmed());
                        }
                    }
                });
            } else {
                log::warn!("Upgrade of {} failed", name);
                pb.suspend(|| println!("   {} {}", "✗".red(), name.red()));
            }
            report.record(name, outcome);
            pb.inc(1);
        }

        pb.finish_and_clear();
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UpdaterError;
    use crate::pip::runner::testing::{fail, ok, ScriptedRunner};
    use crate::pip::command::{PipCommand, PlatformFamily};

    fn packages(names: &[&str]) -> Vec<Package> {
        names.iter().map(|name| Package::new(*name)).collect()
    }

    #[test]
    fn sequential_continues_past_failures() {
        let command = PipCommand::for_platform(PlatformFamily::Posix, None);
        let runner = ScriptedRunner::new(|args| {
            if args.last().map(String::as_str) == Some("broken") {
                fail(1, "ERROR: No matching distribution found for broken")
            } else {
                ok("")
            }
        });
        let pip = PipExecutionAgent::new(&command, &runner);
        let upgrader = PackageUpgraderAgent::new(&pip).with_progress(false);

        let report = upgrader.upgrade_sequential(&packages(&["first", "broken", "third"]));

        assert_eq!(report.successful, vec!["first", "third"]);
        assert_eq!(report.failed_names(), vec!["broken"]);
        assert_eq!(
            report.failed[0].1,
            "ERROR: No matching distribution found for broken"
        );
        assert_eq!(report.total(), 3);
        assert_eq!(runner.calls_with("install").len(), 3);
    }

    #[test]
    fn batch_uses_one_call() {
        let command = PipCommand::for_platform(PlatformFamily::Posix, None);
        let runner = ScriptedRunner::new(|_| ok(""));
        let pip = PipExecutionAgent::new(&command, &runner);

        let outcome = PackageUpgraderAgent::new(&pip).upgrade_batch(&packages(&["a", "b", "c"]));

        assert!(outcome.is_success());
        assert_eq!(
            runner.calls(),
            vec![vec![
                "python3", "-m", "pip", "install", "--upgrade", "a", "b", "c"
            ]]
        );
    }

    #[test]
    fn success_keeps_resolver_warnings() {
        let command = PipCommand::for_platform(PlatformFamily::Posix, None);
        let runner = ScriptedRunner::new(|_| {
            Ok(CommandOutput {
                code: Some(0),
                stdout: String::new(),
                stderr: "ERROR: pip's dependency resolver does not currently take into account all the packages that are installed.\na 2.0 requires b<1, but you have b 1.2.\n".to_string(),
            })
        });
        let pip = PipExecutionAgent::new(&command, &runner);

        let outcome = PackageUpgraderAgent::new(&pip).upgrade_batch(&packages(&["a"]));
        assert!(outcome.is_success());
        assert!(outcome.warnings().unwrap().contains("a 2.0 requires b<1"));

        let quiet = StepOutcome::Succeeded {
            warnings: "  \n".to_string(),
        };
        assert_eq!(quiet.warnings(), None);
    }

    #[test]
    fn batch_failure_keeps_stderr() {
        let command = PipCommand::for_platform(PlatformFamily::Posix, None);
        let runner = ScriptedRunner::new(|_| fail(1, "conflict\n"));
        let pip = PipExecutionAgent::new(&command, &runner);

        let outcome = PackageUpgraderAgent::new(&pip).upgrade_batch(&packages(&["a"]));
        assert_eq!(
            outcome,
            StepOutcome::Failed {
                reason: "conflict".to_string()
            }
        );
    }

    #[test]
    fn failure_without_stderr_reports_exit_code() {
        let command = PipCommand::for_platform(PlatformFamily::Posix, None);
        let runner = ScriptedRunner::new(|_| fail(2, ""));
        let pip = PipExecutionAgent::new(&command, &runner);

        let outcome = PackageUpgraderAgent::new(&pip).self_update();
        assert_eq!(
            outcome,
            StepOutcome::Failed {
                reason: "pip exited with code 2".to_string()
            }
        );
    }

    #[test]
    fn spawn_error_becomes_failure() {
        let command = PipCommand::for_platform(PlatformFamily::Posix, None);
        let runner = ScriptedRunner::new(|_| {
            Err(UpdaterError::Spawn {
                program: "python3".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
            })
        });
        let pip = PipExecutionAgent::new(&command, &runner);

        let outcome = PackageUpgraderAgent::new(&pip).self_update();
        assert!(!outcome.is_success());
    }
}
