use crate::error::Result;
use crate::pip::{CommandOutput, CommandRunner, PipCommand, PIP_PACKAGE};

/// PipExecutionAgent executes pip subcommands through a runner
pub struct PipExecutionAgent<'a> {
    command: &'a PipCommand,
    runner: &'a dyn CommandRunner,
}

impl<'a> PipExecutionAgent<'a> {
    pub fn new(command: &'a PipCommand, runner: &'a dyn CommandRunner) -> Self {
        Self { command, runner }
    }

    pub fn command(&self) -> &PipCommand {
        self.command
    }

    /// `pip freeze`
    pub fn freeze(&self) -> Result<CommandOutput> {
        self.execute(&["freeze"], false)
    }

    /// `pip list --outdated --format=json`
    pub fn list_outdated(&self) -> Result<CommandOutput> {
        self.execute(&["list", "--outdated", "--format=json"], false)
    }

    /// `pip install --upgrade pip`
    pub fn upgrade_pip(&self) -> Result<CommandOutput> {
        self.upgrade(&[PIP_PACKAGE], false)
    }

    /// `pip install --upgrade <names...>`
    pub fn upgrade<S: AsRef<str>>(&self, names: &[S], stream_stdout: bool) -> Result<CommandOutput> {
        let mut args: Vec<&str> = vec!["install", "--upgrade"];
        args.extend(names.iter().map(|name| name.as_ref()));
        self.execute(&args, stream_stdout)
    }

    fn execute(&self, args: &[&str], stream_stdout: bool) -> Result<CommandOutput> {
        log::debug!("Running {}", self.command.display_with(args));
        self.runner
            .run(self.command.program(), &self.command.args(args), stream_stdout)
    }
}
