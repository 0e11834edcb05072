pub mod command;
pub mod runner;

pub use command::PipCommand;
pub use runner::{CommandOutput, CommandRunner, SystemRunner};

/// Package name pip uses for its own distribution
pub const PIP_PACKAGE: &str = "pip";
