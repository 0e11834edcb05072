pub mod package_lister;
pub mod package_upgrader;
pub mod pip_execution;

pub use package_lister::{ListingSource, PackageListerAgent};
pub use package_upgrader::{PackageUpgraderAgent, StepOutcome, UpgradeReport};
pub use pip_execution::PipExecutionAgent;
