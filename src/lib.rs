pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod ops;
pub mod pipeline;
pub mod ui;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use error::{MaintenanceError, Result};
pub use ui::{ConsoleUi, Phase, SilentUi, Ui};
