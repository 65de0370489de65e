pub mod args;
pub mod types;

pub use args::{Cli, Commands, FilterArgs};
pub use types::OutputFormat;
