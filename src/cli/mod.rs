pub mod args;
pub mod meeting;
pub mod wizard;

pub use args::{Cli, CliCommand};
pub use meeting::{handle_process_command, handle_record_command};
pub use wizard::{handle_config_command, run_interactive};
