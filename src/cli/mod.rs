pub mod args;
pub mod meetings;

pub use args::{Cli, CliCommand, MeetingsCliArgs};
pub use meetings::handle_meetings_command;
