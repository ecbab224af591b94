use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "recap")]
#[command(about = "Meeting audio summarization service", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Override the configured HTTP port
    #[arg(long)]
    pub port: Option<u16>,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Print version information
    Version,
    /// List processed meetings from the local store
    Meetings(MeetingsCliArgs),
}

#[derive(ClapArgs, Debug)]
pub struct MeetingsCliArgs {
    /// Maximum number of meetings to show
    #[arg(short, long, default_value_t = 20)]
    pub limit: usize,

    /// Show the full record (transcript, summary, decisions, action items)
    #[arg(long)]
    pub id: Option<String>,
}
