use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "minutary")]
#[command(about = "Automated meeting minutes", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Record a meeting from the microphone and generate notes
    Record(RecordCliArgs),
    /// Generate notes from an existing audio file
    Process(ProcessCliArgs),
    /// Inspect or edit the configuration
    Config(ConfigCliArgs),
    /// Print version information
    Version,
}

#[derive(ClapArgs, Debug)]
pub struct RecordCliArgs {
    /// Recording length in seconds (omit to record until Ctrl+C)
    #[arg(short, long)]
    pub duration: Option<u64>,

    #[command(flatten)]
    pub meeting: MeetingCliArgs,
}

#[derive(ClapArgs, Debug)]
pub struct ProcessCliArgs {
    /// Path to the audio file to transcribe
    pub file: PathBuf,

    #[command(flatten)]
    pub meeting: MeetingCliArgs,
}

#[derive(ClapArgs, Debug, Default, Clone)]
pub struct MeetingCliArgs {
    /// Meeting title used in the generated notes
    #[arg(short, long)]
    pub title: Option<String>,
    /// Email recipients for the notes (comma separated)
    #[arg(short, long, value_delimiter = ',')]
    pub email: Vec<String>,
    /// Spoken language sent to the transcription service (e.g. en, pl)
    #[arg(short, long)]
    pub language: Option<String>,
    /// Directory for the generated JSON/HTML notes
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
pub struct ConfigCliArgs {
    #[command(subcommand)]
    pub command: Option<ConfigCommand>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the current configuration
    Show,
    /// Run the interactive configuration wizard
    Setup,
}
