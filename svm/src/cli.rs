use clap::Parser;
use std::path::PathBuf;
use svm::constants::{DEFAULT_IMAGE, DEFAULT_SAVE_DIR};

#[derive(Parser, Debug)]
#[command(
    name = "svm",
    about = "Synacor Virtual Machine - run Synacor challenge binaries",
    long_about = "The Synacor Virtual Machine executes binary images for the Synacor challenge architecture.\n\
                  Send SIGUSR1 to save a snapshot while running; SIGINT or SIGTERM saves one and exits.",
    version
)]
pub struct Cli {
    /// Binary image to execute
    #[arg(default_value = DEFAULT_IMAGE)]
    pub image: PathBuf,

    /// Resume from a snapshot instead of loading an image
    #[arg(short = 'r', long)]
    pub restore: Option<PathBuf>,

    /// Directory snapshots are written to
    #[arg(long, default_value = DEFAULT_SAVE_DIR)]
    pub save_dir: PathBuf,

    /// Pre-populate input buffer with text
    #[arg(short = 'i', long)]
    pub input: Option<String>,

    /// Print every executed instruction with the registers
    #[arg(short = 't', long)]
    pub trace: bool,

    /// Debug logging and a machine summary at exit
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl Cli {
    /// Input text with `\n`, `\r` and `\t` escapes replaced
    pub fn processed_input(&self) -> Option<String> {
        self.input.as_ref().map(|input| {
            input
                .replace("\\n", "\n")
                .replace("\\r", "\r")
                .replace("\\t", "\t")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["svm"]);
        assert_eq!(cli.image, PathBuf::from(DEFAULT_IMAGE));
        assert_eq!(cli.save_dir, PathBuf::from(DEFAULT_SAVE_DIR));
        assert!(cli.restore.is_none());
    }

    #[test]
    fn test_input_escapes() {
        let cli = Cli::parse_from(["svm", "game.bin", "-i", "take tablet\\nuse tablet\\n"]);
        assert_eq!(cli.processed_input().as_deref(), Some("take tablet\nuse tablet\n"));
    }
}
