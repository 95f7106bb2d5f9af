//! CLI definitions for levelq.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// levelq CLI.
#[derive(Parser)]
#[command(name = "levelq")]
#[command(about = "Durable FIFO queue over an embedded ordered key-value store")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "levelq.toml", global = true)]
    pub config: PathBuf,

    /// Queue data directory (overrides queue.data_dir)
    #[arg(short, long, global = true, env = "LEVELQ_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub(crate) enum Commands {
    /// Append values to the back of the queue
    Push {
        /// Values to enqueue, in order
        #[arg(required = true)]
        values: Vec<String>,
    },

    /// Remove values from the front of the queue and print them
    Pop {
        /// Maximum number of values to remove
        #[arg(short = 'n', long, default_value_t = 1)]
        count: u64,
    },

    /// Print the number of queued values
    Len,

    /// Show head, tail, length and capacity
    Status,

    /// Print the value stored under an identifier without removing it
    Get {
        /// Ring identifier
        id: u64,
    },

    /// Delete the queue and its data directory
    Drop {
        /// Confirm the irreversible delete
        #[arg(long)]
        yes: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_push() {
        let cli = Cli::try_parse_from(["levelq", "push", "a", "b"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::Push {
                values: vec!["a".to_string(), "b".to_string()]
            }
        );
        assert_eq!(cli.config, PathBuf::from("levelq.toml"));
    }

    #[test]
    fn test_parse_push_requires_value() {
        assert!(Cli::try_parse_from(["levelq", "push"]).is_err());
    }

    #[test]
    fn test_parse_pop_count_and_global_flags() {
        let cli =
            Cli::try_parse_from(["levelq", "pop", "-n", "3", "--data-dir", "/tmp/q"]).unwrap();
        assert_eq!(cli.command, Commands::Pop { count: 3 });
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/q")));
    }

    #[test]
    fn test_parse_drop_flag() {
        let cli = Cli::try_parse_from(["levelq", "drop"]).unwrap();
        assert_eq!(cli.command, Commands::Drop { yes: false });

        let cli = Cli::try_parse_from(["levelq", "drop", "--yes"]).unwrap();
        assert_eq!(cli.command, Commands::Drop { yes: true });
    }
}
