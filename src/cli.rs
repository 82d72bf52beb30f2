//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Cli`] - top-level argument structure (database path + subcommand)
//! - [`Command`] - one variant per store operation
//! - [`FolderCommand`] - folder management subcommands
//!
//! The report `--mode` is a plain string on purpose: an unrecognized
//! mode name falls back to the full extraction at runtime instead of
//! being rejected at argument parsing.

use clap::{Parser, Subcommand};

/// Evidentiary chat-transcript ingestion and retrieval.
#[derive(Parser, Debug, Clone)]
#[command(name = "custodia")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    custodia import ./exports/case-42
    custodia list
    custodia messages 1 --offset 0 --limit 50
    custodia messages 1 --newest --limit 20
    custodia search \"meeting point\" --conversation 1
    custodia report 1 --mode evidence
    custodia report 1 --mode date_range --from 2024-02-01 --to 2024-02-10
    custodia flag 812
    custodia folder create \"Operation North\" --color '#d0021b'
    custodia folder assign 1 2")]
pub struct Cli {
    /// Path to the evidence database
    #[arg(long, global = true, default_value = "custodia.db", value_name = "PATH")]
    pub db: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Store operations.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Import an export folder (transcript plus attachments)
    Import {
        /// Folder containing the .txt transcript and attachment files
        folder: String,

        /// Assign the new conversation to this folder id
        #[arg(long, value_name = "ID")]
        folder_id: Option<i64>,
    },

    /// List all conversations, newest first
    List,

    /// Fetch one page of a conversation's messages
    Messages {
        /// Conversation id
        id: i64,

        /// Messages to skip
        #[arg(long, default_value_t = 0)]
        offset: usize,

        /// Page size
        #[arg(long, default_value_t = 50)]
        limit: usize,

        /// Page from the end of the conversation (output stays ascending)
        #[arg(long)]
        newest: bool,
    },

    /// Total message count of a conversation
    Count {
        /// Conversation id
        id: i64,
    },

    /// Case-insensitive substring search over message content
    Search {
        /// Search term
        term: String,

        /// Restrict to one conversation
        #[arg(long, value_name = "ID", conflicts_with = "folder")]
        conversation: Option<i64>,

        /// Restrict to one folder
        #[arg(long, value_name = "ID")]
        folder: Option<i64>,
    },

    /// Extract a filtered message set for reporting
    Report {
        /// Conversation id
        id: i64,

        /// all | single_day | date_range | keyword | evidence | media
        #[arg(long, default_value = "all", value_name = "MODE")]
        mode: String,

        /// Day for single_day mode (YYYY-MM-DD or DD/MM/YYYY)
        #[arg(long, value_name = "DATE")]
        date: Option<String>,

        /// Range start for date_range mode, inclusive
        #[arg(long, value_name = "DATE")]
        from: Option<String>,

        /// Range end for date_range mode, inclusive
        #[arg(long, value_name = "DATE")]
        to: Option<String>,

        /// Search term for keyword mode
        #[arg(long, value_name = "TERM")]
        term: Option<String>,
    },

    /// Delete a conversation with its messages and index entries
    Delete {
        /// Conversation id
        id: i64,
    },

    /// Toggle a message's evidence flag
    Flag {
        /// Message id
        message_id: i64,
    },

    /// Manage folders (grouping containers for conversations)
    Folder {
        #[command(subcommand)]
        command: FolderCommand,
    },
}

/// Folder management subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum FolderCommand {
    /// Create a folder
    Create {
        /// Folder display name
        name: String,

        /// UI accent color
        #[arg(long, default_value = "#3b82f6", value_name = "HEX")]
        color: String,
    },

    /// List folders
    List,

    /// Delete a folder (conversations stay, links are removed)
    Delete {
        /// Folder id
        id: i64,
    },

    /// Assign a conversation to a folder (idempotent)
    Assign {
        /// Conversation id
        conversation_id: i64,
        /// Folder id
        folder_id: i64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_import() {
        let cli = Cli::parse_from(["custodia", "import", "./case-42", "--folder-id", "3"]);
        match cli.command {
            Command::Import { folder, folder_id } => {
                assert_eq!(folder, "./case-42");
                assert_eq!(folder_id, Some(3));
            }
            other => panic!("expected Import, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_messages_defaults() {
        let cli = Cli::parse_from(["custodia", "messages", "7"]);
        match cli.command {
            Command::Messages {
                id,
                offset,
                limit,
                newest,
            } => {
                assert_eq!(id, 7);
                assert_eq!(offset, 0);
                assert_eq!(limit, 50);
                assert!(!newest);
            }
            other => panic!("expected Messages, got {other:?}"),
        }
    }

    #[test]
    fn test_search_scopes_conflict() {
        let result = Cli::try_parse_from([
            "custodia",
            "search",
            "term",
            "--conversation",
            "1",
            "--folder",
            "2",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_db_flag() {
        let cli = Cli::parse_from(["custodia", "--db", "/tmp/case.db", "list"]);
        assert_eq!(cli.db, "/tmp/case.db");
    }

    #[test]
    fn test_parse_folder_assign() {
        let cli = Cli::parse_from(["custodia", "folder", "assign", "4", "9"]);
        match cli.command {
            Command::Folder {
                command:
                    FolderCommand::Assign {
                        conversation_id,
                        folder_id,
                    },
            } => {
                assert_eq!(conversation_id, 4);
                assert_eq!(folder_id, 9);
            }
            other => panic!("expected Folder Assign, got {other:?}"),
        }
    }
}
