//! # custodia CLI
//!
//! Command-line interface for the custodia library.

use std::path::Path;
use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;

use custodia::cli::{Cli, Command, FolderCommand};
use custodia::report::{ReportMode, filter_for_report};
use custodia::{CustodiaError, EvidenceStore, SearchScope, import_conversation};

fn main() {
    if let Err(e) = run() {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), CustodiaError> {
    let cli = <Cli as ClapParser>::parse();
    let store = EvidenceStore::open(&cli.db)?;

    match cli.command {
        Command::Import { folder, folder_id } => {
            println!("📦 custodia v{}", env!("CARGO_PKG_VERSION"));
            println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
            println!("📂 Import:  {}", folder);
            println!("💾 Store:   {}", cli.db);
            println!();

            println!("⏳ Importing...");
            let start = Instant::now();
            let outcome = import_conversation(&store, Path::new(&folder))?;
            let elapsed = start.elapsed();

            if let Some(folder_id) = folder_id {
                store.assign_to_folder(outcome.conversation_id, folder_id)?;
                println!("🗂️  Assigned to folder {}", folder_id);
            }

            println!(
                "   {} messages in {:.2}s",
                outcome.message_count,
                elapsed.as_secs_f64()
            );
            println!("🔒 SHA-256: {}", outcome.digest);
            println!();
            println!(
                "✅ Done! Conversation {} saved to {}",
                outcome.conversation_id, cli.db
            );
        }

        Command::List => {
            let conversations = store.list_conversations()?;
            print_json(&conversations)?;
        }

        Command::Messages {
            id,
            offset,
            limit,
            newest,
        } => {
            let messages = if newest {
                store.get_messages_newest(id, offset, limit)?
            } else {
                store.get_messages(id, offset, limit)?
            };
            print_json(&messages)?;
        }

        Command::Count { id } => {
            println!("{}", store.message_count(id)?);
        }

        Command::Search {
            term,
            conversation,
            folder,
        } => {
            let scope = match (conversation, folder) {
                (Some(id), _) => SearchScope::Conversation(id),
                (None, Some(id)) => SearchScope::Folder(id),
                (None, None) => SearchScope::Global,
            };
            let hits = store.search_messages(scope, &term)?;
            eprintln!("🔍 {} match(es)", hits.len());
            print_json(&hits)?;
        }

        Command::Report {
            id,
            mode,
            date,
            from,
            to,
            term,
        } => {
            let mode = ReportMode::resolve(
                &mode,
                date.as_deref(),
                from.as_deref(),
                to.as_deref(),
                term.as_deref(),
            )?;
            let messages = store.get_all_messages(id)?;
            let entries = filter_for_report(&messages, &mode);
            eprintln!("📋 {} of {} messages selected", entries.len(), messages.len());
            print_json(&entries)?;
        }

        Command::Delete { id } => {
            store.delete_conversation(id)?;
            println!("🗑️  Conversation {} deleted", id);
        }

        Command::Flag { message_id } => {
            let flagged = store.toggle_evidence(message_id)?;
            if flagged {
                println!("🚩 Message {} flagged as evidence", message_id);
            } else {
                println!("⚪ Message {} unflagged", message_id);
            }
        }

        Command::Folder { command } => match command {
            FolderCommand::Create { name, color } => {
                let id = store.create_folder(&name, &color)?;
                println!("🗂️  Folder {} created ({})", id, name);
            }
            FolderCommand::List => {
                let folders = store.list_folders()?;
                print_json(&folders)?;
            }
            FolderCommand::Delete { id } => {
                store.delete_folder(id)?;
                println!("🗑️  Folder {} deleted", id);
            }
            FolderCommand::Assign {
                conversation_id,
                folder_id,
            } => {
                store.assign_to_folder(conversation_id, folder_id)?;
                println!(
                    "🗂️  Conversation {} assigned to folder {}",
                    conversation_id, folder_id
                );
            }
        },
    }

    Ok(())
}

/// Prints a machine-readable result to stdout.
fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CustodiaError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
