//! keepsake CLI: manage a local memory journal and its backups.
//!
//! Each invocation runs one command and ends with a single status line:
//! `ok: ...` on stdout with exit code 0, or `error: ...` on stderr with
//! exit code 1. Listings are printed above the status line.

mod commands;
mod format;
mod parse;

use std::fs;
use std::path::Path;
use std::process;

use chrono::Local;
use keepsake::{Journal, NewAnniversary, NewMemory};
use tracing::{debug, Level};

use commands::build_cli;
use format::{
    format_anniversary_line, format_export, format_memory, format_memory_line, format_summary,
    format_user_line,
};
use parse::{matches_to_action, CliAction};

/// Output of a successful command
struct Outcome {
    /// Lines printed before the status line
    details: Vec<String>,
    /// Status line text
    status: String,
}

impl Outcome {
    fn status(status: impl Into<String>) -> Self {
        Self {
            details: Vec::new(),
            status: status.into(),
        }
    }

    fn with_details(details: Vec<String>, status: impl Into<String>) -> Self {
        Self {
            details,
            status: status.into(),
        }
    }
}

fn main() {
    let matches = build_cli().get_matches();

    let level = if matches.get_flag("verbose") {
        Level::DEBUG
    } else {
        Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let dir = matches
        .get_one::<String>("dir")
        .map(|s| s.as_str())
        .unwrap_or(".keepsake");

    let exit_code = match matches_to_action(&matches).and_then(|action| run(dir, action)) {
        Ok(outcome) => {
            for line in outcome.details {
                println!("{}", line);
            }
            println!("ok: {}", outcome.status);
            0
        }
        Err(e) => {
            eprintln!("error: {}", e);
            1
        }
    };
    process::exit(exit_code);
}

fn open_journal(dir: &str, import_anniversaries: bool) -> Result<Journal, String> {
    Journal::builder()
        .path(dir)
        .import_anniversaries(import_anniversaries)
        .open()
        .map_err(|e| format!("failed to open journal at {}: {}", dir, e))
}

fn run(dir: &str, action: CliAction) -> Result<Outcome, String> {
    let import_anniversaries = matches!(
        action,
        CliAction::Import {
            with_anniversaries: true,
            ..
        }
    );
    let journal = open_journal(dir, import_anniversaries)?;
    debug!("Running {:?}", action);
    execute(&journal, action).map_err(|e| e.to_string())
}

fn read_media(path: &Path) -> keepsake::Result<Vec<u8>> {
    Ok(fs::read(path)?)
}

fn execute(journal: &Journal, action: CliAction) -> keepsake::Result<Outcome> {
    let today = Local::now().date_naive();

    match action {
        CliAction::MemoryAdd {
            title,
            date,
            message,
            photos,
            audio,
        } => {
            let mut photo_paths = Vec::with_capacity(photos.len());
            for photo in &photos {
                let saved = journal.save_photo(&read_media(photo)?)?;
                photo_paths.push(saved.to_string_lossy().into_owned());
            }
            let mut memory =
                NewMemory::new(title, date.unwrap_or(today), message).with_photos(photo_paths);
            if let Some(audio) = audio {
                let saved = journal.save_audio(&read_media(&audio)?)?;
                memory = memory.with_audio(saved.to_string_lossy());
            }
            let record = journal.add_memory(memory)?;
            Ok(Outcome::status(format!("added memory {}", record.id)))
        }
        CliAction::MemoryList => {
            let memories = journal.memories()?;
            let lines = memories.iter().map(format_memory_line).collect();
            Ok(Outcome::with_details(lines, format!("{} memories", memories.len())))
        }
        CliAction::MemoryShow { id } => {
            let memory = journal
                .memory(id)?
                .ok_or_else(|| keepsake::Error::NotFound(format!("memory {}", id)))?;
            Ok(Outcome::with_details(vec![format_memory(&memory)], format!("memory {}", id)))
        }
        CliAction::MemoryDelete { id } => {
            let removed = journal.delete_memory(id)?;
            Ok(Outcome::status(format!("deleted memory {} ({})", id, removed.title)))
        }
        CliAction::AnniversaryAdd {
            title,
            date,
            description,
            important,
        } => {
            let mut anniversary = NewAnniversary::new(title, date);
            if let Some(description) = description {
                anniversary = anniversary.with_description(description);
            }
            if important {
                anniversary = anniversary.important();
            }
            let record = journal.add_anniversary(anniversary)?;
            Ok(Outcome::status(format!("added anniversary {}", record.id)))
        }
        CliAction::AnniversaryList => {
            let anniversaries = journal.anniversaries()?;
            let lines = anniversaries
                .iter()
                .map(|a| format_anniversary_line(a, today))
                .collect();
            Ok(Outcome::with_details(lines, format!("{} anniversaries", anniversaries.len())))
        }
        CliAction::AnniversaryDelete { id } => {
            let removed = journal.delete_anniversary(id)?;
            Ok(Outcome::status(format!("deleted anniversary {} ({})", id, removed.title)))
        }
        CliAction::UserAdd { name } => {
            let user = journal.add_user(name)?;
            Ok(Outcome::status(format!("added user {}", user.id)))
        }
        CliAction::UserList => {
            journal.ensure_default_user()?;
            let users = journal.users()?;
            let lines = users.iter().map(format_user_line).collect();
            Ok(Outcome::with_details(lines, format!("{} users", users.len())))
        }
        CliAction::UserUse { id } => {
            journal.set_current_user(id)?;
            Ok(Outcome::status(format!("current user is {}", id)))
        }
        CliAction::UserRename { id, name } => {
            let user = journal.rename_user(id, name)?;
            Ok(Outcome::status(format!("renamed user {} to {}", id, user.name)))
        }
        CliAction::UserAvatar { id, file } => {
            let avatar = match file {
                Some(file) => {
                    let saved = journal.save_photo(&read_media(&file)?)?;
                    Some(saved.to_string_lossy().into_owned())
                }
                None => None,
            };
            let cleared = avatar.is_none();
            journal.set_user_avatar(id, avatar)?;
            let verb = if cleared { "cleared" } else { "set" };
            Ok(Outcome::status(format!("{} avatar for user {}", verb, id)))
        }
        CliAction::Export { out } => {
            let info = match out {
                Some(path) => journal.export_archive_to(&path)?,
                None => journal.export_archive()?,
            };
            Ok(Outcome::status(format_export(&info)))
        }
        CliAction::ExportText => {
            let path = journal.export_text()?;
            Ok(Outcome::status(format!("wrote {}", path.display())))
        }
        CliAction::Import { archive, .. } => {
            let report = journal.import_archive(&archive)?;
            Ok(Outcome::status(format!(
                "imported {} memories and {} anniversaries",
                report.memories_applied, report.anniversaries_applied
            )))
        }
        CliAction::Inspect { archive } => {
            let summary = journal.inspect_archive(&archive)?;
            Ok(Outcome::with_details(
                vec![format_summary(&summary)],
                format!("{} is a valid archive", archive.display()),
            ))
        }
    }
}
