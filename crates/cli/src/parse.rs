//! ArgMatches → CliAction conversion.

use chrono::NaiveDate;
use clap::ArgMatches;
use keepsake::date::parse_date;
use keepsake::{AnniversaryId, MemoryId, UserId};
use std::path::PathBuf;

/// A parsed command, ready to run against a journal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliAction {
    MemoryAdd {
        title: String,
        date: Option<NaiveDate>,
        message: String,
        photos: Vec<PathBuf>,
        audio: Option<PathBuf>,
    },
    MemoryList,
    MemoryShow { id: MemoryId },
    MemoryDelete { id: MemoryId },
    AnniversaryAdd {
        title: String,
        date: NaiveDate,
        description: Option<String>,
        important: bool,
    },
    AnniversaryList,
    AnniversaryDelete { id: AnniversaryId },
    UserAdd { name: String },
    UserList,
    UserUse { id: UserId },
    UserRename { id: UserId, name: String },
    UserAvatar { id: UserId, file: Option<PathBuf> },
    Export { out: Option<PathBuf> },
    ExportText,
    Import { archive: PathBuf, with_anniversaries: bool },
    Inspect { archive: PathBuf },
}

/// Convert clap ArgMatches into a CliAction.
pub fn matches_to_action(matches: &ArgMatches) -> Result<CliAction, String> {
    let (sub_name, m) = matches
        .subcommand()
        .ok_or_else(|| "No command provided".to_string())?;

    match sub_name {
        "memory" => parse_memory(m),
        "anniversary" => parse_anniversary(m),
        "user" => parse_user(m),
        "export" => Ok(CliAction::Export {
            out: m.get_one::<String>("out").map(PathBuf::from),
        }),
        "export-text" => Ok(CliAction::ExportText),
        "import" => Ok(CliAction::Import {
            archive: PathBuf::from(required(m, "archive")?),
            with_anniversaries: m.get_flag("with-anniversaries"),
        }),
        "inspect" => Ok(CliAction::Inspect {
            archive: PathBuf::from(required(m, "archive")?),
        }),
        other => Err(format!("Unknown command: {}", other)),
    }
}

fn required(m: &ArgMatches, name: &str) -> Result<String, String> {
    m.get_one::<String>(name)
        .cloned()
        .ok_or_else(|| format!("Missing argument: {}", name))
}

fn parse_id(m: &ArgMatches) -> Result<i64, String> {
    let raw = required(m, "id")?;
    raw.parse::<i64>().map_err(|e| format!("Invalid id '{}': {}", raw, e))
}

fn parse_user_id(m: &ArgMatches) -> Result<UserId, String> {
    let raw = required(m, "id")?;
    UserId::parse(&raw).ok_or_else(|| format!("Invalid user id '{}'", raw))
}

fn parse_date_arg(raw: &str) -> Result<NaiveDate, String> {
    parse_date(raw).map_err(|e| e.to_string())
}

// =========================================================================
// Memory
// =========================================================================

fn parse_memory(matches: &ArgMatches) -> Result<CliAction, String> {
    let (sub, m) = matches.subcommand().ok_or("No memory subcommand")?;
    match sub {
        "add" => {
            let date = m
                .get_one::<String>("date")
                .map(|raw| parse_date_arg(raw))
                .transpose()?;
            let photos = m
                .get_many::<String>("photo")
                .map(|values| values.map(PathBuf::from).collect())
                .unwrap_or_default();
            Ok(CliAction::MemoryAdd {
                title: required(m, "title")?,
                date,
                message: required(m, "message")?,
                photos,
                audio: m.get_one::<String>("audio").map(PathBuf::from),
            })
        }
        "list" => Ok(CliAction::MemoryList),
        "show" => Ok(CliAction::MemoryShow {
            id: MemoryId(parse_id(m)?),
        }),
        "delete" => Ok(CliAction::MemoryDelete {
            id: MemoryId(parse_id(m)?),
        }),
        other => Err(format!("Unknown memory subcommand: {}", other)),
    }
}

// =========================================================================
// Anniversary
// =========================================================================

fn parse_anniversary(matches: &ArgMatches) -> Result<CliAction, String> {
    let (sub, m) = matches.subcommand().ok_or("No anniversary subcommand")?;
    match sub {
        "add" => Ok(CliAction::AnniversaryAdd {
            title: required(m, "title")?,
            date: parse_date_arg(&required(m, "date")?)?,
            description: m.get_one::<String>("description").cloned(),
            important: m.get_flag("important"),
        }),
        "list" => Ok(CliAction::AnniversaryList),
        "delete" => Ok(CliAction::AnniversaryDelete {
            id: AnniversaryId(parse_id(m)?),
        }),
        other => Err(format!("Unknown anniversary subcommand: {}", other)),
    }
}

// =========================================================================
// User
// =========================================================================

fn parse_user(matches: &ArgMatches) -> Result<CliAction, String> {
    let (sub, m) = matches.subcommand().ok_or("No user subcommand")?;
    match sub {
        "add" => Ok(CliAction::UserAdd {
            name: required(m, "name")?,
        }),
        "list" => Ok(CliAction::UserList),
        "use" => Ok(CliAction::UserUse {
            id: parse_user_id(m)?,
        }),
        "rename" => Ok(CliAction::UserRename {
            id: parse_user_id(m)?,
            name: required(m, "name")?,
        }),
        "avatar" => Ok(CliAction::UserAvatar {
            id: parse_user_id(m)?,
            file: m.get_one::<String>("file").map(PathBuf::from),
        }),
        other => Err(format!("Unknown user subcommand: {}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::build_cli;

    fn parse(args: &[&str]) -> Result<CliAction, String> {
        let matches = build_cli()
            .try_get_matches_from(std::iter::once("keepsake").chain(args.iter().copied()))
            .map_err(|e| e.to_string())?;
        matches_to_action(&matches)
    }

    #[test]
    fn test_memory_add() {
        let action = parse(&[
            "memory", "add", "--title", "Picnic", "--date", "2024-05-01", "--message", "Lake",
            "--photo", "a.jpg", "--photo", "b.jpg",
        ])
        .unwrap();
        assert_eq!(
            action,
            CliAction::MemoryAdd {
                title: "Picnic".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 5, 1),
                message: "Lake".to_string(),
                photos: vec![PathBuf::from("a.jpg"), PathBuf::from("b.jpg")],
                audio: None,
            }
        );
    }

    #[test]
    fn test_bad_date_rejected() {
        let err = parse(&[
            "memory", "add", "--title", "t", "--date", "01/05/2024", "--message", "m",
        ])
        .unwrap_err();
        assert!(err.contains("01/05/2024"), "{}", err);
    }

    #[test]
    fn test_import_flags() {
        assert_eq!(
            parse(&["import", "backup.tar.zst", "--with-anniversaries"]).unwrap(),
            CliAction::Import {
                archive: PathBuf::from("backup.tar.zst"),
                with_anniversaries: true,
            }
        );
        assert_eq!(
            parse(&["--dir", "/tmp/j", "export"]).unwrap(),
            CliAction::Export { out: None }
        );
    }

    #[test]
    fn test_ids_parsed() {
        assert_eq!(
            parse(&["memory", "delete", "7"]).unwrap(),
            CliAction::MemoryDelete { id: MemoryId(7) }
        );
        assert!(parse(&["memory", "show", "seven"]).is_err());
        assert!(parse(&["user", "use", "not-a-uuid"]).is_err());
    }

    #[test]
    fn test_user_rename_and_avatar() {
        let id = UserId::new();
        let raw = id.to_string();
        assert_eq!(
            parse(&["user", "rename", &raw, "Sam"]).unwrap(),
            CliAction::UserRename {
                id,
                name: "Sam".to_string(),
            }
        );
        assert_eq!(
            parse(&["user", "avatar", &raw, "face.jpg"]).unwrap(),
            CliAction::UserAvatar {
                id,
                file: Some(PathBuf::from("face.jpg")),
            }
        );
        assert_eq!(
            parse(&["user", "avatar", &raw]).unwrap(),
            CliAction::UserAvatar { id, file: None }
        );
        assert!(parse(&["user", "rename", &raw]).is_err());
    }
}
