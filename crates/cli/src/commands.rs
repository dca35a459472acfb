//! Clap command tree.

use clap::{Arg, ArgAction, Command};

/// Build the full `keepsake` command tree.
pub fn build_cli() -> Command {
    Command::new("keepsake")
        .about("Local memory journal with portable backups")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("dir")
                .long("dir")
                .global(true)
                .value_name("DIR")
                .default_value(".keepsake")
                .help("Journal data directory"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log debug output to stderr"),
        )
        .subcommand(memory_cmd())
        .subcommand(anniversary_cmd())
        .subcommand(user_cmd())
        .subcommand(
            Command::new("export")
                .about("Write a .tar.zst backup of all memories and anniversaries")
                .arg(
                    Arg::new("out")
                        .long("out")
                        .value_name("PATH")
                        .help("Archive path (default: exports/memories_backup_<millis>.tar.zst)"),
                ),
        )
        .subcommand(Command::new("export-text").about("Write a readable text summary"))
        .subcommand(
            Command::new("import")
                .about("Import a backup archive as new records")
                .arg(Arg::new("archive").required(true).value_name("ARCHIVE"))
                .arg(
                    Arg::new("with-anniversaries")
                        .long("with-anniversaries")
                        .action(ArgAction::SetTrue)
                        .help("Also import anniversaries"),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Describe a backup archive without importing it")
                .arg(Arg::new("archive").required(true).value_name("ARCHIVE")),
        )
}

fn id_arg() -> Arg {
    Arg::new("id").required(true).value_name("ID")
}

fn memory_cmd() -> Command {
    Command::new("memory")
        .about("Memory operations")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Add a memory")
                .arg(Arg::new("title").long("title").required(true))
                .arg(
                    Arg::new("date")
                        .long("date")
                        .value_name("YYYY-MM-DD")
                        .help("Defaults to today"),
                )
                .arg(Arg::new("message").long("message").required(true))
                .arg(
                    Arg::new("photo")
                        .long("photo")
                        .value_name("FILE")
                        .action(ArgAction::Append)
                        .help("Photo to copy into the journal (repeatable)"),
                )
                .arg(
                    Arg::new("audio")
                        .long("audio")
                        .value_name("FILE")
                        .help("Voice note to copy into the journal"),
                ),
        )
        .subcommand(Command::new("list").about("List memories, newest first"))
        .subcommand(Command::new("show").about("Show one memory").arg(id_arg()))
        .subcommand(
            Command::new("delete")
                .about("Delete a memory and its media")
                .arg(id_arg()),
        )
}

fn anniversary_cmd() -> Command {
    Command::new("anniversary")
        .about("Anniversary operations")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Add an anniversary")
                .arg(Arg::new("title").long("title").required(true))
                .arg(
                    Arg::new("date")
                        .long("date")
                        .value_name("YYYY-MM-DD")
                        .required(true),
                )
                .arg(Arg::new("description").long("description"))
                .arg(
                    Arg::new("important")
                        .long("important")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(Command::new("list").about("List anniversaries with day counts"))
        .subcommand(
            Command::new("delete")
                .about("Delete an anniversary")
                .arg(id_arg()),
        )
}

fn user_cmd() -> Command {
    Command::new("user")
        .about("User operations")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Add a user")
                .arg(Arg::new("name").required(true)),
        )
        .subcommand(Command::new("list").about("List users"))
        .subcommand(
            Command::new("rename")
                .about("Change a user's name")
                .arg(id_arg())
                .arg(Arg::new("name").required(true)),
        )
        .subcommand(
            Command::new("avatar")
                .about("Set a user's avatar, or clear it when no file is given")
                .arg(id_arg())
                .arg(Arg::new("file").value_name("FILE")),
        )
        .subcommand(
            Command::new("use")
                .about("Switch the current user")
                .arg(id_arg()),
        )
}
