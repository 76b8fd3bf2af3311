//! Command-line front end for notecards.
//!
//! # Responsibility
//! - Open the local note store for commands that touch notes and render
//!   them as text.
//! - Map store, speech and logging errors to messages and exit codes.

use chrono::Utc;
use clap::{Parser, Subcommand};
use log::warn;
use notecards_core::{
    core_version, init_logging, open_local_store, relative_label, AppConfig, LocalNoteStore,
    Note, NoteDraft, NoteDraftError, NoteId, RecognitionConfig, ScriptedSpeech,
};
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "notecards", about = "Quick local notes, typed or dictated")]
struct Cli {
    /// SQLite file holding the notes (overrides NOTECARDS_DB_PATH).
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Absolute directory for log files (overrides NOTECARDS_LOG_DIR).
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
    /// trace|debug|info|warn|error (overrides NOTECARDS_LOG_LEVEL).
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List every note, newest first.
    List,
    /// List notes whose content contains the query, ignoring case.
    Search { query: String },
    /// Save a typed note.
    Add {
        #[arg(required = true, num_args = 1..)]
        content: Vec<String>,
    },
    /// Dictate a note: each stdin line is one recognized phrase.
    Dictate {
        /// Recognition language (overrides NOTECARDS_SPEECH_LANG).
        #[arg(long)]
        lang: Option<String>,
    },
    /// Delete a note by id.
    Delete { id: String },
    /// Print the core version.
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = resolve_config(&cli);

    if let Some(log_dir) = config.log_dir.as_ref() {
        if let Err(err) = init_logging(&config.log_level, log_dir) {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    match run(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn resolve_config(cli: &Cli) -> AppConfig {
    let mut config = AppConfig::from_env();
    if let Some(db) = cli.db.clone() {
        config.db_path = db;
    }
    if let Some(log_dir) = cli.log_dir.clone() {
        config.log_dir = Some(log_dir);
    }
    if let Some(level) = cli.log_level.clone() {
        config.log_level = level;
    }
    config
}

fn run(command: Command, config: &AppConfig) -> Result<(), String> {
    match command {
        Command::Version => {
            println!("notecards {}", core_version());
            Ok(())
        }
        Command::List => {
            let store = open_store(config)?;
            print_notes(store.notes().iter());
            Ok(())
        }
        Command::Search { query } => {
            let store = open_store(config)?;
            let hits = store.search(&query);
            if hits.is_empty() {
                println!("No notes match `{query}`.");
            } else {
                print_notes(hits.into_iter());
            }
            Ok(())
        }
        Command::Add { content } => {
            let mut store = open_store(config)?;
            let mut draft = NoteDraft::new();
            draft.start_editor();
            draft.set_content(content.join(" "));
            save_draft(&mut draft, &mut store)
        }
        Command::Dictate { lang } => {
            let mut store = open_store(config)?;
            let language = lang.unwrap_or_else(|| config.speech_language.clone());
            dictate(&language, &mut store)
        }
        Command::Delete { id } => {
            let mut store = open_store(config)?;
            let removed = store
                .delete(&NoteId::new(id.clone()))
                .map_err(|err| err.to_string())?;
            if removed {
                println!("Note {id} deleted.");
            } else {
                println!("No note with id {id}; nothing to delete.");
            }
            Ok(())
        }
    }
}

fn open_store(config: &AppConfig) -> Result<LocalNoteStore, String> {
    open_local_store(config).map_err(|err| err.to_string())
}

fn dictate(language: &str, store: &mut LocalNoteStore) -> Result<(), String> {
    let recognition = RecognitionConfig::with_language(language).map_err(|err| err.to_string())?;
    let lines = io::stdin()
        .lock()
        .lines()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| format!("failed to read dictation input: {err}"))?;

    let mut speech = ScriptedSpeech::from_lines(lines);
    let mut draft = NoteDraft::new();
    draft
        .start_recording(&mut speech, &recognition)
        .map_err(|err| err.to_string())?;
    speech.drain();

    for err in draft.stop_recording(&mut speech) {
        warn!("event=cli_dictate module=cli status=degraded error={err}");
        eprintln!("warning: {err}");
    }
    save_draft(&mut draft, store)
}

fn save_draft(draft: &mut NoteDraft, store: &mut LocalNoteStore) -> Result<(), String> {
    match draft.save(store) {
        Ok(note) => {
            println!("Note saved ({}).", note.id);
            Ok(())
        }
        Err(NoteDraftError::Store(err)) if err.is_validation() => {
            Err("the note cannot be empty".to_string())
        }
        Err(err) => Err(err.to_string()),
    }
}

fn print_notes<'a>(notes: impl Iterator<Item = &'a Note>) {
    let now = Utc::now();
    let mut count = 0usize;
    for note in notes {
        count += 1;
        println!("[{}] {}", note.id, relative_label(note.date, now));
        for line in note.content.lines() {
            println!("    {line}");
        }
        println!();
    }
    if count == 0 {
        println!("No notes yet.");
    }
}
