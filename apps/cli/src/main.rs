use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dhammapada_core::session::SessionUpdate;
use dhammapada_core::types::{ListFilter, SettingsPatch};
use dhammapada_lib::commands::{self, WritingResponse};
use dhammapada_lib::{render, AppState, Config};
use serde::Serialize;
use std::io::{self, BufRead, IsTerminal};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "dhammapada")]
#[command(about = "Read, copy out and bookmark Dhammapada verses")]
#[command(version)]
struct Args {
    /// SQLite database path
    #[arg(long, global = true, env = "DHAMMAPADA_DB")]
    db: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the initial verses (only once unless forced)
    Seed {
        /// JSON seed file instead of the bundled verses
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long)]
        force: bool,
    },
    /// Show the next verse
    Next,
    /// Show the previous verse
    Prev,
    /// Show one verse
    Show { id: i64 },
    /// List or search verses
    List {
        /// Match against title and content
        #[arg(long, short)]
        query: Option<String>,
        /// unwritten, written or all
        #[arg(long, default_value_t = ListFilter::Unwritten)]
        filter: ListFilter,
        /// Only bookmarked verses
        #[arg(long)]
        bookmarked: bool,
    },
    /// Bookmark a verse
    Bookmark {
        id: i64,
        /// Remove the bookmark instead
        #[arg(long, conflicts_with = "toggle")]
        off: bool,
        #[arg(long)]
        toggle: bool,
    },
    /// Print a verse in shareable form
    Share { id: i64 },
    /// Score typed text against a reference text
    Score { reference: String, typed: String },
    /// Copy out a verse by typing it
    Write {
        id: i64,
        /// Score this text instead of reading lines from stdin
        #[arg(long)]
        text: Option<String>,
        /// Continue from the previously saved copy
        #[arg(long)]
        resume: bool,
    },
    /// Show or change preferences
    Settings {
        #[arg(long)]
        tts: Option<bool>,
        #[arg(long)]
        writing: Option<bool>,
        #[arg(long)]
        large_font: Option<bool>,
    },
    /// Reading statistics
    Stats,
    /// When the daily reminder fires next
    Reminder,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();
    let color = io::stdout().is_terminal() && !args.json;

    // Scoring is pure; no database needed.
    if let Command::Score { reference, typed } = &args.command {
        let response = commands::score_text(reference, typed);
        return emit(args.json, &response, |r| {
            let split = dhammapada_core::DisplaySplit {
                typed: &r.typed_portion,
                remaining: &r.remaining_portion,
            };
            format!(
                "accuracy: {:.1}%\n{}",
                r.accuracy,
                render::highlight(split, color)
            )
        });
    }

    let config = Config::from_env(args.db.clone());
    info!(db = %config.db_path.display(), "opening database");
    let state = AppState::open(config).context("failed to open database")?;

    // The first run loads the bundled verses, like a fresh install. A broken
    // seed file must not lock out settings or stats.
    if !matches!(args.command, Command::Seed { .. }) {
        if let Err(e) = commands::seed_initial_data(&state, None, false) {
            warn!(error = %e, "automatic seeding failed");
        }
    }

    run(&state, args.command, args.json, color)
}

fn run(state: &AppState, command: Command, json: bool, color: bool) -> Result<()> {
    match command {
        Command::Seed { file, force } => {
            let result = commands::seed_initial_data(state, file.as_deref(), force)?;
            emit(json, &result, |r| {
                if r.skipped {
                    "Verses already loaded; use --force to load again.".to_string()
                } else {
                    format!("Loaded {} verses.", r.inserted)
                }
            })
        }
        Command::Next => show_optional(state, commands::next_verse(state)?, json, color),
        Command::Prev => show_optional(state, commands::previous_verse(state)?, json, color),
        Command::Show { id } => {
            let verse = commands::get_verse(state, id)?;
            let settings = commands::get_settings(state)?;
            emit(json, &verse, |v| render::verse(v, &settings, color))
        }
        Command::List {
            query,
            filter,
            bookmarked,
        } => {
            let verses = commands::list_verses(state, query.as_deref(), filter, bookmarked)?;
            emit(json, &verses, |vs| {
                if vs.is_empty() {
                    "No verses match.".to_string()
                } else {
                    vs.iter().map(render::list_item).collect::<Vec<_>>().join("\n")
                }
            })
        }
        Command::Bookmark { id, off, toggle } => {
            let bookmarked = if toggle {
                commands::toggle_bookmark(state, id)?
            } else {
                commands::set_bookmark(state, id, !off)?
            };
            emit(json, &serde_json::json!({ "id": id, "bookmarked": bookmarked }), |_| {
                if bookmarked {
                    format!("Verse {} bookmarked.", id)
                } else {
                    format!("Verse {} bookmark removed.", id)
                }
            })
        }
        Command::Share { id } => {
            let text = commands::share_text(state, id)?;
            emit(json, &serde_json::json!({ "id": id, "text": text }), |_| text.clone())
        }
        Command::Score { .. } => unreachable!("handled before opening the database"),
        Command::Write { id, text, resume } => match text {
            Some(text) => {
                let response = commands::submit_writing(state, id, &text)?;
                emit(json, &response, writing_summary)
            }
            None => write_interactively(state, id, resume, json, color),
        },
        Command::Settings {
            tts,
            writing,
            large_font,
        } => {
            let patch = SettingsPatch {
                use_tts: tts,
                use_writing: writing,
                font_size_large: large_font,
            };
            let settings = commands::update_settings(state, patch)?;
            emit(json, &settings, render::settings)
        }
        Command::Stats => {
            let response = commands::get_stats(state)?;
            emit(json, &response, |r| {
                format!(
                    "verses: {}\nread: {} ({} reads)\nwritten: {} (average accuracy {:.1}%)\nbookmarked: {}\ninstalled: {}",
                    r.stats.total_verses,
                    r.stats.read_verses,
                    r.stats.total_reads,
                    r.stats.written_verses,
                    r.stats.average_accuracy,
                    r.stats.bookmarked_verses,
                    r.installed_at
                )
            })
        }
        Command::Reminder => {
            let response = commands::next_reminder()?;
            emit(json, &response, |r| format!("Next reminder: {}", r.next_at))
        }
    }
}

fn show_optional(
    state: &AppState,
    verse: Option<dhammapada_core::Verse>,
    json: bool,
    color: bool,
) -> Result<()> {
    let settings = commands::get_settings(state)?;
    emit(json, &verse, |v| match v {
        Some(v) => render::verse(v, &settings, color),
        None => "No verses to show.".to_string(),
    })
}

/// Read the verse line by line from stdin, rescoring after every line.
fn write_interactively(
    state: &AppState,
    id: i64,
    resume: bool,
    json: bool,
    color: bool,
) -> Result<()> {
    let (verse, mut session) = commands::start_writing(state, id, resume)?;

    if !json {
        println!("{}\n\n{}\n", verse.title, verse.content);
        println!("Type the verse line by line; finish with an empty line or Ctrl-D.");
    }

    let mut typed = session.typed().to_string();
    let mut last: Option<SessionUpdate> = None;

    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read input")?;
        if line.trim().is_empty() {
            break;
        }
        if !typed.is_empty() {
            typed.push('\n');
        }
        typed.push_str(&line);

        let update = session.update(typed.clone());
        if !json {
            println!("{}", render::highlight(session.display_split(), color));
            println!("{}", render::progress(&update));
        }
        last = Some(update);
    }

    let update = match last {
        Some(update) => update,
        None => session.update(typed),
    };
    let milestone = session.milestone_reached();
    let saved = commands::finish_writing(state, id, session)?;

    let response = WritingResponse {
        verse_id: id,
        accuracy: update.accuracy,
        split: update.split,
        char_count: update.char_count,
        milestone,
        threshold_met: update.threshold_met,
        saved,
    };
    emit(json, &response, writing_summary)
}

fn writing_summary(r: &WritingResponse) -> String {
    let outcome = if r.saved {
        "saved as this verse's copy"
    } else if r.threshold_met {
        "already copied earlier; not saved again"
    } else {
        "below 60%; not saved"
    };
    format!(
        "chars: {}  accuracy: {:.1}%  ({})",
        r.char_count, r.accuracy, outcome
    )
}

fn emit<T: Serialize>(json: bool, value: &T, human: impl FnOnce(&T) -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", human(value));
    }
    Ok(())
}
