//! Plain-text rendering for terminal output.

use dhammapada_core::accuracy::DisplaySplit;
use dhammapada_core::session::{Milestone, SessionUpdate};
use dhammapada_core::types::{AppSettings, Verse};

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Emphasize the portion still to be typed.
pub fn highlight(split: DisplaySplit<'_>, color: bool) -> String {
    if !color || split.remaining.is_empty() {
        return format!("{}{}", split.typed, split.remaining);
    }
    format!("{}{}{}{}", split.typed, BOLD, split.remaining, RESET)
}

/// Full verse view. A scaled-up font shows the title in bold.
pub fn verse(verse: &Verse, settings: &AppSettings, color: bool) -> String {
    let title = if settings.font_scale() > 1.0 && color {
        format!("{}{}{}", BOLD, verse.title, RESET)
    } else {
        verse.title.clone()
    };

    let mut out = format!("#{} {}\n\n{}\n", verse.id, title, verse.content);
    out.push_str(&format!(
        "\nread {} time(s){}",
        verse.read_count,
        if verse.bookmarked { " | bookmarked" } else { "" }
    ));
    match verse.write_date {
        Some(date) => out.push_str(&format!(
            " | written {} ({:.1}%)\n",
            date.format("%Y.%m.%d"),
            verse.accuracy
        )),
        None => out.push_str(" | not written\n"),
    }
    out
}

/// One line per verse for list output.
pub fn list_item(verse: &Verse) -> String {
    let first_line = verse.content.lines().next().unwrap_or_default();
    let written = match verse.write_date {
        Some(date) => format!("written {}", date.format("%Y.%m.%d")),
        None => "not written".to_string(),
    };
    format!(
        "{:>4} {}{} | {} | read {} | {}",
        verse.id,
        if verse.bookmarked { "* " } else { "" },
        verse.title,
        first_line,
        verse.read_count,
        written
    )
}

/// Preferences, one per line.
pub fn settings(settings: &AppSettings) -> String {
    format!(
        "tts: {}\nwriting: {}\nlarge font: {} ({}x)",
        on_off(settings.use_tts),
        on_off(settings.use_writing),
        on_off(settings.font_size_large),
        settings.font_scale()
    )
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

/// Progress line shown after each typed line.
pub fn progress(update: &SessionUpdate) -> String {
    let mut line = format!(
        "chars: {}  accuracy: {:.1}%",
        update.char_count, update.accuracy
    );
    match update.milestone {
        Some(Milestone::Halfway) => line.push_str("  \u{1F64F} halfway there"),
        Some(Milestone::Complete) => line.push_str("  \u{1F64F}\u{1F64F}\u{1F64F} complete"),
        None => {}
    }
    line
}
