//! # Curriculum Browser REPL
//!
//! A line-driven front end for `CurriculumBrowser`. Rows are numbered from 1;
//! commands are:
//!
//! - `e <n>`: expand or collapse row `n`
//! - `c <n>`: check or uncheck row `n`
//! - `p <action>`: hand the checked topics to a feature and exit
//! - `q`: quit without writing anything

use anyhow::Result;
use promptitron::curriculum::resolver::grade_title;
use promptitron::curriculum::{CurriculumBrowser, NodeKind, PathKey, Row};
use promptitron::handoff::{write_handoff, ActionType, SessionStore};
use promptitron::CurriculumError;
use std::io::{BufRead, Write};
use tracing::info;

/// Prints the visible rows with their numbers.
pub fn render_rows(browser: &CurriculumBrowser, out: &mut impl Write) -> Result<()> {
    let Some(rows) = browser.rows() else {
        if let Some(error) = browser.error() {
            writeln!(out, "⚠️  {error}")?;
        }
        return Ok(());
    };
    for (index, row) in rows.enumerate() {
        writeln!(out, "{}", format_row(index + 1, &row))?;
    }
    writeln!(out, "Seçilen: {}", browser.checked().len())?;
    Ok(())
}

fn format_row(number: usize, row: &Row<'_>) -> String {
    let marker = if !row.has_children {
        " "
    } else if row.is_expanded {
        "▾"
    } else {
        "▸"
    };
    let check = if row.is_checked { "[x]" } else { "[ ]" };
    let title = match row.kind {
        NodeKind::Grade => grade_title(row.title),
        NodeKind::Explanation => format!("{}) {}", row.node.key, row.title),
        _ => row.title.to_string(),
    };
    format!(
        "{number:>3} {}{marker} {check} {title}",
        "  ".repeat(row.depth)
    )
}

/// The path key shown at row `number`, if any.
fn key_at(browser: &CurriculumBrowser, number: usize) -> Option<PathKey> {
    let index = number.checked_sub(1)?;
    browser.rows()?.nth(index).map(|row| row.path_key)
}

/// What the REPL ended with.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    HandedOff(ActionType, usize),
    Quit,
}

/// Runs the REPL until `p`, `q` or end of input.
pub fn run_repl<S: SessionStore + ?Sized>(
    browser: &mut CurriculumBrowser,
    store: &mut S,
    input: impl BufRead,
    out: &mut impl Write,
) -> Result<Outcome> {
    render_rows(browser, out)?;
    for line in input.lines() {
        let line = line?;
        let mut parts = line.split_whitespace();
        let (Some(command), argument) = (parts.next(), parts.next()) else {
            continue;
        };
        match command {
            "q" | "quit" => return Ok(Outcome::Quit),
            "e" | "c" => {
                let key = argument
                    .and_then(|n| n.parse::<usize>().ok())
                    .and_then(|n| key_at(browser, n));
                let Some(key) = key else {
                    writeln!(out, "Geçersiz satır numarası.")?;
                    continue;
                };
                if command == "e" {
                    browser.toggle_expanded(&key);
                } else {
                    browser.toggle_checked(&key);
                }
                render_rows(browser, out)?;
            }
            "p" | "proceed" => {
                let action = match argument.unwrap_or("questions").parse::<ActionType>() {
                    Ok(action) => action,
                    Err(e) => {
                        writeln!(out, "{e}")?;
                        continue;
                    }
                };
                match hand_off(browser, store, action) {
                    Ok(count) => {
                        writeln!(out, "✅ {count} konu '{action}' için kaydedildi.")?;
                        return Ok(Outcome::HandedOff(action, count));
                    }
                    Err(e) if is_no_selection(&e) => {
                        writeln!(out, "⚠️  Lütfen en az bir konu seçin.")?;
                    }
                    Err(e) => return Err(e),
                }
            }
            _ => writeln!(out, "Komutlar: e <n>, c <n>, p <eylem>, q")?,
        }
    }
    Ok(Outcome::Quit)
}

/// Writes the browser's selection into the handoff slot.
pub fn hand_off<S: SessionStore + ?Sized>(
    browser: &CurriculumBrowser,
    store: &mut S,
    action: ActionType,
) -> Result<usize> {
    let handoff = browser.proceed(action)?;
    write_handoff(store, &handoff)?;
    info!(action = %action, "Selection handed off");
    Ok(handoff.selected_topics.len())
}

fn is_no_selection(e: &anyhow::Error) -> bool {
    matches!(
        e.downcast_ref::<CurriculumError>(),
        Some(CurriculumError::NoSelection)
    )
}
