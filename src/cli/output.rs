/// Output formatting: JSON and table modes. TTY detection.
use std::io::{IsTerminal, Write};

use comfy_table::{Cell, Table, presets::UTF8_BORDERS_ONLY};
use serde::Serialize;

use super::args::OutputFormat;
use crate::types::{ErrorOutput, ItemOutput, RunOutput, SearchResultOutput, StateOutput};
use choicekit::choices::{DropdownView, Row};

/// Resolve the effective output format, handling `--json` flag and TTY auto-detection.
#[must_use]
pub fn resolve_format(fmt: OutputFormat, json_flag: bool) -> OutputFormat {
    if json_flag {
        return OutputFormat::Json;
    }
    if fmt == OutputFormat::Auto {
        if std::io::stdout().is_terminal() {
            OutputFormat::Table
        } else {
            OutputFormat::Json
        }
    } else {
        fmt
    }
}

/// Output context passed to all formatters.
pub struct OutputCtx {
    pub format: OutputFormat,
    pub no_header: bool,
}

impl OutputCtx {
    /// Construct from CLI args.
    #[must_use]
    pub fn new(fmt: OutputFormat, json_flag: bool, no_header: bool) -> Self {
        Self {
            format: resolve_format(fmt, json_flag),
            no_header,
        }
    }

    fn table(&self, headers: &[&str]) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        if !self.no_header {
            table.set_header(headers.to_vec());
        }
        table
    }
}

fn flag(on: bool) -> &'static str {
    if on { "yes" } else { "" }
}

// --- State ---

/// Write the items, choices and groups of a control.
pub fn write_state(state: &StateOutput, ctx: &OutputCtx) {
    match ctx.format {
        OutputFormat::Json => print_json(state),
        OutputFormat::Compact => print_compact_json(state),
        OutputFormat::Ndjson => print_ndjson(&[state]),
        OutputFormat::Table | OutputFormat::Auto => {
            println!("mode: {}", state.mode);
            write_items_table(&state.items, ctx);

            let mut table = ctx.table(&[
                "ID", "VALUE", "LABEL", "GROUP", "SELECTED", "DISABLED", "ACTIVE",
            ]);
            for c in &state.choices {
                table.add_row([
                    c.id.to_string().as_str(),
                    &c.value,
                    &c.label,
                    &c.group_id.map(|g| g.to_string()).unwrap_or_default(),
                    flag(c.selected),
                    flag(c.disabled),
                    flag(c.active),
                ]);
            }
            println!("{table}");

            if !state.groups.is_empty() {
                let mut table = ctx.table(&["ID", "LABEL", "DISABLED"]);
                for g in &state.groups {
                    table.add_row([g.id.to_string().as_str(), &g.label, flag(g.disabled)]);
                }
                println!("{table}");
            }
        }
    }
}

fn write_items_table(items: &[ItemOutput], ctx: &OutputCtx) {
    let mut table = ctx.table(&["ITEM", "VALUE", "LABEL", "CHOICE", "HIGHLIGHTED"]);
    for i in items {
        table.add_row([
            i.id.to_string().as_str(),
            &i.value,
            &i.label,
            &i.choice_id.map(|c| c.to_string()).unwrap_or_default(),
            flag(i.highlighted),
        ]);
    }
    println!("{table}");
}

// --- Search results ---

/// Write search results to stdout.
pub fn write_search_results(results: &[SearchResultOutput], ctx: &OutputCtx) {
    match ctx.format {
        OutputFormat::Json => print_json(results),
        OutputFormat::Compact => print_compact_json(results),
        OutputFormat::Ndjson => print_ndjson(results),
        OutputFormat::Table | OutputFormat::Auto => {
            let mut table = ctx.table(&["ID", "VALUE", "LABEL", "SCORE"]);
            for r in results {
                table.add_row([
                    r.id.to_string().as_str(),
                    &r.value,
                    &r.label,
                    &format!("{:.3}", r.score),
                ]);
            }
            println!("{table}");
        }
    }
}

// --- Script runs ---

/// Write the outcome of a replayed script.
pub fn write_run(run: &RunOutput, ctx: &OutputCtx) {
    match ctx.format {
        OutputFormat::Json => print_json(run),
        OutputFormat::Compact => print_compact_json(run),
        OutputFormat::Ndjson => print_ndjson(&run.events),
        OutputFormat::Table | OutputFormat::Auto => {
            write_items_table(&run.items, ctx);

            let mut table = ctx.table(&["EVENT", "DETAIL"]);
            for event in &run.events {
                let detail = serde_json::to_value(event)
                    .ok()
                    .and_then(|mut v| {
                        v.as_object_mut()?.remove("event");
                        Some(v.to_string())
                    })
                    .unwrap_or_default();
                table.add_row([Cell::new(event.name()), Cell::new(detail)]);
            }
            println!("{table}");

            let state = if run.open { "open" } else { "closed" };
            match &run.dropdown {
                DropdownView::Notice { text, .. } => println!("dropdown ({state}): {text}"),
                DropdownView::Rows { rows } => {
                    println!("dropdown ({state}):");
                    for row in rows {
                        match row {
                            Row::Group { label, .. } => println!("  [{label}]"),
                            Row::Choice {
                                label, disabled, ..
                            } => {
                                let suffix = if *disabled { " (disabled)" } else { "" };
                                println!("    {label}{suffix}");
                            }
                        }
                    }
                }
            }
        }
    }
}

// --- Error output ---

/// Write a structured error to stderr.
pub fn write_error(err: &ErrorOutput, format: OutputFormat, json_flag: bool) {
    let fmt = resolve_format(format, json_flag);
    let stderr = std::io::stderr();
    let mut out = stderr.lock();
    match fmt {
        OutputFormat::Json | OutputFormat::Compact | OutputFormat::Ndjson => {
            let s = serde_json::to_string_pretty(err).unwrap_or_default();
            let _ = writeln!(out, "{s}");
        }
        OutputFormat::Table | OutputFormat::Auto => {
            let _ = writeln!(out, "Error: {}", err.error.message);
        }
    }
}

// --- Generic JSON helpers ---

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("JSON serialization error: {e}"),
    }
}

fn print_compact_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("JSON serialization error: {e}"),
    }
}

fn print_ndjson<T: Serialize>(values: &[T]) {
    for v in values {
        match serde_json::to_string(v) {
            Ok(s) => println!("{s}"),
            Err(e) => eprintln!("JSON serialization error: {e}"),
        }
    }
}
