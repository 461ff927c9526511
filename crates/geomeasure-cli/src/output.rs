//! Terminal rendering for command results
//!
//! In JSON mode a command prints exactly one document on stdout,
//! `{"status": "success", "data": ...}`, through [`Printer::envelope`].
//! The remaining helpers decorate human output and are never reached
//! once a command has returned its envelope.

use console::style;
use serde::Serialize;
use std::fmt::Display;
use tabled::{settings::Style, Table, Tabled};

#[derive(Debug, Serialize)]
struct Envelope<'a, T> {
    status: &'static str,
    data: &'a T,
}

#[derive(Debug, Clone, Copy)]
pub struct Printer {
    json: bool,
}

impl Printer {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    /// Print a command result: enveloped in JSON mode, bare pretty JSON otherwise
    pub fn envelope<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        println!("{}", render_result(self.json, &data)?);
        Ok(())
    }

    pub fn heading(&self, title: impl Display) {
        println!("\n{}", style(title).bold().underlined());
    }

    pub fn field(&self, key: impl Display, value: impl Display) {
        println!("{}: {}", style(key).bold(), value);
    }

    /// Indented line tagged with a step label
    pub fn step(&self, label: impl Display, text: impl Display) {
        println!("  [{}] {}", style(label).dim(), text);
    }

    pub fn rows<T: Tabled>(&self, rows: Vec<T>) {
        println!("{}", render_rows(rows));
    }

    pub fn done(&self, message: impl Display) {
        println!("{} {}", style("✓").green().bold(), message);
    }

    pub fn note(&self, message: impl Display) {
        println!("{} {}", style("ℹ").blue().bold(), message);
    }

    /// Goes to stderr so it never mixes with piped results
    pub fn caution(&self, message: impl Display) {
        eprintln!("{} {}", style("⚠").yellow().bold(), message);
    }
}

fn render_result<T: Serialize>(json: bool, data: &T) -> serde_json::Result<String> {
    if json {
        serde_json::to_string_pretty(&Envelope { status: "success", data })
    } else {
        serde_json::to_string_pretty(data)
    }
}

fn render_rows<T: Tabled>(rows: Vec<T>) -> String {
    if rows.is_empty() {
        return style("(none)").dim().to_string();
    }
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}
