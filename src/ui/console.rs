//! Console chat surface.
//!
//! Prints the conversation to stdout with crossterm styling and reads user
//! input with a blocking line prompt. Tables and charts are drawn through
//! [`super::render`] at the current terminal width.

use std::io::{self, BufRead, Write};

use crossterm::style::Stylize;

use super::{render, Surface};
use crate::chart::ChartSpec;
use crate::db::Table;

/// Fallback width when the terminal size cannot be determined.
const FALLBACK_WIDTH: u16 = 80;

/// Stdout-backed chat surface.
#[derive(Debug, Default)]
pub struct ConsoleSurface;

impl ConsoleSurface {
    /// Creates a console surface.
    pub fn new() -> Self {
        Self
    }

    /// Current terminal width, for table and chart layout.
    fn width(&self) -> u16 {
        crossterm::terminal::size()
            .map(|(w, _)| w)
            .unwrap_or(FALLBACK_WIDTH)
    }

    /// Prints the blocking input prompt and reads one line.
    ///
    /// Returns `None` on end of input (Ctrl-D).
    pub fn read_line(&mut self) -> Option<String> {
        print!("{} ", "you ▸".bold().green());
        let _ = io::stdout().flush();

        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }
}

impl Surface for ConsoleSurface {
    fn user(&mut self, _text: &str) {
        // The typed line is already on screen; nothing to echo.
    }

    fn assistant_start(&mut self) {
        print!("{} ", "dockside ▸".bold().cyan());
        let _ = io::stdout().flush();
    }

    fn assistant_fragment(&mut self, fragment: &str) {
        print!("{fragment}");
        let _ = io::stdout().flush();
    }

    fn assistant_done(&mut self) {
        println!();
    }

    fn status(&mut self, text: &str) {
        println!("{}", text.dark_grey());
    }

    fn error(&mut self, text: &str) {
        println!("{}", text.red());
    }

    fn table(&mut self, table: &Table) {
        print!("{}", render::render_table(table, self.width()));
    }

    fn chart(&mut self, spec: &ChartSpec) {
        print!("{}", render::render_chart(spec, self.width()));
    }
}
