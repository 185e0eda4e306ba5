//! Table formatting for CLI list commands
//!
//! Every list (jobs, parts, tasks, materials) goes through [`TableFormatter`]
//! so TSV, CSV, Markdown and id-only output stay consistent.

use chrono::NaiveDate;
use console::style;

use crate::cli::helpers::{escape_csv, truncate_str};
use crate::cli::OutputFormat;

/// A typed cell value with semantic meaning for formatting
#[derive(Debug, Clone)]
pub enum CellValue {
    /// Short reference (e.g. "JOB@1"), cyan colored
    ShortId(String),
    /// Plain text, truncated to the column width
    Text(String),
    /// Right-aligned integer
    Number(i64),
    /// Amount with two decimals, "-" when unknown
    Money(Option<f64>),
    /// Labour hours with one decimal
    Hours(f64),
    /// Calendar date, "-" when unset
    Date(Option<NaiveDate>),
    /// Checklist-style flag (done = green ✓)
    Done(bool),
    /// Warning marker for rows that need attention
    Flag(bool),
    Empty,
}

impl CellValue {
    /// Format for TSV output (with colors if terminal)
    pub fn format_tsv(&self, width: usize) -> String {
        match self {
            CellValue::ShortId(sid) => format!("{:<width$}", style(sid).cyan(), width = width),
            CellValue::Text(s) => {
                let truncated = truncate_str(s, width.saturating_sub(2));
                format!("{:<width$}", truncated, width = width)
            }
            CellValue::Number(n) => format!("{:>width$}", n, width = width),
            CellValue::Money(Some(m)) => format!("{:>width$.2}", m, width = width),
            CellValue::Hours(h) => format!("{:>width$.1}", h, width = width),
            CellValue::Date(Some(d)) => format!("{:<width$}", d.format("%Y-%m-%d"), width = width),
            CellValue::Done(true) => format!("{:<width$}", style("✓").green(), width = width),
            CellValue::Done(false) => format!("{:<width$}", style("·").dim(), width = width),
            CellValue::Flag(true) => format!("{:<width$}", style("!").yellow().bold(), width = width),
            CellValue::Flag(false) => format!("{:<width$}", "", width = width),
            CellValue::Money(None) | CellValue::Date(None) | CellValue::Empty => {
                format!("{:<width$}", style("-").dim(), width = width)
            }
        }
    }

    /// Format for CSV output (RFC 4180, no colors)
    pub fn format_csv(&self) -> String {
        match self {
            CellValue::ShortId(s) | CellValue::Text(s) => escape_csv(s),
            _ => self.raw(),
        }
    }

    /// Format for Markdown output (no colors, escaped pipes)
    pub fn format_md(&self) -> String {
        let raw = match self {
            CellValue::Done(true) => "✓".to_string(),
            CellValue::Flag(true) => "**!**".to_string(),
            CellValue::Money(None) | CellValue::Date(None) | CellValue::Empty => "-".to_string(),
            _ => self.raw(),
        };
        raw.replace('|', "\\|")
    }

    /// Raw string value (no formatting)
    pub fn raw(&self) -> String {
        match self {
            CellValue::ShortId(s) | CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Money(m) => m.map(|m| format!("{:.2}", m)).unwrap_or_default(),
            CellValue::Hours(h) => format!("{:.1}", h),
            CellValue::Date(d) => d.map(|d| d.to_string()).unwrap_or_default(),
            CellValue::Done(b) => if *b { "yes" } else { "no" }.to_string(),
            CellValue::Flag(b) => if *b { "!" } else { "" }.to_string(),
            CellValue::Empty => String::new(),
        }
    }

    /// Display width of this cell's content (for dynamic column sizing)
    pub fn display_width(&self) -> usize {
        match self {
            CellValue::Done(_) | CellValue::Flag(_) | CellValue::Empty => 1,
            CellValue::Date(_) => 10,
            other => other.raw().chars().count(),
        }
    }
}

/// Column definition with header label and maximum width
#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub header: &'static str,
    pub width: usize,
}

impl ColumnDef {
    pub const fn new(header: &'static str, width: usize) -> Self {
        Self { header, width }
    }
}

/// A row of cells; `key` is what `--format id` prints
pub struct TableRow {
    pub key: String,
    pub cells: Vec<CellValue>,
}

impl TableRow {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            cells: Vec::new(),
        }
    }

    pub fn cell(mut self, value: CellValue) -> Self {
        self.cells.push(value);
        self
    }
}

/// Outputs rows in the requested format
pub struct TableFormatter<'a> {
    columns: &'a [ColumnDef],
    noun: &'static str,
    hint: Option<String>,
}

impl<'a> TableFormatter<'a> {
    pub fn new(columns: &'a [ColumnDef], noun: &'static str) -> Self {
        Self {
            columns,
            noun,
            hint: None,
        }
    }

    /// Extra text printed after the count line in TSV output
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn output(&self, rows: &[TableRow], format: OutputFormat) {
        match format {
            OutputFormat::Csv => self.output_csv(rows),
            OutputFormat::Md => self.output_md(rows),
            OutputFormat::Id => {
                for row in rows {
                    println!("{}", row.key);
                }
            }
            _ => self.output_tsv(rows),
        }
    }

    /// Column widths from content, capped at each column's maximum
    fn widths(&self, rows: &[TableRow]) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                let content = rows
                    .iter()
                    .filter_map(|r| r.cells.get(i))
                    .map(|c| c.display_width())
                    .max()
                    .unwrap_or(0);
                col.header.len().max(content + 2).min(col.width)
            })
            .collect()
    }

    fn output_tsv(&self, rows: &[TableRow]) {
        let widths = self.widths(rows);

        let header: Vec<String> = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(col, w)| format!("{:<width$}", style(col.header).bold(), width = *w))
            .collect();
        println!("{}", header.join(" "));

        let total_width: usize = widths.iter().sum::<usize>() + widths.len().saturating_sub(1);
        println!("{}", "-".repeat(total_width));

        for row in rows {
            let cells: Vec<String> = widths
                .iter()
                .enumerate()
                .map(|(i, w)| match row.cells.get(i) {
                    Some(value) => value.format_tsv(*w),
                    None => CellValue::Empty.format_tsv(*w),
                })
                .collect();
            println!("{}", cells.join(" "));
        }

        println!();
        print!("{} {}(s) found.", style(rows.len()).cyan(), self.noun);
        match &self.hint {
            Some(hint) => println!(" {}", hint),
            None => println!(),
        }
    }

    fn output_csv(&self, rows: &[TableRow]) {
        let header: Vec<String> = self
            .columns
            .iter()
            .map(|c| c.header.to_lowercase().replace(' ', "_"))
            .collect();
        println!("{}", header.join(","));
        for row in rows {
            let cells: Vec<String> = row.cells.iter().map(|c| c.format_csv()).collect();
            println!("{}", cells.join(","));
        }
    }

    fn output_md(&self, rows: &[TableRow]) {
        let header: Vec<&str> = self.columns.iter().map(|c| c.header).collect();
        println!("| {} |", header.join(" | "));
        println!("|{}|", vec!["---"; header.len()].join("|"));
        for row in rows {
            let cells: Vec<String> = row.cells.iter().map(|c| c.format_md()).collect();
            println!("| {} |", cells.join(" | "));
        }
    }
}
