use crate::error::Result;
use crate::report::{ReportDocument, ReportSection};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::io::Write;
use unicode_width::UnicodeWidthStr;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Csv,
    Json,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Csv => "csv",
            ReportFormat::Json => "json",
        }
    }

    /// Download name used when no output path is given.
    pub fn file_name(&self) -> String {
        format!("practice_results.{}", self.extension())
    }

    pub fn renderer(&self) -> Box<dyn ReportRenderer> {
        match self {
            ReportFormat::Text => Box::new(TextRenderer),
            ReportFormat::Csv => Box::new(CsvRenderer),
            ReportFormat::Json => Box::new(JsonRenderer),
        }
    }
}

/// Turns an already grouped report into bytes.
pub trait ReportRenderer {
    fn render(&self, doc: &ReportDocument, out: &mut dyn Write) -> Result<()>;
}

/// Plain fixed-width tables for the terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

fn pad(cell: &str, width: usize) -> String {
    let fill = width.saturating_sub(cell.width());
    format!("{cell}{}", " ".repeat(fill))
}

impl TextRenderer {
    fn write_section(&self, section: &ReportSection, out: &mut dyn Write) -> Result<()> {
        let widths: Vec<usize> = section
            .columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                section
                    .rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.width())
                    .chain(std::iter::once(column.width()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let line = |cells: &[String]| {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, &width)| pad(cell, width))
                .join(" | ")
                .trim_end()
                .to_string()
        };

        writeln!(out, "{}", section.heading)?;
        writeln!(out, "{}", line(section.columns.as_slice()))?;
        writeln!(out, "{}", widths.iter().map(|w| "-".repeat(*w)).join("-+-"))?;
        for row in &section.rows {
            writeln!(out, "{}", line(row.as_slice()))?;
        }
        Ok(())
    }
}

impl ReportRenderer for TextRenderer {
    fn render(&self, doc: &ReportDocument, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "{}", doc.title)?;
        writeln!(out, "{}", "=".repeat(doc.title.width()))?;
        for section in &doc.sections {
            writeln!(out)?;
            self.write_section(section, out)?;
        }
        Ok(())
    }
}

/// One block per section: a heading record, the column header, then the rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvRenderer;

impl ReportRenderer for CsvRenderer {
    fn render(&self, doc: &ReportDocument, out: &mut dyn Write) -> Result<()> {
        let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(out);
        writer.write_record([doc.title.as_str()])?;
        for section in &doc.sections {
            writer.write_record([section.heading.as_str()])?;
            writer.write_record(&section.columns)?;
            for row in &section.rows {
                writer.write_record(row)?;
            }
        }
        writer.flush()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl ReportRenderer for JsonRenderer {
    fn render(&self, doc: &ReportDocument, out: &mut dyn Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut *out, doc)?;
        writeln!(out)?;
        Ok(())
    }
}
