use crate::core::render::render_pane;
use crate::domain::model::ResultPane;
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

const CSV_HEADER: [&str; 4] = ["subject", "number", "title", "prereq_text"];

pub fn write_matches<W: Write>(pane: &ResultPane, format: OutputFormat, mut writer: W) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for item in render_pane(pane) {
                writeln!(writer, "{}", item)?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, pane.matches())?;
            writeln!(writer)?;
        }
        OutputFormat::Csv => {
            let mut csv_writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(writer);
            csv_writer.write_record(CSV_HEADER)?;
            for m in pane.matches() {
                csv_writer.write_record([
                    m.subject.as_str(),
                    m.number.as_str(),
                    m.title.as_deref().unwrap_or(""),
                    m.prereq_text.as_str(),
                ])?;
            }
            csv_writer.flush()?;
        }
    }
    Ok(())
}
