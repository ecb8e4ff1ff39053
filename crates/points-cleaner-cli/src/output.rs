//! Output formatting for cleaned samples and errors

use std::io::Write;

use anyhow::Error;
use colored::*;
use points_cleaner::Reading;
use serde::Serialize;
use serde_json::json;

use crate::error::CliError;

/// One JSON output record
#[derive(Debug, Serialize)]
struct SampleRecord {
    line: usize,
    raw: f32,
    output: Option<f32>,
}

/// Write one processed sample, as plain text or a JSON line
pub fn write_reading<W: Write>(
    writer: &mut W,
    line: usize,
    raw: f32,
    reading: Reading,
    json: bool,
) -> Result<(), CliError> {
    if json {
        let record = SampleRecord {
            line,
            raw,
            output: reading.value(),
        };
        serde_json::to_writer(&mut *writer, &record)?;
        writeln!(writer)?;
    } else {
        match reading {
            Reading::Pending => writeln!(writer, "pending")?,
            Reading::Clean(value) => writeln!(writer, "{value}")?,
        }
    }
    Ok(())
}

/// Print error in JSON format
pub fn print_error_json(error: &Error, code: u8) {
    let error_json = json!({
        "success": false,
        "error": {
            "message": error.to_string(),
            "code": code,
        }
    });
    match serde_json::to_string(&error_json) {
        Ok(s) => eprintln!("{s}"),
        Err(e) => eprintln!("Failed to format error as JSON: {e}"),
    }
}

/// Print error in human-readable format
pub fn print_error_human(error: &Error) {
    eprintln!("{} {}", "Error:".red().bold(), error);

    for cause in error.chain().skip(1) {
        eprintln!("  {} {}", "Caused by:".yellow(), cause);
    }
}
