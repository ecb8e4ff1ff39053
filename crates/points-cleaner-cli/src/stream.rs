//! Line-oriented sample streaming
//!
//! One sample per input line; blank lines and `#` comments are skipped.

use std::io::{BufRead, Write};

use points_cleaner::PointsCleaner;
use tracing::{debug, warn};

use crate::error::CliError;
use crate::output::write_reading;

/// Streaming behaviour switches
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamOptions {
    /// Emit one JSON object per sample instead of plain text
    pub json: bool,
    /// Log and skip bad samples instead of failing
    pub skip_invalid: bool,
}

/// Counters reported after a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamSummary {
    pub processed: usize,
    pub pending: usize,
    pub skipped: usize,
}

/// Parse one input line. `None` for lines that carry no sample.
pub fn parse_line(line: &str) -> Option<Result<f32, String>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    Some(
        trimmed
            .parse::<f32>()
            .map_err(|e| format!("'{trimmed}' is not a number ({e})")),
    )
}

/// Feed every sample from `reader` through `cleaner`, writing one output line per sample.
pub fn run_stream<R: BufRead, W: Write>(
    cleaner: &mut PointsCleaner,
    reader: R,
    writer: &mut W,
    options: StreamOptions,
) -> Result<StreamSummary, CliError> {
    let mut summary = StreamSummary::default();

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line?;

        let Some(parsed) = parse_line(&line) else {
            continue;
        };

        let result = match parsed {
            Ok(raw) => match cleaner.process_sample(raw) {
                Ok(reading) => Ok((raw, reading)),
                Err(e) if e.is_sample_error() => Err(e.to_string()),
                Err(e) => return Err(e.into()),
            },
            Err(reason) => Err(reason),
        };

        match result {
            Ok((raw, reading)) => {
                if reading.is_pending() {
                    summary.pending += 1;
                }
                summary.processed += 1;
                write_reading(writer, line_no, raw, reading, options.json)?;
            }
            Err(reason) if options.skip_invalid => {
                warn!(line = line_no, %reason, "skipping invalid sample");
                summary.skipped += 1;
            }
            Err(reason) => {
                return Err(CliError::InvalidSample {
                    line: line_no,
                    reason,
                });
            }
        }
    }

    writer.flush()?;
    debug!(
        processed = summary.processed,
        pending = summary.pending,
        skipped = summary.skipped,
        "stream finished"
    );
    Ok(summary)
}
