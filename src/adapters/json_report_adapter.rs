//! JSON report adapter implementing ReportPort.
//!
//! Writes to a file, creating parent directories, or to stdout when the
//! output path is `-`.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::domain::error::TradelensError;
use crate::ports::report_port::ReportPort;

pub const STDOUT: &str = "-";

pub struct JsonReportAdapter {
    pretty: bool,
}

impl JsonReportAdapter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    pub fn render(&self, report: &serde_json::Value) -> Result<String, TradelensError> {
        let text = if self.pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        Ok(text)
    }
}

impl Default for JsonReportAdapter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ReportPort for JsonReportAdapter {
    fn write(&self, report: &serde_json::Value, output_path: &str) -> Result<(), TradelensError> {
        let mut text = self.render(report)?;
        text.push('\n');

        if output_path == STDOUT {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
            return Ok(());
        }

        let path = Path::new(output_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, text)?;
        tracing::debug!(path = output_path, "report written");

        Ok(())
    }
}
