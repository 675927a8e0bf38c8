//! Report output port trait.

use crate::domain::error::TradelensError;
use serde::Serialize;

/// Port for writing analysis results.
pub trait ReportPort {
    fn write(&self, report: &serde_json::Value, output_path: &str) -> Result<(), TradelensError>;

    /// Serialize any report type, then hand it to `write`.
    fn write_report<T: Serialize>(
        &self,
        report: &T,
        output_path: &str,
    ) -> Result<(), TradelensError>
    where
        Self: Sized,
    {
        let value = serde_json::to_value(report)?;
        self.write(&value, output_path)
    }
}
