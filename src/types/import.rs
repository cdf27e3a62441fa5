//! Import result types for the CSV bulk upload

use serde::{Deserialize, Serialize};

/// Aggregate outcome of one bulk import run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportResult {
    pub imported: u32,
    pub skipped: u32,
    pub errors: u32,
    pub error_details: Vec<String>,
    /// Max messages kept in `error_details`; `errors` always counts every row.
    #[serde(skip)]
    detail_cap: Option<usize>,
}

impl ImportResult {
    pub fn new(detail_cap: Option<usize>) -> Self {
        Self {
            detail_cap,
            ..Default::default()
        }
    }

    pub fn record_imported(&mut self) {
        self.imported += 1;
    }

    pub fn record_skipped(&mut self) {
        self.skipped += 1;
    }

    pub fn record_error(&mut self, message: String) {
        self.errors += 1;
        match self.detail_cap {
            Some(cap) if self.error_details.len() >= cap => {}
            _ => self.error_details.push(message),
        }
    }

    /// Messages dropped because of the detail cap
    pub fn omitted_details(&self) -> usize {
        (self.errors as usize).saturating_sub(self.error_details.len())
    }

    /// Close the run: when messages were dropped, append one summary line.
    pub fn finish(mut self) -> Self {
        let omitted = self.omitted_details();
        if omitted > 0 {
            self.error_details
                .push(format!("... and {} more errors not shown", omitted));
        }
        self
    }

    pub fn summary(&self) -> String {
        format!(
            "Import completed: {} imported, {} skipped, {} errors",
            self.imported, self.skipped, self.errors
        )
    }
}

/// Success body of the bulk upload endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResponse {
    pub success: bool,
    pub message: String,
    #[serde(flatten)]
    pub result: ImportResult,
}

impl From<ImportResult> for ImportResponse {
    fn from(result: ImportResult) -> Self {
        Self {
            success: true,
            message: result.summary(),
            result,
        }
    }
}
