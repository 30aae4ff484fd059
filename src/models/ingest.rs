use chrono::NaiveDate;
use serde::Serialize;

use super::PriceRecord;

/// Rows pulled out of the weekday worksheet, in sheet order.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub records: Vec<PriceRecord>,
    /// Rows in the scan window that did not yield a record.
    pub skipped: usize,
}

/// Result of one pipeline run as reported to triggers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestOutcome {
    pub success: bool,
    pub date: NaiveDate,
    pub count: usize,
    pub skipped: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Set when the run was turned away because another one held the date.
    #[serde(skip)]
    pub already_running: bool,
}

impl IngestOutcome {
    pub fn succeeded(date: NaiveDate, count: usize, skipped: usize) -> Self {
        Self {
            success: true,
            date,
            count,
            skipped,
            error: None,
            already_running: false,
        }
    }

    pub fn failed(date: NaiveDate, error: impl ToString) -> Self {
        Self {
            success: false,
            date,
            count: 0,
            skipped: 0,
            error: Some(error.to_string()),
            already_running: false,
        }
    }

    pub fn rejected(date: NaiveDate, error: impl ToString) -> Self {
        Self {
            already_running: true,
            ..Self::failed(date, error)
        }
    }
}
