use std::io::Cursor;

use calamine::{Data, Range, Reader, Xlsx};
use chrono::{Datelike, NaiveDate};

use crate::errors::IngestError;

/// Sheet names of the published workbook, Sunday first.
pub const DEFAULT_SHEET_NAMES: [&str; 7] = [
    "日曜日", "月曜日", "火曜日", "水曜日", "木曜日", "金曜日", "土曜日",
];

/// Weekday → worksheet name mapping, indexed Sunday first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekdaySheetNames([String; 7]);

impl Default for WeekdaySheetNames {
    fn default() -> Self {
        Self(DEFAULT_SHEET_NAMES.map(String::from))
    }
}

impl WeekdaySheetNames {
    /// Parses seven comma-separated names, Sunday first.
    pub fn parse(list: &str) -> Result<Self, String> {
        let names: Vec<String> = list.split(',').map(|s| s.trim().to_string()).collect();

        if names.iter().any(|n| n.is_empty()) {
            return Err(format!("sheet name list contains an empty entry: {:?}", list));
        }

        let names: [String; 7] = names
            .try_into()
            .map_err(|v: Vec<String>| format!("expected 7 sheet names, got {}", v.len()))?;

        Ok(Self(names))
    }

    pub fn for_date(&self, date: NaiveDate) -> &str {
        &self.0[date.weekday().num_days_from_sunday() as usize]
    }
}

/// An xlsx document held in memory.
pub struct ParsedWorkbook {
    inner: Xlsx<Cursor<Vec<u8>>>,
}

impl ParsedWorkbook {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, IngestError> {
        let inner = Xlsx::new(Cursor::new(bytes))
            .map_err(|e| IngestError::Parse(e.to_string()))?;
        Ok(Self { inner })
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.inner.sheet_names()
    }

    pub fn range(&mut self, sheet: &str) -> Result<Range<Data>, IngestError> {
        self.inner
            .worksheet_range(sheet)
            .map_err(|e| IngestError::Parse(format!("failed to read sheet {}: {}", sheet, e)))
    }
}

pub struct SheetLocator {
    names: WeekdaySheetNames,
}

impl SheetLocator {
    pub fn new(names: WeekdaySheetNames) -> Self {
        Self { names }
    }

    pub fn expected_sheet(&self, date: NaiveDate) -> &str {
        self.names.for_date(date)
    }

    /// Returns the cells of the worksheet named after `date`'s weekday.
    pub fn locate(
        &self,
        workbook: &mut ParsedWorkbook,
        date: NaiveDate,
    ) -> Result<Range<Data>, IngestError> {
        let expected = self.expected_sheet(date);
        let available = workbook.sheet_names();

        if !available.iter().any(|name| name == expected) {
            return Err(IngestError::SheetNotFound {
                expected: expected.to_string(),
                available: available.join(", "),
            });
        }

        workbook.range(expected)
    }
}
