pub mod workbook_source;
pub mod http_workbook;
