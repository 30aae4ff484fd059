pub mod ingest_service;
pub mod job_scheduler_service;
pub mod price_service;
pub mod row_extractor;
pub mod run_guard;
pub mod sheet_locator;
#[cfg(test)]
pub mod test_workbooks;
