//! Background Jobs Module
//!
//! Jobs here are registered with the job scheduler service and run on a cron
//! schedule, independently of HTTP requests.
//!
//! # Available Jobs
//!
//! - `ingest_prices_job` - Downloads the day's price workbook and replaces the
//!   stored prices for that date
//!
//! Jobs are idempotent for a given date and report failures through their
//! result rather than panicking, so one bad run never stops the next tick.

pub mod ingest_prices_job;
