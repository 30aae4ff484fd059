mod price_record;
mod ingest;

pub use price_record::{PriceRecord, PriceQuery, SortKey, SortOrder, PRICE_UNIT, serialize_price};
pub use ingest::{Extraction, IngestOutcome};
