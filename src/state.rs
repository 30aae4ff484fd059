use std::sync::Arc;

use crate::services::ingest_service::IngestPipeline;
use crate::store::PriceStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PriceStore>,
    pub pipeline: Arc<IngestPipeline>,
}
