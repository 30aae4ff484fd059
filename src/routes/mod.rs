pub(crate) mod health;
pub(crate) mod ingest;
pub(crate) mod vegetables;
