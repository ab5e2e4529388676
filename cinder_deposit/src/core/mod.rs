pub mod ingest;
pub mod store;
pub mod table;
