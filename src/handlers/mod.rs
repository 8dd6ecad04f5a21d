pub mod devices;
pub mod ingest;
pub mod stats;
