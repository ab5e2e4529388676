pub mod aggregator;
pub mod extractor;
pub mod foreman;
pub mod job;
pub mod reference;
pub mod task;
pub mod worker;
