pub mod compare;
pub mod log;
pub mod reader;
pub mod reconcile;
pub mod report;
pub mod sync;
pub mod writer;
