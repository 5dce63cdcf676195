pub mod json_store;
pub mod memory_sink;
pub mod record_sink;
pub mod review_writer;

pub use json_store::{write_atomic, JsonFileSink};
pub use memory_sink::MemorySink;
pub use record_sink::{InsertOutcome, RecordSink};
pub use review_writer::ReviewWriter;
