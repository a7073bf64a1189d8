//! Error taxonomy for sink construction and publishing.
//!
//! Only startup failures (sink unreachable, output file creation) propagate
//! to a non-zero process exit. Steady-state publish errors are reported by
//! the caller and the record is dropped.

use std::io;
use std::time::Duration;

use rdkafka::error::KafkaError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    /// Broker rejected the record or the producer could not be built.
    #[error("kafka error: {0}")]
    Kafka(#[from] KafkaError),

    /// Startup readiness probe exhausted its retry budget.
    #[error("sink unreachable after {attempts} attempts over {elapsed:?}: {source}")]
    Unavailable {
        attempts: u32,
        elapsed: Duration,
        source: KafkaError,
    },

    /// The bounded in-flight delivery queue is full; the record is dropped.
    #[error("outgoing queue full, record dropped")]
    QueueFull,

    /// File or console write failure.
    #[error(transparent)]
    Io(#[from] io::Error),
}
