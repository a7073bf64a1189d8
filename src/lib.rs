//! # loggen - synthetic Apache access-log generator
//!
//! Continuously emits realistic CLF/ELF access-log lines into a streaming
//! sink (Kafka by default), simulating production web traffic for testing
//! log-ingestion pipelines.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                      BatchScheduler                        │
//! │  ┌────────────┐   ┌───────────────┐   ┌────────────────┐   │
//! │  │  SimClock  │──▶│  FieldSampler │──▶│   LogRecord    │   │
//! │  │ (virtual)  │   │ (weighted rnd)│   │   ::render()   │   │
//! │  └────────────┘   └───────────────┘   └───────┬────────┘   │
//! │        ▲ tick                                 │            │
//! └────────┼──────────────────────────────────────┼────────────┘
//!          │                                      ▼
//!     real-time sleep                     ┌────────────────┐
//!                                         │      Sink      │
//!                                         │ kafka / file / │
//!                                         │ gzip / console │
//!                                         └────────────────┘
//! ```
//!
//! ## Key design points
//!
//! 1. **Virtual clock** - record timestamps come from a simulation clock
//!    advanced per tick, decoupled from wall-clock time. The zone offset is
//!    still the real local one at render time.
//!
//! 2. **Fire-and-forget publishing** - the loop never waits for broker
//!    acknowledgment; failures are logged, the record is dropped, and the
//!    loop continues. Only startup failures are fatal.
//!
//! 3. **Deterministic under a seed** - all randomness flows through one
//!    `StdRng`, so a seeded scheduler replays the same stream of records.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use loggen::{BatchScheduler, ConsoleSink, LogFormat, publish_batch};
//!
//! let mut scheduler = BatchScheduler::new(LogFormat::Elf, 50, None);
//! let mut sink = ConsoleSink::new();
//! loop {
//!     let lines = scheduler.tick();
//!     publish_batch(&mut sink, &lines);
//! }
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod fields;
pub mod record;
pub mod scheduler;
pub mod sink;

pub use clock::SimClock;
pub use config::{Config, OutputKind};
pub use error::SinkError;
pub use fields::{FieldSampler, StatusCode, Verb};
pub use record::{LogFormat, LogRecord};
pub use scheduler::{BatchScheduler, SchedulerStats, publish_batch};
pub use sink::{ConsoleSink, FileSink, GzipSink, KafkaSink, Sink};
