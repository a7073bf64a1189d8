//! Output sinks for generated log lines.
//!
//! All sinks share the fire-and-forget `Sink` contract: `publish` hands one
//! rendered line to the output and returns without waiting for delivery
//! acknowledgment. Kafka deliveries are tracked by background tasks bounded
//! by a semaphore so a slow broker cannot grow an unbounded queue.

use std::fs::File;
use std::io::{self, BufWriter, Stdout, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Local;
use flate2::Compression;
use flate2::write::GzEncoder;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::error::SinkError;

/// Delivery target for rendered log lines.
///
/// Publish failures are per-record: the caller logs them and moves on, so a
/// failing record never aborts the batch or the process.
pub trait Sink: Send {
    fn publish(&mut self, line: &str) -> Result<(), SinkError>;

    /// Drain anything still in flight. Called once at shutdown.
    fn flush(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Upper bound on unacknowledged Kafka deliveries.
const MAX_IN_FLIGHT: usize = 1000;

/// Readiness probe retry budget at startup.
const CONNECT_ATTEMPTS: u32 = 10;

/// Topic-addressed Kafka sink built on `FutureProducer`.
pub struct KafkaSink {
    producer: FutureProducer,
    topic: String,
    in_flight: Arc<Semaphore>,
}

impl KafkaSink {
    /// Build the producer and wait for the cluster to become reachable,
    /// retrying the metadata probe with linear backoff. Exhausting the
    /// retry budget is a fatal startup error.
    pub async fn connect(brokers: &str, topic: &str) -> Result<Self, SinkError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("client.id", "loggen")
            .set("message.timeout.ms", "5000")
            .create()?;

        let started = Instant::now();
        let mut attempt = 1u32;
        loop {
            match producer
                .client()
                .fetch_metadata(Some(topic), Duration::from_secs(5))
            {
                Ok(_) => {
                    info!(brokers, topic, attempt, "kafka sink ready");
                    break;
                }
                Err(source) if attempt >= CONNECT_ATTEMPTS => {
                    return Err(SinkError::Unavailable {
                        attempts: attempt,
                        elapsed: started.elapsed(),
                        source,
                    });
                }
                Err(err) => {
                    warn!(brokers, attempt, error = %err, "kafka not reachable yet, retrying");
                    tokio::time::sleep(Duration::from_secs(attempt as u64)).await;
                    attempt += 1;
                }
            }
        }

        Ok(Self {
            producer,
            topic: topic.to_string(),
            in_flight: Arc::new(Semaphore::new(MAX_IN_FLIGHT)),
        })
    }
}

impl Sink for KafkaSink {
    fn publish(&mut self, line: &str) -> Result<(), SinkError> {
        // Each in-flight delivery holds one permit until the broker answers.
        let permit = self
            .in_flight
            .clone()
            .try_acquire_owned()
            .map_err(|_| SinkError::QueueFull)?;

        let record = FutureRecord::<(), str>::to(&self.topic).payload(line);
        match self.producer.send_result(record) {
            Ok(delivery) => {
                tokio::spawn(async move {
                    let _permit = permit;
                    match delivery.await {
                        Ok(Ok(_)) => {}
                        Ok(Err((err, _msg))) => warn!(error = %err, "broker rejected record"),
                        Err(_) => debug!("producer dropped before delivery report"),
                    }
                });
                Ok(())
            }
            Err((err, _record)) => Err(SinkError::Kafka(err)),
        }
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        self.producer.flush(Duration::from_secs(5))?;
        Ok(())
    }
}

/// Plain stdout sink.
pub struct ConsoleSink {
    out: Stdout,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for ConsoleSink {
    fn publish(&mut self, line: &str) -> Result<(), SinkError> {
        writeln!(self.out, "{line}")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        self.out.flush()?;
        Ok(())
    }
}

fn output_file_name(prefix: Option<&str>, extension: &str) -> PathBuf {
    let timestr = Local::now().format("%Y%m%d-%H%M%S");
    match prefix {
        Some(prefix) => PathBuf::from(format!("{prefix}_access_log_{timestr}.{extension}")),
        None => PathBuf::from(format!("access_log_{timestr}.{extension}")),
    }
}

/// Appends lines to a timestamped plain log file.
pub struct FileSink {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl FileSink {
    pub fn create(prefix: Option<&str>) -> Result<Self, SinkError> {
        let path = output_file_name(prefix, "log");
        Self::create_at(path)
    }

    pub fn create_at(path: PathBuf) -> Result<Self, SinkError> {
        let file = File::create(&path)?;
        info!(path = %path.display(), "file sink ready");
        Ok(Self {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl Sink for FileSink {
    fn publish(&mut self, line: &str) -> Result<(), SinkError> {
        writeln!(self.writer, "{line}")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Same as [`FileSink`] but gzip-compressed.
pub struct GzipSink {
    encoder: GzEncoder<File>,
    path: PathBuf,
}

impl GzipSink {
    pub fn create(prefix: Option<&str>) -> Result<Self, SinkError> {
        let path = output_file_name(prefix, "log.gz");
        Self::create_at(path)
    }

    pub fn create_at(path: PathBuf) -> Result<Self, SinkError> {
        let file = File::create(&path)?;
        info!(path = %path.display(), "gzip sink ready");
        Ok(Self {
            encoder: GzEncoder::new(file, Compression::default()),
            path,
        })
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl Sink for GzipSink {
    fn publish(&mut self, line: &str) -> Result<(), SinkError> {
        self.encoder.write_all(line.as_bytes())?;
        self.encoder.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        self.encoder.try_finish()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    #[test]
    fn file_sink_writes_one_line_per_publish() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("access.log");

        let mut sink = FileSink::create_at(path.clone()).unwrap();
        sink.publish("first line").unwrap();
        sink.publish("second line").unwrap();
        sink.flush().unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "first line\nsecond line\n");
    }

    #[test]
    fn gzip_sink_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("access.log.gz");

        let mut sink = GzipSink::create_at(path.clone()).unwrap();
        sink.publish("compressed line").unwrap();
        sink.flush().unwrap();
        drop(sink);

        let mut decoder = GzDecoder::new(File::open(&path).unwrap());
        let mut contents = String::new();
        decoder.read_to_string(&mut contents).unwrap();
        assert_eq!(contents, "compressed line\n");
    }

    #[test]
    fn output_names_carry_prefix_and_timestamp() {
        let name = output_file_name(Some("edge"), "log");
        let name = name.to_str().unwrap();
        assert!(name.starts_with("edge_access_log_"));
        assert!(name.ends_with(".log"));

        let bare = output_file_name(None, "log.gz");
        assert!(bare.to_str().unwrap().starts_with("access_log_"));
    }
}
