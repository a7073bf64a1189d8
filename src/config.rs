//! CLI and environment configuration.
//!
//! Flags mirror the classic fake-Apache-log generator interface; every flag
//! has a default and the batch/sleep/broker settings can also come from the
//! `LOGGEN_*` environment variables. Configuration is immutable once parsed.

use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::record::LogFormat;

/// Which sink receives the generated lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "UPPER")]
pub enum OutputKind {
    /// Plain log file
    Log,
    /// Gzip-compressed log file
    Gz,
    /// Stdout
    Console,
    /// Kafka topic
    Kafka,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "loggen", about = "Fake Apache access-log generator streaming to Kafka")]
pub struct Config {
    /// Write to a log file, a gzip file, stdout or Kafka
    #[arg(short, long, value_enum, default_value_t = OutputKind::Kafka)]
    pub output: OutputKind,

    /// Log line layout, Common or Extended Log Format
    #[arg(short = 'l', long, value_enum, default_value_t = LogFormat::Elf)]
    pub log_format: LogFormat,

    /// Maximum lines per batch (inclusive: each batch holds 0..=NUM lines)
    #[arg(short, long, env = "LOGGEN_NUM", default_value_t = 50)]
    pub num: u32,

    /// Prefix for LOG/GZ output file names
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// Seconds to sleep between batches; 0 disables real-time pacing and
    /// switches the virtual clock to random 30-300s steps
    #[arg(short, long, env = "LOGGEN_SLEEP", default_value_t = 0.1)]
    pub sleep: f64,

    /// Kafka brokers connection string
    #[arg(short = 'k', long, env = "LOGGEN_KAFKA", default_value = "kafka:9092")]
    pub kafka_brokers: String,

    /// Kafka topic to publish logs on
    #[arg(short = 't', long, env = "LOGGEN_KAFKA_TOPIC", default_value = "logisland_raw")]
    pub kafka_topic: String,
}

impl Config {
    /// Inter-batch real-time delay; `None` when pacing is disabled.
    pub fn sleep_interval(&self) -> Option<Duration> {
        (self.sleep > 0.0).then(|| Duration::from_secs_f64(self.sleep))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_interface() {
        let cfg = Config::parse_from(["loggen"]);

        assert_eq!(cfg.output, OutputKind::Kafka);
        assert_eq!(cfg.log_format, LogFormat::Elf);
        assert_eq!(cfg.num, 50);
        assert_eq!(cfg.prefix, None);
        assert_eq!(cfg.sleep, 0.1);
        assert_eq!(cfg.kafka_brokers, "kafka:9092");
        assert_eq!(cfg.kafka_topic, "logisland_raw");
    }

    #[test]
    fn short_flags_parse() {
        let cfg = Config::parse_from([
            "loggen", "-o", "CONSOLE", "-l", "CLF", "-n", "10", "-s", "0", "-k",
            "localhost:9092", "-t", "raw_logs", "-p", "edge",
        ]);

        assert_eq!(cfg.output, OutputKind::Console);
        assert_eq!(cfg.log_format, LogFormat::Clf);
        assert_eq!(cfg.num, 10);
        assert_eq!(cfg.prefix.as_deref(), Some("edge"));
        assert_eq!(cfg.kafka_brokers, "localhost:9092");
        assert_eq!(cfg.kafka_topic, "raw_logs");
    }

    #[test]
    fn zero_sleep_disables_pacing() {
        let cfg = Config::parse_from(["loggen", "--sleep", "0"]);
        assert_eq!(cfg.sleep_interval(), None);

        let cfg = Config::parse_from(["loggen", "--sleep", "0.5"]);
        assert_eq!(cfg.sleep_interval(), Some(Duration::from_millis(500)));
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(Config::try_parse_from(["loggen", "--output", "SYSLOG"]).is_err());
        assert!(Config::try_parse_from(["loggen", "--num", "many"]).is_err());
    }
}
