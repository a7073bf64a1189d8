//! loggen - fake Apache access-log generator
//!
//! Usage:
//!   loggen                                   # ELF lines to kafka:9092, topic logisland_raw
//!   loggen -o CONSOLE -l CLF -n 10 -s 0.5    # CLF lines to stdout
//!   loggen -o GZ -p edge                     # gzipped file edge_access_log_<ts>.log.gz
//!
//! Runs until interrupted; ctrl-c drains in-flight deliveries and exits 0.
//! Configuration errors and an unreachable sink at startup exit non-zero.

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use loggen::{
    BatchScheduler, Config, ConsoleSink, FileSink, GzipSink, KafkaSink, OutputKind, Sink,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cfg = Config::parse();
    info!(
        output = ?cfg.output,
        format = ?cfg.log_format,
        max_lines = cfg.num,
        sleep = cfg.sleep,
        "starting generator"
    );

    let mut sink: Box<dyn Sink> = match cfg.output {
        OutputKind::Kafka => Box::new(
            KafkaSink::connect(&cfg.kafka_brokers, &cfg.kafka_topic)
                .await
                .context("kafka sink startup failed")?,
        ),
        OutputKind::Console => Box::new(ConsoleSink::new()),
        OutputKind::Log => Box::new(
            FileSink::create(cfg.prefix.as_deref()).context("could not create output file")?,
        ),
        OutputKind::Gz => Box::new(
            GzipSink::create(cfg.prefix.as_deref()).context("could not create output file")?,
        ),
    };

    let mut scheduler = BatchScheduler::new(cfg.log_format, cfg.num, cfg.sleep_interval());

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("interrupt received, shutting down");
        }
        _ = scheduler.drive(sink.as_mut()) => {
            // drive() loops forever; only the signal arm exits.
        }
    }

    if let Err(err) = sink.flush() {
        warn!(error = %err, "failed to drain sink on shutdown");
    }

    let stats = scheduler.stats();
    info!(
        ticks = stats.ticks,
        records = stats.records,
        delivered = stats.delivered,
        "generator stopped"
    );
    Ok(())
}
