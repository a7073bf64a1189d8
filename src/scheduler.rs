//! Batch scheduler: the generate-format-publish tick loop.
//!
//! Each tick advances the virtual clock, draws a batch size, renders that
//! many records, and hands the lines to the sink. The loop then sleeps in
//! real time for the configured interval; with no interval configured it
//! runs flat out while the clock jumps by random 30-300 second steps.

use std::time::Duration;

use chrono::TimeDelta;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::clock::SimClock;
use crate::fields::FieldSampler;
use crate::record::LogFormat;
use crate::sink::Sink;

/// Running totals for the generation loop.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchedulerStats {
    pub ticks: u64,
    pub records: u64,
    pub delivered: u64,
}

/// Drives the infinite generation loop. Owns the simulation clock and all
/// randomness; single-threaded by design.
pub struct BatchScheduler {
    format: LogFormat,
    max_lines: u32,
    sleep: Option<Duration>,
    clock: SimClock,
    sampler: FieldSampler,
    rng: StdRng,
    stats: SchedulerStats,
}

impl BatchScheduler {
    /// `max_lines` is an inclusive per-batch cap: each tick generates a
    /// uniformly random number of records in `0..=max_lines`.
    pub fn new(format: LogFormat, max_lines: u32, sleep: Option<Duration>) -> Self {
        Self::with_rng(format, max_lines, sleep, StdRng::from_os_rng())
    }

    /// Deterministic scheduler for tests and reproducible runs.
    pub fn seeded(format: LogFormat, max_lines: u32, sleep: Option<Duration>, seed: u64) -> Self {
        Self::with_rng(format, max_lines, sleep, StdRng::seed_from_u64(seed))
    }

    fn with_rng(format: LogFormat, max_lines: u32, sleep: Option<Duration>, rng: StdRng) -> Self {
        Self {
            format,
            max_lines,
            sleep,
            clock: SimClock::start_now(),
            sampler: FieldSampler::new(),
            rng,
            stats: SchedulerStats::default(),
        }
    }

    /// Run one tick: advance the clock, then render a fresh batch.
    ///
    /// All records in one batch share the same virtual timestamp, so the
    /// record stream stays non-decreasing with ties inside a batch.
    pub fn tick(&mut self) -> Vec<String> {
        let delta = match self.sleep {
            Some(interval) => {
                TimeDelta::from_std(interval).unwrap_or_else(|_| TimeDelta::zero())
            }
            None => TimeDelta::seconds(self.rng.random_range(30..300)),
        };
        self.clock.advance(delta);

        let count = self.rng.random_range(0..=self.max_lines);
        let timestamp = self.clock.now();
        let mut lines = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let record = self.sampler.record(timestamp, &mut self.rng);
            lines.push(record.render(self.format));
        }

        self.stats.ticks += 1;
        self.stats.records += lines.len() as u64;
        lines
    }

    /// Loop forever: tick, publish, sleep. Cancellation happens by dropping
    /// the future (the caller races it against a shutdown signal); the only
    /// await points are the end-of-tick sleep and a cooperative yield.
    pub async fn drive(&mut self, sink: &mut dyn Sink) {
        loop {
            let lines = self.tick();
            let delivered = publish_batch(sink, &lines);
            self.stats.delivered += delivered as u64;
            debug!(
                batch = lines.len(),
                delivered,
                otime = %self.clock.now(),
                "tick complete"
            );

            match self.sleep {
                Some(interval) => tokio::time::sleep(interval).await,
                None => tokio::task::yield_now().await,
            }
        }
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }
}

/// Publish a batch best-effort. Failures are logged and the record dropped;
/// one bad record never stops the rest of the batch.
pub fn publish_batch(sink: &mut dyn Sink, lines: &[String]) -> usize {
    let mut delivered = 0;
    for line in lines {
        match sink.publish(line) {
            Ok(()) => delivered += 1,
            Err(err) => warn!(error = %err, "publish failed, dropping record"),
        }
    }
    delivered
}
