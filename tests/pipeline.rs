//! End-to-end pipeline tests: scheduler driving a sink.

use loggen::{BatchScheduler, LogFormat, Sink, SinkError, publish_batch};

/// Collects published lines in memory.
#[derive(Default)]
struct CollectSink {
    lines: Vec<String>,
    flushed: bool,
}

impl Sink for CollectSink {
    fn publish(&mut self, line: &str) -> Result<(), SinkError> {
        self.lines.push(line.to_string());
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        self.flushed = true;
        Ok(())
    }
}

/// Fails every publish for one whole batch, then recovers.
struct BrokenBatchSink {
    broken_batch: usize,
    current_batch: usize,
    accepted: Vec<String>,
}

impl Sink for BrokenBatchSink {
    fn publish(&mut self, line: &str) -> Result<(), SinkError> {
        if self.current_batch == self.broken_batch {
            return Err(SinkError::QueueFull);
        }
        self.accepted.push(line.to_string());
        Ok(())
    }
}

/// Loose grammar check for an Extended Log Format line:
/// `<ip> - - [<stamp> <tz>] "<verb> <uri> HTTP/1.0" <status> <bytes> "<ref>" "<ua>"`
fn assert_valid_elf(line: &str) {
    let (ip, rest) = line.split_once(" - - [").expect("ip separator");
    assert_eq!(ip.split('.').count(), 4, "ip {ip}");
    for octet in ip.split('.') {
        octet.parse::<u8>().expect("ip octet");
    }

    let (stamp, rest) = rest.split_once("] \"").expect("timestamp close");
    let (datetime, tz) = stamp.split_once(' ').expect("timestamp offset");
    assert_eq!(datetime.len(), "05/Mar/2024:17:04:59".len());
    assert_eq!(tz.len(), 5);

    let (request, rest) = rest.split_once("\" ").expect("request close");
    let mut request_parts = request.split(' ');
    let verb = request_parts.next().unwrap();
    assert!(["GET", "POST", "DELETE", "PUT"].contains(&verb), "verb {verb}");
    let uri = request_parts.next().unwrap();
    assert!(uri.starts_with('/'), "uri {uri}");
    assert_eq!(request_parts.next(), Some("HTTP/1.0"));

    let mut tail = rest.splitn(3, ' ');
    let status: u16 = tail.next().unwrap().parse().expect("status");
    assert!([200, 404, 500, 301].contains(&status), "status {status}");
    let _bytes: u64 = tail.next().unwrap().parse().expect("byte count");

    // Exactly two trailing quoted segments.
    let quoted = tail.next().expect("referrer and user agent");
    assert!(quoted.starts_with('"') && quoted.ends_with('"'));
    assert_eq!(line.matches('"').count(), 6);
}

#[test]
fn three_ticks_with_cap_one_produce_at_most_three_valid_elf_lines() {
    let mut scheduler = BatchScheduler::seeded(LogFormat::Elf, 1, None, 1234);
    let mut sink = CollectSink::default();

    for _ in 0..3 {
        let lines = scheduler.tick();
        assert!(lines.len() <= 1);
        publish_batch(&mut sink, &lines);
    }

    assert!(sink.lines.len() <= 3);
    for line in &sink.lines {
        assert_valid_elf(line);
    }
}

#[test]
fn clf_stream_never_carries_trailing_quoted_segments() {
    let mut scheduler = BatchScheduler::seeded(LogFormat::Clf, 20, None, 99);
    let mut sink = CollectSink::default();

    for _ in 0..10 {
        let lines = scheduler.tick();
        publish_batch(&mut sink, &lines);
    }

    assert!(!sink.lines.is_empty());
    for line in &sink.lines {
        // Only the request line is quoted in CLF.
        assert_eq!(line.matches('"').count(), 2);
        assert!(line.contains("HTTP/1.0"));
    }
}

#[test]
fn timestamps_are_non_decreasing_across_the_stream() {
    let mut scheduler = BatchScheduler::seeded(LogFormat::Elf, 10, None, 7);
    let mut sink = CollectSink::default();

    let mut previous = scheduler.clock().now();
    for _ in 0..25 {
        let lines = scheduler.tick();
        publish_batch(&mut sink, &lines);
        let now = scheduler.clock().now();
        assert!(now >= previous);
        previous = now;
    }
}

#[test]
fn a_failing_batch_does_not_stop_later_batches() {
    let mut scheduler = BatchScheduler::seeded(LogFormat::Elf, 10, None, 55);
    let mut sink = BrokenBatchSink {
        broken_batch: 1,
        current_batch: 0,
        accepted: Vec::new(),
    };

    let mut generated_after_failure = 0usize;
    for batch in 0..10 {
        sink.current_batch = batch;
        let lines = scheduler.tick();
        let delivered = publish_batch(&mut sink, &lines);
        if batch == 1 {
            assert_eq!(delivered, 0);
        } else {
            assert_eq!(delivered, lines.len());
            generated_after_failure += lines.len();
        }
    }

    // Generation continued after the broken batch and later records landed.
    assert!(generated_after_failure > 0);
    assert_eq!(
        sink.accepted.len(),
        generated_after_failure,
        "all records outside the broken batch must be delivered"
    );
}
