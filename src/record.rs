//! Access-log record type and CLF/ELF line rendering.

use chrono::{Local, NaiveDateTime};
use clap::ValueEnum;

use crate::fields::{StatusCode, Verb};

/// Output line layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "UPPER")]
pub enum LogFormat {
    /// Common Log Format
    Clf,
    /// Extended Log Format (CLF plus referrer and user agent)
    Elf,
}

/// One synthetic access-log record. Built fresh per generated line,
/// rendered once, then discarded.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub ip: String,
    pub timestamp: NaiveDateTime,
    pub verb: Verb,
    pub uri: String,
    pub status: StatusCode,
    pub bytes: u64,
    pub referrer: String,
    pub user_agent: String,
}

impl LogRecord {
    /// Render the record as a single log line.
    ///
    /// The date/time portion comes from the virtual simulation clock while
    /// the zone offset is the real local offset at render time. That split
    /// matches the upstream generator this tool stands in for, and keeps
    /// output byte-compatible with it.
    ///
    /// Referrer and user agent are quote-free by construction, so the ELF
    /// quoting needs no escaping.
    pub fn render(&self, format: LogFormat) -> String {
        let dt = self.timestamp.format("%d/%b/%Y:%H:%M:%S");
        let tz = Local::now().format("%z");
        match format {
            LogFormat::Clf => format!(
                "{} - - [{} {}] \"{} {} HTTP/1.0\" {} {}",
                self.ip,
                dt,
                tz,
                self.verb.as_str(),
                self.uri,
                self.status.as_u16(),
                self.bytes,
            ),
            LogFormat::Elf => format!(
                "{} - - [{} {}] \"{} {} HTTP/1.0\" {} {} \"{}\" \"{}\"",
                self.ip,
                dt,
                tz,
                self.verb.as_str(),
                self.uri,
                self.status.as_u16(),
                self.bytes,
                self.referrer,
                self.user_agent,
            ),
        }
    }
}
