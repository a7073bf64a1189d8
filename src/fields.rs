//! Random field generators for synthetic access-log records.
//!
//! Each field follows the skewed distribution observed in real web traffic:
//! a couple of heavy clients dominate the IP space, GET dominates the verb
//! mix, almost everything is a 200, and byte counts cluster tightly around
//! a typical page size.

use chrono::NaiveDateTime;
use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::seq::IndexedRandom;
use rand_distr::Normal;

use crate::record::LogRecord;

/// The two heavy clients that account for most traffic.
pub const FREQUENT_IPS: [&str; 2] = ["12.13.14.15", "123.124.125.126"];

/// Fixed catalog of request path templates.
pub const RESOURCES: [&str; 8] = [
    "/list",
    "/wp-content",
    "/wp-admin",
    "/explore",
    "/search/tag/list",
    "/app/main/posts",
    "/posts/posts/explore",
    "/apps/cart.jsp?appID=",
];

/// HTTP request verbs emitted by the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
    Delete,
    Put,
}

impl Verb {
    pub const ALL: [Verb; 4] = [Verb::Get, Verb::Post, Verb::Delete, Verb::Put];

    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Delete => "DELETE",
            Verb::Put => "PUT",
        }
    }
}

/// Response statuses emitted by the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok,
    NotFound,
    ServerError,
    MovedPermanently,
}

impl StatusCode {
    pub const ALL: [StatusCode; 4] = [
        StatusCode::Ok,
        StatusCode::NotFound,
        StatusCode::ServerError,
        StatusCode::MovedPermanently,
    ];

    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::NotFound => 404,
            StatusCode::ServerError => 500,
            StatusCode::MovedPermanently => 301,
        }
    }
}

/// Browser families used for user-agent generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Browser {
    Firefox,
    Chrome,
    Safari,
    InternetExplorer,
    Opera,
}

const BROWSERS: [Browser; 5] = [
    Browser::Firefox,
    Browser::Chrome,
    Browser::Safari,
    Browser::InternetExplorer,
    Browser::Opera,
];

const DOMAIN_WORDS: [&str; 12] = [
    "johnson", "garcia", "smith", "miller", "davis", "martinez", "taylor", "brown", "wilson",
    "moore", "anderson", "thomas",
];

const TLDS: [&str; 6] = ["com", "org", "net", "info", "biz", "io"];

const PATH_WORDS: [&str; 10] = [
    "home", "search", "main", "blog", "category", "tags", "list", "posts", "explore", "app",
];

/// Samples every `LogRecord` field with realistic skew.
///
/// Weight tables are immutable after construction; all randomness flows
/// through the caller-supplied RNG so sampling is deterministic under a
/// seeded generator.
pub struct FieldSampler {
    frequent_ip_weights: WeightedIndex<f64>,
    verb_weights: WeightedIndex<f64>,
    status_weights: WeightedIndex<f64>,
    browser_weights: WeightedIndex<f64>,
    byte_dist: Normal<f64>,
}

impl FieldSampler {
    pub fn new() -> Self {
        // Weight tables are compile-time constants, so construction cannot fail.
        Self {
            frequent_ip_weights: WeightedIndex::new([0.6, 0.4]).unwrap(),
            verb_weights: WeightedIndex::new([0.6, 0.1, 0.1, 0.2]).unwrap(),
            status_weights: WeightedIndex::new([0.9, 0.04, 0.02, 0.04]).unwrap(),
            browser_weights: WeightedIndex::new([0.5, 0.3, 0.1, 0.05, 0.05]).unwrap(),
            byte_dist: Normal::new(5000.0, 50.0).unwrap(),
        }
    }

    /// Build one complete record stamped with the given virtual timestamp.
    pub fn record<R: Rng + ?Sized>(&self, timestamp: NaiveDateTime, rng: &mut R) -> LogRecord {
        LogRecord {
            ip: self.client_ip(rng),
            timestamp,
            verb: self.verb(rng),
            uri: self.uri(rng),
            status: self.status(rng),
            bytes: self.byte_count(rng),
            referrer: self.referrer(rng),
            user_agent: self.user_agent(rng),
        }
    }

    /// 70% of requests come from the small frequent-client set, the rest
    /// from uniformly random routable-looking addresses.
    pub fn client_ip<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        if rng.random_bool(0.70) {
            FREQUENT_IPS[self.frequent_ip_weights.sample(rng)].to_string()
        } else {
            format!(
                "{}.{}.{}.{}",
                rng.random_range(1..=223u8),
                rng.random_range(0..=255u8),
                rng.random_range(0..=255u8),
                rng.random_range(1..=254u8),
            )
        }
    }

    pub fn verb<R: Rng + ?Sized>(&self, rng: &mut R) -> Verb {
        Verb::ALL[self.verb_weights.sample(rng)]
    }

    /// Uniform pick from the path catalog; cart-style paths get a random
    /// resource id in [1000, 10000) appended.
    pub fn uri<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let template = *RESOURCES.choose(rng).unwrap();
        if template.contains("apps") {
            format!("{}{}", template, rng.random_range(1000..10000))
        } else {
            template.to_string()
        }
    }

    pub fn status<R: Rng + ?Sized>(&self, rng: &mut R) -> StatusCode {
        StatusCode::ALL[self.status_weights.sample(rng)]
    }

    /// Normal(5000, 50), floored at zero before rounding. The floor matters
    /// only in the far tail but keeps the byte count a valid integer.
    pub fn byte_count<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        self.byte_dist.sample(rng).max(0.0).round() as u64
    }

    /// A random syntactically valid referrer URI. Generated values never
    /// contain `"`, which is what lets the formatter skip quote escaping.
    pub fn referrer<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let scheme = if rng.random_bool(0.5) { "https" } else { "http" };
        let domain = DOMAIN_WORDS.choose(rng).unwrap();
        let tld = TLDS.choose(rng).unwrap();
        match rng.random_range(0..4u8) {
            0 => format!("{scheme}://{domain}.{tld}/"),
            1 => format!("{scheme}://www.{domain}.{tld}/"),
            2 => {
                let path = PATH_WORDS.choose(rng).unwrap();
                format!("{scheme}://www.{domain}.{tld}/{path}/")
            }
            _ => {
                let path = PATH_WORDS.choose(rng).unwrap();
                format!("{scheme}://www.{domain}.{tld}/{path}.html")
            }
        }
    }

    /// Pick a browser family by weight, then synthesize a plausible version
    /// string for it.
    pub fn user_agent<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        match BROWSERS[self.browser_weights.sample(rng)] {
            Browser::Firefox => {
                let platform = *[
                    "X11; Linux x86_64",
                    "Windows NT 10.0; Win64; x64",
                    "Macintosh; Intel Mac OS X 10.15",
                ]
                .choose(rng)
                .unwrap();
                let major = rng.random_range(40..120);
                format!("Mozilla/5.0 ({platform}; rv:{major}.0) Gecko/20100101 Firefox/{major}.0")
            }
            Browser::Chrome => {
                let platform = *[
                    "Windows NT 10.0; Win64; x64",
                    "Macintosh; Intel Mac OS X 10_15_7",
                    "X11; Linux x86_64",
                ]
                .choose(rng)
                .unwrap();
                let major = rng.random_range(40..120);
                let build = rng.random_range(1000..5000);
                let patch = rng.random_range(0..200);
                format!(
                    "Mozilla/5.0 ({platform}) AppleWebKit/537.36 (KHTML, like Gecko) \
                     Chrome/{major}.0.{build}.{patch} Safari/537.36"
                )
            }
            Browser::Safari => {
                let minor = rng.random_range(10..16);
                let patch = rng.random_range(0..8);
                let webkit = rng.random_range(600..620);
                let version = rng.random_range(10..17);
                format!(
                    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_{minor}_{patch}) \
                     AppleWebKit/{webkit}.1.15 (KHTML, like Gecko) \
                     Version/{version}.0 Safari/{webkit}.1.15"
                )
            }
            Browser::InternetExplorer => {
                let major = rng.random_range(8..12);
                let nt = *["6.1", "6.3", "10.0"].choose(rng).unwrap();
                let trident = major - 4;
                format!("Mozilla/5.0 (compatible; MSIE {major}.0; Windows NT {nt}; Trident/{trident}.0)")
            }
            Browser::Opera => {
                let major = rng.random_range(9..13);
                let build = rng.random_range(100..300);
                let presto = rng.random_range(8..13);
                format!(
                    "Opera/{major}.{} (Windows NT 6.1; U; en) Presto/2.{presto}.{build} Version/{major}.00",
                    rng.random_range(0..90)
                )
            }
        }
    }
}

impl Default for FieldSampler {
    fn default() -> Self {
        Self::new()
    }
}
