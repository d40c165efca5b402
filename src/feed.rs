//! Inbound hit records from the live event stream.

use crate::constants::FEED_LOG_CAPACITY;
use crate::effects::HitKind;
use crate::error::FeedError;
use serde::Deserialize;
use serde_json::Value;
use std::collections::VecDeque;

/// One validated record.
#[derive(Clone, Debug, PartialEq)]
pub struct HitRecord {
    pub lat: f32,
    pub long: f32,
    pub kind: HitKind,
    pub label: String,
}

#[derive(Deserialize)]
struct RawRecord {
    lat: Value,
    long: Value,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    label: Option<String>,
}

// Numbers and numeric strings are accepted; anything else is rejected.
fn numeric(field: &'static str, v: &Value) -> Result<f64, FeedError> {
    let n = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match n {
        Some(x) if x.is_finite() => Ok(x),
        _ => Err(FeedError::NonNumeric { field }),
    }
}

fn in_range(field: &'static str, value: f64, limit: f64) -> Result<f32, FeedError> {
    if value.abs() > limit {
        return Err(FeedError::OutOfRange { field, value });
    }
    Ok(value as f32)
}

impl HitRecord {
    /// Decode and validate one message body.
    pub fn parse(data: &str) -> Result<Self, FeedError> {
        let raw: RawRecord = serde_json::from_str(data)?;
        let lat = in_range("lat", numeric("lat", &raw.lat)?, 90.0)?;
        let long = in_range("long", numeric("long", &raw.long)?, 180.0)?;
        Ok(Self {
            lat,
            long,
            kind: HitKind::from_label(raw.kind.as_deref().unwrap_or_default()),
            label: raw.label.unwrap_or_default(),
        })
    }

    pub fn log_line(&self) -> String {
        let kind = match self.kind {
            HitKind::Read => "read",
            HitKind::Other => "other",
        };
        if self.label.is_empty() {
            format!("{kind} @ {:.2}, {:.2}", self.lat, self.long)
        } else {
            format!("{kind} @ {:.2}, {:.2} {}", self.lat, self.long, self.label)
        }
    }
}

/// Most recent feed lines, oldest first.
#[derive(Clone, Debug)]
pub struct FeedLog {
    lines: VecDeque<String>,
    capacity: usize,
}

impl Default for FeedLog {
    fn default() -> Self {
        Self::with_capacity(FEED_LOG_CAPACITY)
    }
}

impl FeedLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, line: String) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
