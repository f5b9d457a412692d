//! Market record types consumed by the pipeline.
//!
//! Timestamps are Unix seconds and are expected to be non-decreasing.

use std::fmt;
use std::str::FromStr;

use super::signal::Side;

/// One Open-High-Low-Close-Volume bar.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Ohlcv {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Ohlcv {
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Ohlcv {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    pub fn field(&self, field: OhlcvField) -> f64 {
        match field {
            OhlcvField::Open => self.open,
            OhlcvField::High => self.high,
            OhlcvField::Low => self.low,
            OhlcvField::Close => self.close,
            OhlcvField::Volume => self.volume,
        }
    }

    /// (high + low + close) / 3
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// (high + low) / 2
    pub fn median_price(&self) -> f64 {
        (self.high + self.low) / 2.0
    }

    /// |close - open|
    pub fn body_size(&self) -> f64 {
        (self.close - self.open).abs()
    }

    /// Collapse the bar to a single value taken from `field`.
    pub fn to_single(&self, field: OhlcvField) -> SingleValue {
        SingleValue {
            timestamp: self.timestamp,
            value: self.field(field),
            volume: self.volume,
        }
    }
}

/// A single trade print.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub timestamp: i64,
    pub price: f64,
    pub volume: f64,
    pub side: Side,
}

impl Tick {
    pub fn to_single(&self) -> SingleValue {
        SingleValue {
            timestamp: self.timestamp,
            value: self.price,
            volume: self.volume,
        }
    }
}

/// One value per timestamp. `volume` is carried over from the bar or tick it
/// was projected from, 0 for plain value series.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SingleValue {
    pub timestamp: i64,
    pub value: f64,
    pub volume: f64,
}

impl SingleValue {
    pub fn new(timestamp: i64, value: f64) -> Self {
        SingleValue {
            timestamp,
            value,
            volume: 0.0,
        }
    }
}

/// Any record the data source can produce.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarketRecord {
    Ohlcv(Ohlcv),
    Tick(Tick),
    Single(SingleValue),
}

impl MarketRecord {
    pub fn timestamp(&self) -> i64 {
        match self {
            MarketRecord::Ohlcv(bar) => bar.timestamp,
            MarketRecord::Tick(tick) => tick.timestamp,
            MarketRecord::Single(single) => single.timestamp,
        }
    }

    /// Close for bars, trade price for ticks, the value itself otherwise.
    pub fn price(&self) -> f64 {
        match self {
            MarketRecord::Ohlcv(bar) => bar.close,
            MarketRecord::Tick(tick) => tick.price,
            MarketRecord::Single(single) => single.value,
        }
    }

    pub fn kind(&self) -> RecordKind {
        match self {
            MarketRecord::Ohlcv(_) => RecordKind::Ohlcv,
            MarketRecord::Tick(_) => RecordKind::Tick,
            MarketRecord::Single(_) => RecordKind::Single,
        }
    }

    pub fn as_ohlcv(&self) -> Option<&Ohlcv> {
        match self {
            MarketRecord::Ohlcv(bar) => Some(bar),
            _ => None,
        }
    }

    /// Project onto a single value; bars use `field`, ticks use their price.
    pub fn to_single(&self, field: OhlcvField) -> SingleValue {
        match self {
            MarketRecord::Ohlcv(bar) => bar.to_single(field),
            MarketRecord::Tick(tick) => tick.to_single(),
            MarketRecord::Single(single) => *single,
        }
    }
}

impl From<Ohlcv> for MarketRecord {
    fn from(bar: Ohlcv) -> Self {
        MarketRecord::Ohlcv(bar)
    }
}

impl From<Tick> for MarketRecord {
    fn from(tick: Tick) -> Self {
        MarketRecord::Tick(tick)
    }
}

impl From<SingleValue> for MarketRecord {
    fn from(single: SingleValue) -> Self {
        MarketRecord::Single(single)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Ohlcv,
    Tick,
    Single,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Ohlcv => write!(f, "ohlcv"),
            RecordKind::Tick => write!(f, "tick"),
            RecordKind::Single => write!(f, "single"),
        }
    }
}

impl FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ohlcv" => Ok(RecordKind::Ohlcv),
            "tick" => Ok(RecordKind::Tick),
            "single" | "single_value" => Ok(RecordKind::Single),
            other => Err(format!("unknown record format '{}'", other)),
        }
    }
}

/// Which column of a bar a strategy reads or prices its signal at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OhlcvField {
    Open,
    High,
    Low,
    #[default]
    Close,
    Volume,
}

impl FromStr for OhlcvField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open" => Ok(OhlcvField::Open),
            "high" => Ok(OhlcvField::High),
            "low" => Ok(OhlcvField::Low),
            "close" => Ok(OhlcvField::Close),
            "volume" => Ok(OhlcvField::Volume),
            other => Err(format!("unknown OHLCV field '{}'", other)),
        }
    }
}
