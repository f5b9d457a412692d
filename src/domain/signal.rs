//! Trade signals emitted by strategies.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    Buy,
    Sell,
    #[default]
    None,
}

impl Side {
    /// Wire encoding used by tick data: 0 = BUY, 1 = SELL, 2 = NONE.
    pub fn from_code(code: i64) -> Option<Side> {
        match code {
            0 => Some(Side::Buy),
            1 => Some(Side::Sell),
            2 => Some(Side::None),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
            Side::None => write!(f, "NONE"),
        }
    }
}

/// One directional instruction per input record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Signal {
    pub timestamp: i64,
    pub side: Side,
    pub price: f64,
    pub volume: f64,
}

impl Signal {
    pub fn none(timestamp: i64, price: f64, volume: f64) -> Self {
        Signal {
            timestamp,
            side: Side::None,
            price,
            volume,
        }
    }

    pub fn is_actionable(&self) -> bool {
        self.side != Side::None
    }
}
