#![allow(dead_code)]

use std::io::Write;

use tempfile::NamedTempFile;
use tzutrader::domain::record::{Ohlcv, SingleValue};
use tzutrader::domain::signal::{Side, Signal};

pub const DAY: i64 = 86_400;

/// Bar opening at `open` and closing at `close` on day `day`.
pub fn bar(day: i64, open: f64, close: f64) -> Ohlcv {
    Ohlcv::new(day * DAY, open, open.max(close), open.min(close), close, 1_000.0)
}

pub fn singles(values: &[f64]) -> Vec<SingleValue> {
    values
        .iter()
        .enumerate()
        .map(|(i, &value)| SingleValue::new(i as i64 * DAY, value))
        .collect()
}

pub fn signal(day: i64, side: Side, price: f64) -> Signal {
    Signal {
        timestamp: day * DAY,
        side,
        price,
        volume: 0.0,
    }
}

/// CSV text with a header and one flat bar per close.
pub fn ohlcv_csv(closes: &[f64]) -> String {
    let mut out = String::from("timestamp,open,high,low,close,volume\n");
    for (i, close) in closes.iter().enumerate() {
        out.push_str(&format!(
            "{},{c},{c},{c},{c},100\n",
            i as i64 * DAY,
            c = close
        ));
    }
    out
}

pub fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
