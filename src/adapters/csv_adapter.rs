//! Streaming CSV record source.
//!
//! Layouts, one record per line:
//! - ohlcv: `timestamp,open,high,low,close,volume`
//! - tick: `timestamp,price,volume[,side]` with side 0=BUY, 1=SELL, 2=NONE
//! - single: `timestamp,value`
//!
//! Bad lines never end the stream. They are logged and skipped.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter, Trim};
use tracing::warn;

use crate::domain::error::TzuError;
use crate::domain::record::{MarketRecord, Ohlcv, RecordKind, SingleValue, Tick};
use crate::domain::signal::Side;

/// Lines longer than this many bytes are skipped.
pub const MAX_LINE_LEN: usize = 2048;

pub struct CsvRecordStream<R: Read> {
    records: StringRecordsIntoIter<R>,
    kind: RecordKind,
    skipped: usize,
    done: bool,
}

impl CsvRecordStream<File> {
    pub fn open<P: AsRef<Path>>(
        path: P,
        kind: RecordKind,
        has_header: bool,
    ) -> Result<Self, TzuError> {
        let file = File::open(path)?;
        Ok(Self::from_reader(file, kind, has_header))
    }
}

impl<R: Read> CsvRecordStream<R> {
    pub fn from_reader(reader: R, kind: RecordKind, has_header: bool) -> Self {
        let records = ReaderBuilder::new()
            .has_headers(has_header)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader)
            .into_records();
        CsvRecordStream {
            records,
            kind,
            skipped: 0,
            done: false,
        }
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    /// Number of lines dropped so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl<R: Read> Iterator for CsvRecordStream<R> {
    type Item = MarketRecord;

    fn next(&mut self) -> Option<MarketRecord> {
        while !self.done {
            let record = match self.records.next()? {
                Ok(record) => record,
                Err(err) => {
                    if matches!(err.kind(), csv::ErrorKind::Io(_)) {
                        warn!(error = %err, "read failed, ending stream");
                        self.done = true;
                        return None;
                    }
                    let line = err.position().map(|p| p.line()).unwrap_or(0);
                    warn!(line, error = %err, "skipping unreadable line");
                    self.skipped += 1;
                    continue;
                }
            };

            match parse_record(&record, self.kind) {
                Ok(parsed) => return Some(parsed),
                Err(reason) => {
                    let line = record.position().map(|p| p.line()).unwrap_or(0);
                    warn!(line, reason = %reason, "skipping malformed line");
                    self.skipped += 1;
                }
            }
        }
        None
    }
}

fn line_len(record: &StringRecord) -> usize {
    record.as_slice().len() + record.len().saturating_sub(1)
}

fn field<'a>(record: &'a StringRecord, idx: usize, name: &str) -> Result<&'a str, String> {
    record
        .get(idx)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("missing {name} column"))
}

fn number(record: &StringRecord, idx: usize, name: &str) -> Result<f64, String> {
    let raw = field(record, idx, name)?;
    let value: f64 = raw
        .parse()
        .map_err(|_| format!("invalid {name} value {raw:?}"))?;
    if !value.is_finite() {
        return Err(format!("non-finite {name} value"));
    }
    Ok(value)
}

fn timestamp(record: &StringRecord) -> Result<i64, String> {
    let raw = field(record, 0, "timestamp")?;
    raw.parse()
        .map_err(|_| format!("invalid timestamp {raw:?}"))
}

pub fn parse_record(record: &StringRecord, kind: RecordKind) -> Result<MarketRecord, String> {
    if line_len(record) > MAX_LINE_LEN {
        return Err(format!("line longer than {MAX_LINE_LEN} bytes"));
    }
    let ts = timestamp(record)?;
    let parsed = match kind {
        RecordKind::Ohlcv => MarketRecord::Ohlcv(Ohlcv::new(
            ts,
            number(record, 1, "open")?,
            number(record, 2, "high")?,
            number(record, 3, "low")?,
            number(record, 4, "close")?,
            number(record, 5, "volume")?,
        )),
        RecordKind::Tick => {
            let side = match record.get(3).filter(|s| !s.is_empty()) {
                None => Side::None,
                Some(raw) => raw
                    .parse::<i64>()
                    .ok()
                    .and_then(Side::from_code)
                    .ok_or_else(|| format!("invalid side {raw:?}"))?,
            };
            MarketRecord::Tick(Tick {
                timestamp: ts,
                price: number(record, 1, "price")?,
                volume: number(record, 2, "volume")?,
                side,
            })
        }
        RecordKind::Single => {
            MarketRecord::Single(SingleValue::new(ts, number(record, 1, "value")?))
        }
    };
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn stream(content: &str, kind: RecordKind, has_header: bool) -> CsvRecordStream<&[u8]> {
        CsvRecordStream::from_reader(content.as_bytes(), kind, has_header)
    }

    #[test]
    fn reads_ohlcv_with_header() {
        let csv = "timestamp,open,high,low,close,volume\n\
                   1000,10,12,9,11,500\n\
                   1060,11,13,10,12.5,600\n";
        let records: Vec<MarketRecord> = stream(csv, RecordKind::Ohlcv, true).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0],
            MarketRecord::Ohlcv(Ohlcv::new(1000, 10.0, 12.0, 9.0, 11.0, 500.0))
        );
        assert_eq!(records[1].price(), 12.5);
    }

    #[test]
    fn reads_single_without_header() {
        let records: Vec<MarketRecord> =
            stream("1,10.5\n2, 11.0 \n", RecordKind::Single, false).collect();
        assert_eq!(
            records,
            vec![
                MarketRecord::Single(SingleValue::new(1, 10.5)),
                MarketRecord::Single(SingleValue::new(2, 11.0)),
            ]
        );
    }

    #[test]
    fn tick_side_is_optional() {
        let csv = "1,100.0,5,0\n2,101.0,3,1\n3,102.0,4\n4,103.0,1,2\n";
        let sides: Vec<Side> = stream(csv, RecordKind::Tick, false)
            .map(|r| match r {
                MarketRecord::Tick(t) => t.side,
                other => panic!("unexpected record {other:?}"),
            })
            .collect();
        assert_eq!(sides, vec![Side::Buy, Side::Sell, Side::None, Side::None]);
    }

    #[test]
    fn skips_malformed_and_nan_lines() {
        let csv = "1,10\n\
                   garbage\n\
                   2,abc\n\
                   3,NaN\n\
                   x,12\n\
                   4,13\n";
        let mut s = stream(csv, RecordKind::Single, false);
        let timestamps: Vec<i64> = s.by_ref().map(|r| r.timestamp()).collect();
        assert_eq!(timestamps, vec![1, 4]);
        assert_eq!(s.skipped(), 4);
    }

    #[test]
    fn skips_short_ohlcv_and_bad_tick_side() {
        let records: Vec<MarketRecord> =
            stream("1,10,11,9\n2,10,11,9,10,100\n", RecordKind::Ohlcv, false).collect();
        assert_eq!(records.len(), 1);

        let records: Vec<MarketRecord> =
            stream("1,10,1,7\n2,10,1,1\n", RecordKind::Tick, false).collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].timestamp(), 2);
    }

    #[test]
    fn skips_overlong_lines() {
        let long = format!("1,{}\n2,5\n", "9".repeat(MAX_LINE_LEN));
        let records: Vec<MarketRecord> = stream(&long, RecordKind::Single, false).collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].timestamp(), 2);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert_eq!(stream("", RecordKind::Ohlcv, true).count(), 0);
        assert_eq!(stream("a,b\n", RecordKind::Single, true).count(), 0);
    }

    #[test]
    fn open_reads_file_and_reports_missing() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "ts,value\n1,2.0\n2,3.0\n").unwrap();
        let s = CsvRecordStream::open(file.path(), RecordKind::Single, true).unwrap();
        assert_eq!(s.kind(), RecordKind::Single);
        assert_eq!(s.count(), 2);

        let missing = CsvRecordStream::open("/nonexistent/data.csv", RecordKind::Single, true);
        assert!(matches!(missing, Err(TzuError::Io(_))));
    }
}
