//! Streaming technical indicators.
//!
//! Every indicator implements [`Indicator`]: `update` consumes one value and
//! returns the new output, `get` returns the last output without side effects,
//! `reset` returns it to its warm-up state.
//! Outputs are NaN until the indicator has warmed up, and NaN propagates
//! through composed indicators (e.g. MACD over two EMAs).
//!
//! - [`RingBuffer`]: fixed-capacity circular storage shared by the windowed indicators
//! - [`History`] / [`Tracked`]: bounded look-back over past outputs

pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod mom;
pub mod mvar;
pub mod roc;
pub mod rsi;
pub mod sma;
pub mod stddev;

pub use atr::Atr;
pub use bollinger::{Bollinger, BollingerValue};
pub use ema::Ema;
pub use macd::{Macd, MacdValue};
pub use mom::Mom;
pub use mvar::MVar;
pub use roc::Roc;
pub use rsi::Rsi;
pub use sma::Sma;
pub use stddev::MStdDev;

use crate::domain::error::TzuError;

/// Uniform update/get contract for all indicators.
pub trait Indicator {
    type Input;
    type Output: Copy;

    fn update(&mut self, value: Self::Input) -> Self::Output;

    fn get(&self) -> Self::Output;

    /// Drop all accumulated state, as if freshly constructed.
    fn reset(&mut self);
}

/// Single-value moving averages that can be built from a period alone.
pub trait MovingAverage: Indicator<Input = f64, Output = f64> + Sized {
    fn with_period(period: usize) -> Result<Self, TzuError>;
}

pub(crate) fn check_period(name: &str, period: usize) -> Result<(), TzuError> {
    if period == 0 {
        return Err(TzuError::invalid(name, "must be at least 1"));
    }
    Ok(())
}

/// Fixed-capacity circular buffer. Pushing into a full buffer evicts the oldest value.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    data: Vec<T>,
    pos: usize,
    len: usize,
}

impl<T: Copy + Default> RingBuffer<T> {
    /// `capacity` must be non-zero; callers validate their periods first.
    pub fn new(capacity: usize) -> Self {
        RingBuffer {
            data: vec![T::default(); capacity.max(1)],
            pos: 0,
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.data.len()
    }

    /// Store `value`, returning the evicted value once the buffer is full.
    pub fn push(&mut self, value: T) -> Option<T> {
        let evicted = if self.is_full() {
            Some(self.data[self.pos])
        } else {
            self.len += 1;
            None
        };
        self.data[self.pos] = value;
        self.pos = (self.pos + 1) % self.data.len();
        evicted
    }

    /// Value pushed `n` pushes ago; 0 is the most recent.
    pub fn ago(&self, n: usize) -> Option<T> {
        if n >= self.len {
            return None;
        }
        let cap = self.data.len();
        Some(self.data[(self.pos + cap - 1 - n) % cap])
    }

    /// Stored values in storage order (not chronological once wrapped).
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data[..self.len].iter()
    }

    pub fn clear(&mut self) {
        self.pos = 0;
        self.len = 0;
    }
}

/// Bounded look-back over the last `depth` values.
#[derive(Debug, Clone)]
pub struct History<T> {
    buffer: RingBuffer<T>,
}

impl<T: Copy + Default> History<T> {
    pub fn new(depth: usize) -> Result<Self, TzuError> {
        check_period("depth", depth)?;
        Ok(History {
            buffer: RingBuffer::new(depth),
        })
    }

    pub fn record(&mut self, value: T) {
        self.buffer.push(value);
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn depth(&self) -> usize {
        self.buffer.capacity()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Value recorded `n` updates ago (0 = latest).
    ///
    /// Asking beyond the retained window is a caller bug and reported as
    /// [`TzuError::OutOfRange`].
    pub fn ago(&self, n: usize) -> Result<T, TzuError> {
        self.buffer.ago(n).ok_or(TzuError::OutOfRange {
            index: n,
            len: self.buffer.len(),
        })
    }
}

/// Wraps an indicator and keeps its last `depth` outputs.
#[derive(Debug, Clone)]
pub struct Tracked<I: Indicator> {
    inner: I,
    history: History<I::Output>,
}

impl<I> Tracked<I>
where
    I: Indicator,
    I::Output: Default,
{
    pub fn new(inner: I, depth: usize) -> Result<Self, TzuError> {
        Ok(Tracked {
            inner,
            history: History::new(depth)?,
        })
    }

    pub fn ago(&self, n: usize) -> Result<I::Output, TzuError> {
        self.history.ago(n)
    }

    pub fn history(&self) -> &History<I::Output> {
        &self.history
    }

    pub fn inner(&self) -> &I {
        &self.inner
    }
}

impl<I> Indicator for Tracked<I>
where
    I: Indicator,
    I::Output: Default,
{
    type Input = I::Input;
    type Output = I::Output;

    fn update(&mut self, value: I::Input) -> I::Output {
        let out = self.inner.update(value);
        self.history.record(out);
        out
    }

    fn get(&self) -> I::Output {
        self.inner.get()
    }

    fn reset(&mut self) {
        self.inner.reset();
        self.history.clear();
    }
}
