//! Sync progress: how far the checker is from the remote tip and how long
//! it should take to get there.
//!
//! Everything is computed on `BigRational` and only converted to `f64` for
//! display, since block and elapsed-time counters are unbounded.

use num_bigint::{BigInt, Sign};
use num_rational::BigRational;
use num_traits::{ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use tracing::{debug, warn};

use crate::counters::{Counter, CounterSource};

/// Point-in-time estimate of sync progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncProgress {
    /// Blocks processed minus blocks orphaned.
    pub blocks: i64,
    /// Current remote tip index.
    pub tip: i64,
    /// Percent of the tip synced.
    pub completed: f64,
    /// Blocks per second.
    pub rate: f64,
    /// Estimated time to reach the tip, e.g. `1h2m3.5s`.
    pub time_remaining: String,
}

/// Estimate progress towards `tip`.
///
/// `None` means "too early to say", never an error:
/// - the tip could not be fetched,
/// - no block has been processed yet (or orphans cancel them out),
/// - nothing is left to sync,
/// - no time has elapsed yet,
/// - a counter could not be read.
pub fn compute_progress<E: Display>(
    tip: Result<i64, E>,
    counters: &dyn CounterSource,
) -> Option<SyncProgress> {
    let tip = match tip {
        Ok(t) => t,
        Err(e) => {
            warn!(error = %e, "cannot get network status");
            return None;
        }
    };

    let blocks = read(counters, Counter::Blocks)?;
    if blocks.is_zero() {
        return None;
    }

    let orphans = read(counters, Counter::Orphans)?;
    let adjusted = blocks - orphans;
    if adjusted.sign() != Sign::Plus {
        debug!(%adjusted, "no canonical blocks yet");
        return None;
    }

    let remaining = BigInt::from(tip) - &adjusted;
    if remaining.sign() != Sign::Plus {
        return None;
    }

    let elapsed = read(counters, Counter::TimeElapsed)?;
    if elapsed.sign() != Sign::Plus {
        return None;
    }

    let rate = BigRational::new(adjusted.clone(), elapsed);
    let completed =
        BigRational::new(adjusted.clone(), BigInt::from(tip)) * BigRational::from_integer(100.into());
    let seconds_left = BigRational::from_integer(remaining) / &rate;

    let blocks = match i64::try_from(&adjusted) {
        Ok(b) => b,
        Err(_) => {
            warn!(%adjusted, "adjusted block count does not fit in i64");
            return None;
        }
    };

    Some(SyncProgress {
        blocks,
        tip,
        completed: completed.to_f64().unwrap_or(f64::NAN),
        rate: rate.to_f64().unwrap_or(f64::NAN),
        time_remaining: format_time_remaining(&seconds_left),
    })
}

fn read(counters: &dyn CounterSource, counter: Counter) -> Option<BigInt> {
    match counters.get(counter) {
        Ok(v) => Some(v),
        Err(e) => {
            warn!(%counter, error = %e, "cannot get counter");
            None
        }
    }
}

/// Render seconds as `XhYmZs`, dropping leading zero units and keeping up
/// to millisecond precision: `2h0m5s`, `3m12.5s`, `45s`, `250ms`, `0s`.
/// Anything that rounds to under one millisecond renders as `0s`.
pub fn format_time_remaining(seconds: &BigRational) -> String {
    let millis = (seconds * BigRational::from_integer(1000.into()))
        .round()
        .to_integer();

    if millis.sign() != Sign::Plus {
        return "0s".to_string();
    }
    if millis < BigInt::from(1000) {
        return format!("{millis}ms");
    }

    let total_secs: BigInt = &millis / 1000u32;
    let frac_ms = (&millis % 1000u32).to_u32().unwrap_or(0);
    let hours: BigInt = &total_secs / 3600u32;
    let minutes: BigInt = (&total_secs % 3600u32) / 60u32;
    let secs: BigInt = &total_secs % 60u32;

    let secs = if frac_ms == 0 {
        secs.to_string()
    } else {
        let frac = format!("{frac_ms:03}");
        format!("{secs}.{}", frac.trim_end_matches('0'))
    };

    if hours.is_zero() && minutes.is_zero() {
        format!("{secs}s")
    } else if hours.is_zero() {
        format!("{minutes}m{secs}s")
    } else {
        format!("{hours}h{minutes}m{secs}s")
    }
}
