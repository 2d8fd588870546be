use crate::dates::format_date;
use crate::model::ActivityData;
use crate::schedule::Interval;
use crate::storage::ActivityStore;
use anyhow::Result;
use chrono::NaiveDate;
use log::{debug, info};
use std::time::{Duration, Instant};

pub const SAVE_INTERVAL: Duration = Duration::from_secs(60);

/// Owns the live activity map and writes it back on a fixed interval.
///
/// All mutation goes through `&mut self`, so increments and saves never
/// interleave.
pub struct Tracker<S: ActivityStore> {
    store: S,
    data: ActivityData,
    dirty: bool,
    save_timer: Interval,
}

impl<S: ActivityStore> Tracker<S> {
    pub fn open(store: S, now: Instant) -> Result<Self> {
        let data = store.load()?;
        Ok(Tracker {
            store,
            data,
            dirty: false,
            save_timer: Interval::new(SAVE_INTERVAL, now),
        })
    }

    pub fn data(&self) -> &ActivityData {
        &self.data
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn record_events(&mut self, today: NaiveDate, events: u32) {
        if events == 0 {
            return;
        }
        let key = format_date(&today);
        self.data.add(&key, events);
        self.dirty = true;
        debug!("recorded {} activity event(s) on {}", events, key);
    }

    /// Saves when the interval has elapsed and there is something to write.
    /// Returns whether a save happened. A failed save keeps the data dirty,
    /// so the next interval tries again.
    pub fn tick(&mut self, now: Instant) -> Result<bool> {
        if !self.save_timer.fire(now) || !self.dirty {
            return Ok(false);
        }
        self.flush()?;
        Ok(true)
    }

    pub fn next_save_in(&self, now: Instant) -> Duration {
        self.save_timer.remaining(now)
    }

    pub fn flush(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        self.store.save(&self.data)?;
        self.dirty = false;
        info!("saved activity data ({} day(s))", self.data.len());
        Ok(())
    }

    /// Stops periodic saving and writes any pending changes.
    pub fn close(mut self) -> Result<()> {
        self.save_timer.cancel();
        self.flush()
    }
}
