// src/services/clock.rs
//! Calendar/instant collaborator. The engine never reads wall-clock time
//! directly; everything time-dependent goes through this seam so tests can
//! drive the day boundary and the combo/undo windows deterministically.

use chrono::{NaiveDate, Utc};
use std::cell::Cell;
use std::rc::Rc;

pub trait Clock {
    /// Current calendar day (UTC, no time-of-day component).
    fn today(&self) -> NaiveDate;
    /// Current instant in epoch milliseconds, for combo/undo timing.
    fn now_ms(&self) -> i64;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }

    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Hand-cranked clock, primarily for tests/tools. Clones share the same
/// underlying time, so a handle kept by the test keeps steering a clock
/// that was handed to the engine.
#[derive(Clone)]
pub struct ManualClock {
    today: Rc<Cell<NaiveDate>>,
    now_ms: Rc<Cell<i64>>,
}

impl ManualClock {
    pub fn new(today: NaiveDate, now_ms: i64) -> Self {
        Self {
            today: Rc::new(Cell::new(today)),
            now_ms: Rc::new(Cell::new(now_ms)),
        }
    }

    pub fn set_today(&self, day: NaiveDate) {
        self.today.set(day);
    }

    pub fn advance_ms(&self, delta: i64) {
        self.now_ms.set(self.now_ms.get() + delta);
    }
}

impl Clock for ManualClock {
    fn today(&self) -> NaiveDate {
        self.today.get()
    }

    fn now_ms(&self) -> i64 {
        self.now_ms.get()
    }
}
