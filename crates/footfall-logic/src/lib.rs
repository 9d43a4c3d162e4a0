//! Pure visitor-flow logic for Footfall.
//!
//! This crate contains all dashboard logic that is independent of any
//! window, store, or clock. Functions take plain data and return results,
//! making them unit-testable and portable between the Bevy viewer and the
//! native simtest harness.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`chart`] | State → chart-data shaping for both charts |
//! | [`clock`] | Plain hour/minute moments and axis labels |
//! | [`constants`] | Cave set, tick timing, store key names |
//! | [`flow`] | Per-cave entry/exit parameters and the tick step |
//! | [`history`] | Bounded occupancy time series with backfill |
//! | [`schedule`] | Peak-window and mean-stay display values |
//! | [`tally`] | The two cave→count maps and their invariants |

pub mod chart;
pub mod clock;
pub mod constants;
pub mod flow;
pub mod history;
pub mod schedule;
pub mod tally;
