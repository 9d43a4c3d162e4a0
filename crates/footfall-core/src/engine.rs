//! Dashboard engine - the owned application state behind every handler.

use std::collections::BTreeMap;

use log::warn;
use rand::Rng;
use serde::{Deserialize, Serialize};

use footfall_logic::clock::Moment;
use footfall_logic::constants::{CAVE_KEYS, CUMULATIVE_KEY, OCCUPANCY_KEY, TICK_INTERVAL_SECS};
use footfall_logic::flow::{self, FlowParams};
use footfall_logic::history::History;
use footfall_logic::schedule;
use footfall_logic::tally::Tally;

use crate::persistence::{load_counts, save_counts, StateStore};

/// Totals exposed to consumers outside the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaveSnapshot {
    /// All-time entries across all caves.
    pub total_visits: u64,
    /// Visitors inside across all caves right now.
    pub current_visitors: u64,
}

/// The dashboard's state: tallies, time series, per-cave flow parameters,
/// and the tick scheduler.
///
/// Every mutation funnels through a method here; nothing lives in
/// globals. Dropping the engine cancels the scheduled tick with it.
pub struct Engine {
    /// Per-cave counters behind both charts.
    pub tally: Tally,
    /// Occupancy time series behind the flow chart.
    pub history: History,
    /// Per-cave flow behavior, sampled once at startup.
    params: BTreeMap<String, FlowParams>,
    store: Box<dyn StateStore>,

    // Tick scheduling
    since_tick: f32,
    paused: bool,
    time_scale: f32,

    avg_stay_minutes: u32,
}

impl Engine {
    /// Restore counters from `store`, sample per-cave flow parameters,
    /// and seed the time series with synthetic history ending at `now`.
    pub fn new(store: Box<dyn StateStore>, now: Moment) -> Self {
        let mut rng = rand::thread_rng();
        let params = CAVE_KEYS
            .iter()
            .map(|&key| (key.to_string(), FlowParams::from_rolls(rng.gen(), rng.gen())))
            .collect();
        Self::with_params(store, now, params)
    }

    /// Like [`Engine::new`] but with caller-chosen flow parameters, for
    /// tests and the headless harness.
    pub fn with_params(
        store: Box<dyn StateStore>,
        now: Moment,
        params: BTreeMap<String, FlowParams>,
    ) -> Self {
        let tally = Tally::from_parts(
            load_counts(store.as_ref(), CUMULATIVE_KEY),
            load_counts(store.as_ref(), OCCUPANCY_KEY),
        );

        let mut history = History::new();
        history.backfill(now, tally.total_occupancy());

        let stays: Vec<FlowParams> = params.values().copied().collect();
        let avg_stay_minutes = schedule::average_stay_minutes(&stays);

        let mut engine = Self {
            tally,
            history,
            params,
            store,
            since_tick: 0.0,
            paused: false,
            time_scale: 1.0,
            avg_stay_minutes,
        };

        // Write the normalized maps straight back so a partial or
        // malformed store heals on startup
        engine.persist();
        engine
    }

    /// Feed `delta_secs` of real time into the scheduler, firing one flow
    /// tick once five scaled seconds have accumulated. Does nothing while
    /// paused.
    pub fn advance(&mut self, delta_secs: f32, now: Moment) {
        if self.paused {
            return;
        }
        self.since_tick += delta_secs * self.time_scale;
        if self.since_tick >= TICK_INTERVAL_SECS {
            self.since_tick = 0.0;
            self.tick(now);
        }
    }

    /// Run one visitor-flow tick: roll entry/exit for every cave, sample
    /// the new total into the time series, and persist both maps.
    pub fn tick(&mut self, now: Moment) {
        let mut rng = rand::thread_rng();
        for (cave, params) in &self.params {
            let occupancy = self.tally.occupancy_of(cave);
            let outcome = flow::step(params, occupancy, rng.gen(), rng.gen());
            self.tally.apply(cave, outcome);
        }
        self.history.record(now, self.tally.total_occupancy());
        self.persist();
    }

    /// Register one hotspot click for `cave`: cumulative and occupancy
    /// both up by one, persisted immediately. Unknown keys leave the
    /// state untouched and report false.
    pub fn record_entry(&mut self, cave: &str) -> bool {
        if !self.tally.record_entry(cave) {
            return false;
        }
        self.persist();
        true
    }

    /// Re-read both maps from the store, normalizing to the fixed cave
    /// set. Called when the window regains focus so external edits show
    /// up without a restart.
    pub fn refresh_from_store(&mut self) {
        self.tally = Tally::from_parts(
            load_counts(self.store.as_ref(), CUMULATIVE_KEY),
            load_counts(self.store.as_ref(), OCCUPANCY_KEY),
        );
    }

    /// Totals for external consumers.
    pub fn snapshot(&self) -> CaveSnapshot {
        CaveSnapshot {
            total_visits: self.tally.total_visits(),
            current_visitors: self.tally.total_occupancy(),
        }
    }

    /// Mean advertised stay across the caves, in minutes.
    pub fn average_stay_minutes(&self) -> u32 {
        self.avg_stay_minutes
    }

    /// Flow parameters for `cave`, if tracked.
    pub fn params_for(&self, cave: &str) -> Option<&FlowParams> {
        self.params.get(cave)
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    /// Pause or resume the tick scheduler. Pausing clears the accumulator
    /// so resuming waits a full interval.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
        if paused {
            self.since_tick = 0.0;
        }
    }

    pub fn toggle_paused(&mut self) {
        let paused = !self.paused;
        self.set_paused(paused);
    }

    /// Set time scale (1.0 = real-time, 2.0 = 2x speed, etc.)
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Best-effort write of both maps; store failures warn and move on.
    fn persist(&mut self) {
        if let Err(e) = save_counts(self.store.as_mut(), CUMULATIVE_KEY, &self.tally.cumulative) {
            warn!("failed to persist '{}': {}", CUMULATIVE_KEY, e);
        }
        if let Err(e) = save_counts(self.store.as_mut(), OCCUPANCY_KEY, &self.tally.occupancy) {
            warn!("failed to persist '{}': {}", OCCUPANCY_KEY, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use footfall_logic::constants::MAX_SAMPLES;

    fn fixed_params() -> BTreeMap<String, FlowParams> {
        CAVE_KEYS
            .iter()
            .map(|&key| (key.to_string(), FlowParams::from_rolls(0.5, 0.5)))
            .collect()
    }

    #[test]
    fn test_engine_starts_zeroed_with_seeded_history() {
        let engine = Engine::new(Box::new(MemoryStore::new()), Moment::new(14, 0));
        let snap = engine.snapshot();
        assert_eq!(snap.total_visits, 0);
        assert_eq!(snap.current_visitors, 0);
        // Chart opens with a full synthetic window
        assert_eq!(engine.history.len(), MAX_SAMPLES);
    }

    #[test]
    fn test_engine_restores_persisted_counts() {
        let mut store = MemoryStore::new();
        store
            .put(CUMULATIVE_KEY, r#"{"17": 10, "18": 4}"#)
            .unwrap();
        store.put(OCCUPANCY_KEY, r#"{"17": 2}"#).unwrap();

        let engine = Engine::new(Box::new(store), Moment::new(9, 0));
        assert_eq!(engine.tally.visits_of("17"), 10);
        assert_eq!(engine.tally.visits_of("18"), 4);
        assert_eq!(engine.tally.visits_of("19"), 0);
        assert_eq!(engine.snapshot().current_visitors, 2);
    }

    #[test]
    fn test_malformed_store_heals_on_startup() {
        let store = MemoryStore::new();
        let mut writer = store.clone();
        writer.put(CUMULATIVE_KEY, "{{{ garbage").unwrap();

        let engine = Engine::new(Box::new(store.clone()), Moment::new(9, 0));
        assert_eq!(engine.snapshot().total_visits, 0);

        // Startup persisted the zeroed maps back over the garbage
        let healed = load_counts(&store, CUMULATIVE_KEY);
        assert_eq!(healed.len(), CAVE_KEYS.len());
        assert!(healed.values().all(|&v| v == 0));
    }

    #[test]
    fn test_tick_keeps_invariants() {
        let mut engine = Engine::with_params(
            Box::new(MemoryStore::new()),
            Moment::new(14, 0),
            fixed_params(),
        );

        let mut last_total_visits = engine.snapshot().total_visits;
        for minute in 0..200u32 {
            engine.tick(Moment::new(14, (minute % 60) as u8));

            let snap = engine.snapshot();
            // Cumulative never decreases
            assert!(snap.total_visits >= last_total_visits);
            last_total_visits = snap.total_visits;

            // Chart total equals the per-cave sum
            assert_eq!(engine.history.latest().unwrap().value, snap.current_visitors);

            // Series stays bounded
            assert!(engine.history.len() <= MAX_SAMPLES);
        }
    }

    #[test]
    fn test_record_entry_updates_and_persists() {
        let store = MemoryStore::new();
        let mut engine = Engine::with_params(
            Box::new(store.clone()),
            Moment::new(14, 0),
            fixed_params(),
        );

        assert!(engine.record_entry("19"));
        assert!(!engine.record_entry("99"));

        let snap = engine.snapshot();
        assert_eq!(snap.total_visits, 1);
        assert_eq!(snap.current_visitors, 1);

        let persisted = load_counts(&store, CUMULATIVE_KEY);
        assert_eq!(persisted["19"], 1);
    }

    #[test]
    fn test_advance_fires_on_interval() {
        let mut engine = Engine::with_params(
            Box::new(MemoryStore::new()),
            Moment::new(14, 0),
            fixed_params(),
        );
        assert_eq!(engine.history.latest().unwrap().label, "14:00");

        // Four seconds: not yet
        engine.advance(4.0, Moment::new(14, 1));
        assert_eq!(engine.history.latest().unwrap().label, "14:00");

        // One more second crosses the five-second interval
        engine.advance(1.0, Moment::new(14, 1));
        assert_eq!(engine.history.latest().unwrap().label, "14:01");
    }

    #[test]
    fn test_advance_respects_pause() {
        let mut engine = Engine::with_params(
            Box::new(MemoryStore::new()),
            Moment::new(14, 0),
            fixed_params(),
        );

        engine.set_paused(true);
        engine.advance(60.0, Moment::new(15, 0));
        assert_eq!(engine.history.latest().unwrap().label, "14:00");

        engine.set_paused(false);
        engine.advance(5.0, Moment::new(15, 0));
        assert_eq!(engine.history.latest().unwrap().label, "15:00");
    }

    #[test]
    fn test_advance_respects_time_scale() {
        let mut engine = Engine::with_params(
            Box::new(MemoryStore::new()),
            Moment::new(14, 0),
            fixed_params(),
        );

        engine.set_time_scale(2.0);
        engine.advance(2.5, Moment::new(14, 2)); // 5 scaled seconds
        assert_eq!(engine.history.latest().unwrap().label, "14:02");
    }

    #[test]
    fn test_refresh_from_store_picks_up_external_writes() {
        let store = MemoryStore::new();
        let mut engine = Engine::with_params(
            Box::new(store.clone()),
            Moment::new(14, 0),
            fixed_params(),
        );
        assert_eq!(engine.snapshot().total_visits, 0);

        let mut writer = store.clone();
        writer.put(CUMULATIVE_KEY, r#"{"20": 77}"#).unwrap();
        writer.put(OCCUPANCY_KEY, r#"{"20": 3, "bogus": 9}"#).unwrap();

        engine.refresh_from_store();
        let snap = engine.snapshot();
        assert_eq!(snap.total_visits, 77);
        // Unknown key dropped, known key kept
        assert_eq!(snap.current_visitors, 3);
    }

    #[test]
    fn test_snapshot_serializes_to_json() {
        let engine = Engine::new(Box::new(MemoryStore::new()), Moment::new(14, 0));
        let json = serde_json::to_string(&engine.snapshot()).unwrap();
        assert!(json.contains("total_visits"));
        assert!(json.contains("current_visitors"));
    }

    #[test]
    fn test_average_stay_within_sampled_range() {
        let engine = Engine::new(Box::new(MemoryStore::new()), Moment::new(14, 0));
        let avg = engine.average_stay_minutes();
        assert!((10..=20).contains(&avg), "avg={}", avg);
    }
}
