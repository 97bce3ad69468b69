//! Storage for the (at most two) simulation runs shown on the charts

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::settings::{Quantity, Variant};

/// Duration, in days, shown on the time axis when no run is present
pub const DEFAULT_SIMULATION_DAYS: f64 = 5.0;

/// Display identity of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RunSlot {
    #[default]
    Primary,
    Secondary,
}

impl RunSlot {
    /// Both slots, in selection order
    pub const ALL: [RunSlot; 2] = [RunSlot::Primary, RunSlot::Secondary];

    /// The slot selected after a successful run into `self`
    pub fn next(&self) -> RunSlot {
        match self {
            RunSlot::Primary => RunSlot::Secondary,
            RunSlot::Secondary => RunSlot::Primary,
        }
    }

    fn position(&self) -> usize {
        match self {
            RunSlot::Primary => 0,
            RunSlot::Secondary => 1,
        }
    }

    /// Line colour and dash pattern used to draw this slot
    pub fn style(&self) -> LineStyle {
        match self {
            RunSlot::Primary => LineStyle {
                color: "#619cff",
                dash: None,
            },
            RunSlot::Secondary => LineStyle {
                color: "#00ba38",
                dash: Some("5,3"),
            },
        }
    }
}

impl fmt::Display for RunSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunSlot::Primary => write!(f, "Primary"),
            RunSlot::Secondary => write!(f, "Secondary"),
        }
    }
}

/// Stroke of a run's line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineStyle {
    pub color: &'static str,
    /// SVG dash array, `None` for a solid line
    pub dash: Option<&'static str>,
}

/// One quantity's time course within a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    values: Vec<f64>,
    max_observed: f64,
}

impl Series {
    pub fn new(values: Vec<f64>, max_observed: f64) -> Self {
        Series {
            values,
            max_observed,
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn max_observed(&self) -> f64 {
        self.max_observed
    }
}

/// A complete simulation result
///
/// `times` is the time axis shared by every series of the run, in hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunPayload {
    simulation_duration: f64,
    times: Vec<f64>,
    series: HashMap<Quantity, Series>,
}

impl RunPayload {
    /// Create a payload with no series; add them with [RunPayload::with_series]
    pub fn new(simulation_duration: f64, times: Vec<f64>) -> Self {
        RunPayload {
            simulation_duration,
            times,
            series: HashMap::with_capacity(Quantity::ALL.len()),
        }
    }

    pub fn with_series(mut self, quantity: Quantity, series: Series) -> Self {
        self.series.insert(quantity, series);
        self
    }

    /// Simulated duration in days
    pub fn simulation_duration(&self) -> f64 {
        self.simulation_duration
    }

    /// Sample times in hours
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn series(&self, quantity: Quantity) -> Option<&Series> {
        self.series.get(&quantity)
    }
}

/// Holds the run shown in each slot
///
/// Slots are replaced or cleared wholesale; there is no partial update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStore {
    slots: [Option<RunPayload>; 2],
    variant: Variant,
}

impl RunStore {
    pub fn new(variant: Variant) -> Self {
        RunStore {
            slots: [None, None],
            variant,
        }
    }

    /// Replace a slot; `None` clears it
    pub fn set_run(&mut self, slot: RunSlot, payload: Option<RunPayload>) {
        self.slots[slot.position()] = payload;
    }

    pub fn is_present(&self, slot: RunSlot) -> bool {
        self.slots[slot.position()].is_some()
    }

    pub fn run(&self, slot: RunSlot) -> Option<&RunPayload> {
        self.slots[slot.position()].as_ref()
    }

    /// Slots currently holding a run
    pub fn present_slots(&self) -> impl Iterator<Item = RunSlot> + '_ {
        RunSlot::ALL.into_iter().filter(|slot| self.is_present(*slot))
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Select the simulator variant whose floors apply to [RunStore::max_observed]
    pub fn set_variant(&mut self, variant: Variant) {
        self.variant = variant;
    }

    /// Longest simulated duration over present runs, or
    /// [DEFAULT_SIMULATION_DAYS] when no run is present.
    pub fn max_simulation_duration(&self) -> f64 {
        let longest = self
            .slots
            .iter()
            .flatten()
            .map(|run| run.simulation_duration)
            .fold(0.0, f64::max);
        if longest > 0.0 {
            longest
        } else {
            DEFAULT_SIMULATION_DAYS
        }
    }

    /// Largest value of `quantity` over present runs, never below the
    /// quantity's floor for the active variant.
    pub fn max_observed(&self, quantity: Quantity) -> f64 {
        let floor = quantity.settings().floor(self.variant);
        self.slots
            .iter()
            .flatten()
            .filter_map(|run| run.series(quantity))
            .map(Series::max_observed)
            .fold(floor, f64::max)
    }

    /// Values of `quantity` in the run held by `slot`.
    ///
    /// # Panics
    ///
    /// Panics if `slot` holds no run. Check [RunStore::is_present] first.
    pub fn values(&self, slot: RunSlot, quantity: Quantity) -> &[f64] {
        self.expect_run(slot)
            .series(quantity)
            .map(Series::values)
            .unwrap_or(&[])
    }

    /// Sample times (hours) of the run held by `slot`.
    ///
    /// # Panics
    ///
    /// Panics if `slot` holds no run.
    pub fn times(&self, slot: RunSlot) -> &[f64] {
        self.expect_run(slot).times()
    }

    fn expect_run(&self, slot: RunSlot) -> &RunPayload {
        match self.run(slot) {
            Some(run) => run,
            None => panic!("no run present in the {slot} slot"),
        }
    }
}
