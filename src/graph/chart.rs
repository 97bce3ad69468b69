//! Per-quantity chart lifecycle and the frames handed to the renderer
//!
//! The controller derives an [AxisDomain] from the [RunStore] on every redraw
//! and hands a [ChartFrame] to a [ChartRenderer]. The first render of a chart
//! builds its structure; later renders only update it in place.

use std::collections::HashMap;

use crate::graph::runs::{LineStyle, RunSlot, RunStore};
use crate::graph::scale::{axis_ceiling, range_overlay, RangeOverlay, TickFormat};
use crate::settings::Quantity;

/// Source times are in hours, the time axis is in days
const HOURS_PER_DAY: f64 = 24.0;

/// Beyond this fraction of the time axis the tooltip opens to the left
const TOOLTIP_FLIP_X: f64 = 0.71;

/// Below this fraction of the value axis the tooltip opens upwards
const TOOLTIP_FLIP_Y: f64 = 0.31;

/// Upper bounds of a chart's axes. Both axes start at zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisDomain {
    /// Time axis end, in days
    pub x_max: f64,
    /// Value axis ceiling
    pub y_max: f64,
}

impl AxisDomain {
    /// Compute the domain of `quantity` from the runs currently stored
    pub fn derive(store: &RunStore, quantity: Quantity) -> Self {
        AxisDomain {
            x_max: store.max_simulation_duration(),
            y_max: axis_ceiling(store.max_observed(quantity)),
        }
    }

    /// Time axis end, in hours
    pub fn x_max_hours(&self) -> f64 {
        self.x_max * HOURS_PER_DAY
    }
}

/// A plotted point: time in days, value in the quantity's unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// The line (and hover markers) of one run slot
#[derive(Debug, Clone, PartialEq)]
pub struct LineFrame {
    pub slot: RunSlot,
    pub style: LineStyle,
    /// Empty when the slot holds no run
    pub points: Vec<Point>,
}

/// Everything the renderer needs to draw one chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartFrame {
    pub quantity: Quantity,
    /// Side title, e.g. `FT4 ng/L`
    pub title: String,
    /// Only the bottom chart shows time tick labels and the "Days" label
    pub show_time_labels: bool,
    pub domain: AxisDomain,
    pub value_ticks: TickFormat,
    pub overlay: RangeOverlay,
    /// One entry per slot, in slot order
    pub lines: Vec<LineFrame>,
}

/// External drawing boundary
///
/// Implementations own whatever retained structure they draw into. `init`
/// is called exactly once per chart, before any `update` of that chart.
pub trait ChartRenderer {
    /// Build the chart's axes, border, per-slot placeholders and range band
    fn init(&mut self, frame: &ChartFrame);

    /// Update an initialized chart in place
    fn update(&mut self, frame: &ChartFrame);

    /// Show or hide the normal-range band on every chart
    fn set_range_visible(&mut self, visible: bool);
}

/// Lifecycle of a single chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartState {
    #[default]
    Uninitialized,
    Live,
}

/// Horizontal side of the pointer the tooltip opens on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalAnchor {
    Right,
    Left,
}

/// Vertical side of the pointer the tooltip opens on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAnchor {
    Below,
    Above,
}

/// Hover information for a data point
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub quantity: Quantity,
    pub value: f64,
    /// Elapsed time in days
    pub time: f64,
    pub horizontal: HorizontalAnchor,
    pub vertical: VerticalAnchor,
}

impl Tooltip {
    /// Place a tooltip for `point` so it stays inside a chart spanning `domain`
    pub fn at(quantity: Quantity, point: Point, domain: AxisDomain) -> Self {
        let horizontal = if point.x > TOOLTIP_FLIP_X * domain.x_max {
            HorizontalAnchor::Left
        } else {
            HorizontalAnchor::Right
        };
        let vertical = if point.y < TOOLTIP_FLIP_Y * domain.y_max {
            VerticalAnchor::Above
        } else {
            VerticalAnchor::Below
        };
        Tooltip {
            quantity,
            value: point.y,
            time: point.x,
            horizontal,
            vertical,
        }
    }

    /// Two lines: the value and the elapsed time, both to two decimals
    pub fn text(&self) -> String {
        format!("{}: {:.2}\nTime: {:.2}", self.quantity, self.value, self.time)
    }
}

/// Drives the five hormone charts
pub struct ChartController<R: ChartRenderer> {
    renderer: R,
    states: HashMap<Quantity, ChartState>,
    range_visible: bool,
}

impl<R: ChartRenderer> ChartController<R> {
    pub fn new(renderer: R) -> Self {
        ChartController {
            renderer,
            states: HashMap::with_capacity(Quantity::ALL.len()),
            range_visible: true,
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn state(&self, quantity: Quantity) -> ChartState {
        self.states.get(&quantity).copied().unwrap_or_default()
    }

    pub fn range_visible(&self) -> bool {
        self.range_visible
    }

    /// Build the frame for `quantity` from the current runs
    pub fn frame(&self, store: &RunStore, quantity: Quantity) -> ChartFrame {
        let settings = quantity.settings();
        let range = settings.range(store.variant());
        let domain = AxisDomain::derive(store, quantity);

        let lines = RunSlot::ALL
            .into_iter()
            .map(|slot| LineFrame {
                slot,
                style: slot.style(),
                points: points(store, slot, quantity),
            })
            .collect();

        ChartFrame {
            quantity,
            title: format!("{} {}", quantity, settings.unit()),
            show_time_labels: quantity == Quantity::TSH,
            domain,
            value_ticks: TickFormat::for_ceiling(domain.y_max),
            overlay: range_overlay(domain.y_max, range.hi, range.lo),
            lines,
        }
    }

    /// Draw one chart, initializing it on first use
    pub fn render(&mut self, store: &RunStore, quantity: Quantity) {
        let frame = self.frame(store, quantity);
        match self.state(quantity) {
            ChartState::Uninitialized => {
                tracing::debug!(%quantity, y_max = frame.domain.y_max, "initializing chart");
                self.renderer.init(&frame);
                self.renderer.set_range_visible(self.range_visible);
                self.states.insert(quantity, ChartState::Live);
            }
            ChartState::Live => {
                tracing::debug!(%quantity, y_max = frame.domain.y_max, "updating chart");
                self.renderer.update(&frame);
            }
        }
    }

    /// Draw every chart, top to bottom
    pub fn render_all(&mut self, store: &RunStore) {
        for quantity in Quantity::ALL {
            self.render(store, quantity);
        }
    }

    /// Flip the visibility of the normal-range band on all charts
    pub fn toggle_range(&mut self) -> bool {
        self.range_visible = !self.range_visible;
        self.renderer.set_range_visible(self.range_visible);
        self.range_visible
    }

    /// Tooltip for the `index`-th point of `slot`'s line on the `quantity` chart.
    ///
    /// Returns `None` when the slot is empty or the index is out of bounds.
    pub fn tooltip(
        &self,
        store: &RunStore,
        quantity: Quantity,
        slot: RunSlot,
        index: usize,
    ) -> Option<Tooltip> {
        if !store.is_present(slot) {
            return None;
        }
        let value = *store.values(slot, quantity).get(index)?;
        let hours = *store.times(slot).get(index)?;
        let point = Point {
            x: hours / HOURS_PER_DAY,
            y: value,
        };
        Some(Tooltip::at(quantity, point, AxisDomain::derive(store, quantity)))
    }
}

fn points(store: &RunStore, slot: RunSlot, quantity: Quantity) -> Vec<Point> {
    if !store.is_present(slot) {
        return Vec::new();
    }
    store
        .times(slot)
        .iter()
        .zip(store.values(slot, quantity))
        .map(|(hours, value)| Point {
            x: hours / HOURS_PER_DAY,
            y: *value,
        })
        .collect()
}
