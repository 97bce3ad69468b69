//! Chart state: stored runs, axis scaling and the chart lifecycle
//!
//! - [scale] holds the pure numeric helpers (axis ceiling, normal-range band,
//!   tick labels).
//! - [runs] stores the simulation result shown in each of the two run slots.
//! - [chart] turns stored runs into frames for an external renderer.

pub mod chart;
pub mod runs;
pub mod scale;

pub use chart::{
    AxisDomain, ChartController, ChartFrame, ChartRenderer, ChartState, HorizontalAnchor,
    LineFrame, Point, Tooltip, VerticalAnchor,
};
pub use runs::{LineStyle, RunPayload, RunSlot, RunStore, Series, DEFAULT_SIMULATION_DAYS};
pub use scale::{axis_ceiling, range_overlay, RangeOverlay, TickFormat};
