pub mod dosing;
pub mod error;
pub mod form;
pub mod graph;
pub mod session;
pub mod settings;

pub use crate::dosing::{DosingEvent, DosingRegistry, Field, Hormone, Route};
pub use crate::form::{Entry, FormSnapshot, FormState};
pub use crate::graph::{ChartController, ChartFrame, ChartRenderer, RunPayload, RunSlot, RunStore};
pub use crate::session::{Scenario, SessionConfig, SessionController, Submission};
pub use crate::settings::{Quantity, Variant};
pub use error::ThyrosimError;

/// Convenience re-exports for building a session front end
pub mod prelude {
    pub mod graph {
        pub use crate::graph::{
            axis_ceiling, range_overlay, AxisDomain, ChartState, LineFrame, Point, RangeOverlay,
            Series, TickFormat, Tooltip,
        };
    }
    pub mod dosing {
        pub use crate::dosing::{parse_field_name, InputAction, InputRow, OralDosing};
    }

    pub use crate::dosing::{DosingEvent, DosingRegistry, Field, Hormone, Route};
    pub use crate::form::{validate, Entry, FormSnapshot, FormState, ValidationError};
    pub use crate::graph::{
        ChartController, ChartFrame, ChartRenderer, RunPayload, RunSlot, RunStore,
    };
    #[cfg(feature = "http")]
    pub use crate::session::HttpSolver;
    pub use crate::session::{
        Notification, Scenario, SessionConfig, SessionController, SessionError, Solver,
        SolverError, SolverResponse, Submission,
    };
    pub use crate::settings::{Quantity, Variant};
    pub use crate::ThyrosimError;
}
