use thiserror::Error;

use crate::dosing::event::{Field, Route};

/// Errors raised by [crate::dosing::DosingRegistry] operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    /// No event at the given index
    #[error("No dosing input {index} (there are {count})")]
    NoSuchInput { index: usize, count: usize },

    /// The field does not exist on events of this route
    #[error("Field '{field}' does not apply to {route} inputs")]
    NotApplicable { field: Field, route: Route },

    /// The field exists but cannot currently be edited
    #[error("Field '{name}' is not editable")]
    Locked { name: String },

    /// Single-dose mode was requested on a non-oral event
    #[error("Input {index} is an {route} input; single dose applies to oral inputs only")]
    NotOral { index: usize, route: Route },

    /// A form name that does not follow the `<field>-<index>` scheme
    #[error("Unknown dosing field '{0}'")]
    UnknownField(String),

    /// An input title that is not `<hormone>-<route>`
    #[error("Unknown input title '{0}'")]
    UnknownTitle(String),
}
