//! Dosing inputs
//!
//! A [DosingRegistry] keeps the oral, IV and infusion events the user has
//! configured. Events are numbered contiguously from 1; every name that
//! refers to an event (`dose-2`, `Input 2 (T4-Oral)`, ...) is derived from
//! that number when needed.

mod error;
mod event;
mod registry;

pub use error::RegistryError;
pub use event::{parse_field_name, DosingEvent, Field, Hormone, Route};
pub use registry::{DosingRegistry, FieldView, InputAction, InputRow, OralDosing};
