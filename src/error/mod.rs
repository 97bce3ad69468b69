use thiserror::Error;

use crate::dosing::RegistryError;
use crate::form::ValidationError;
use crate::session::{ConfigError, SessionError, SolverError};

#[derive(Error, Debug)]
pub enum ThyrosimError {
    #[error("Error in the dosing inputs: {0}")]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Error talking to the solver: {0}")]
    Solver(#[from] SolverError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("Error in the configuration: {0}")]
    Config(#[from] ConfigError),
}
