//! The remote solver boundary
//!
//! The solver receives the flat form snapshot and answers with a JSON object:
//!
//! ```json
//! {
//!   "simTime": 5,
//!   "data": {
//!     "t":   { "values": [0, 1, 2] },
//!     "ft4": { "values": [15.1, 15.3, 15.2], "max": 15.3 },
//!     ...
//!   }
//! }
//! ```
//!
//! Compartment keys (`ft4`, `ft3`, `1`, `4`, `7`) map one-to-one onto
//! [Quantity]; `t` is the time axis in hours.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::form::FormSnapshot;
use crate::graph::{RunPayload, Series};
use crate::settings::Quantity;

/// Key of the shared time axis in a solver response
const TIME_KEY: &str = "t";

/// Failures of a solver round trip
#[derive(Error, Debug)]
pub enum SolverError {
    /// No answer within the client-side timeout
    #[error("Solver request timed out")]
    Timeout,

    /// Connection-level failure
    #[error("Solver transport error: {0}")]
    Transport(String),

    /// The solver answered with a non-success status
    #[error("Solver responded with HTTP status {0}")]
    Status(u16),

    /// The response body is not the expected JSON
    #[error("Failed to parse solver response: {0}")]
    Parse(#[from] serde_json::Error),

    /// A required compartment is missing from the response
    #[error("Solver response has no '{0}' compartment")]
    MissingCompartment(String),
}

/// Anything able to run a simulation for a submitted form
pub trait Solver {
    fn solve(&mut self, request: &FormSnapshot) -> Result<SolverResponse, SolverError>;
}

impl<S: Solver + ?Sized> Solver for Box<S> {
    fn solve(&mut self, request: &FormSnapshot) -> Result<SolverResponse, SolverError> {
        (**self).solve(request)
    }
}

/// One compartment's time course as sent by the solver
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CompartmentData {
    pub values: Vec<f64>,
    #[serde(default, deserialize_with = "optional_lenient_number")]
    pub max: Option<f64>,
}

/// Raw solver answer
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SolverResponse {
    /// Simulated duration in days
    #[serde(rename = "simTime", deserialize_with = "lenient_number")]
    pub sim_time: f64,
    pub data: HashMap<String, CompartmentData>,
}

impl SolverResponse {
    pub fn from_json(json: &str) -> Result<Self, SolverError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Convert into a run, mapping compartment keys onto quantities.
    ///
    /// A compartment without a `max` uses the largest of its values.
    pub fn into_payload(mut self) -> Result<RunPayload, SolverError> {
        let times = self
            .data
            .remove(TIME_KEY)
            .ok_or_else(|| SolverError::MissingCompartment(TIME_KEY.to_string()))?
            .values;
        let mut payload = RunPayload::new(self.sim_time, times);
        for quantity in Quantity::ALL {
            let key = quantity.compartment();
            let data = self
                .data
                .remove(key)
                .ok_or_else(|| SolverError::MissingCompartment(key.to_string()))?;
            let max = data
                .max
                .unwrap_or_else(|| data.values.iter().copied().fold(0.0, f64::max));
            payload = payload.with_series(quantity, Series::new(data.values, max));
        }
        Ok(payload)
    }
}

/// Numbers may arrive as JSON numbers or numeric strings
#[derive(Deserialize)]
#[serde(untagged)]
enum LenientNumber {
    Number(f64),
    Text(String),
}

impl LenientNumber {
    fn into_f64<E: serde::de::Error>(self) -> Result<f64, E> {
        match self {
            LenientNumber::Number(n) => Ok(n),
            LenientNumber::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| E::custom(format!("expected a number, found '{s}'"))),
        }
    }
}

fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    LenientNumber::deserialize(deserializer)?.into_f64()
}

fn optional_lenient_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<f64>, D::Error> {
    Option::<LenientNumber>::deserialize(deserializer)?
        .map(LenientNumber::into_f64)
        .transpose()
}

#[cfg(feature = "http")]
pub use http::HttpSolver;

#[cfg(feature = "http")]
mod http {
    use std::io;
    use std::time::Duration;

    use super::{Solver, SolverError, SolverResponse};
    use crate::form::FormSnapshot;
    use crate::session::config::SessionConfig;

    /// Posts the encoded form snapshot to the solver endpoint as the single
    /// form field `data`.
    ///
    /// `timeout` bounds the whole request, from connecting to reading the
    /// last byte of the body.
    pub struct HttpSolver {
        agent: ureq::Agent,
        url: String,
    }

    impl HttpSolver {
        pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
            let agent = ureq::AgentBuilder::new()
                .timeout_connect(timeout)
                .timeout(timeout)
                .build();
            HttpSolver {
                agent,
                url: url.into(),
            }
        }

        pub fn from_config(config: &SessionConfig) -> Self {
            HttpSolver::new(config.solver_url.clone(), config.timeout())
        }

        pub fn url(&self) -> &str {
            &self.url
        }
    }

    impl Solver for HttpSolver {
        fn solve(&mut self, request: &FormSnapshot) -> Result<SolverResponse, SolverError> {
            let encoded = request.encode();
            let response = self
                .agent
                .post(&self.url)
                .send_form(&[("data", encoded.as_str())])
                .map_err(solver_error_from_ureq)?;
            let body = response.into_string().map_err(solver_error_from_io)?;
            SolverResponse::from_json(&body)
        }
    }

    fn solver_error_from_ureq(err: ureq::Error) -> SolverError {
        match err {
            ureq::Error::Status(status, _) => SolverError::Status(status),
            ureq::Error::Transport(transport) => {
                let timed_out = std::error::Error::source(&transport)
                    .and_then(|source| source.downcast_ref::<io::Error>())
                    .is_some_and(is_timeout);
                if timed_out {
                    SolverError::Timeout
                } else {
                    SolverError::Transport(transport.to_string())
                }
            }
        }
    }

    fn solver_error_from_io(err: io::Error) -> SolverError {
        if is_timeout(&err) {
            SolverError::Timeout
        } else {
            SolverError::Transport(err.to_string())
        }
    }

    /// Socket timeouts surface as `WouldBlock` on some platforms
    fn is_timeout(err: &io::Error) -> bool {
        matches!(
            err.kind(),
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
        )
    }

}
