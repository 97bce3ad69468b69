use std::fmt;

use thiserror::Error;

use crate::dosing::DosingRegistry;
use crate::form::{Dial, Entry, FormState, DIALS};

/// Latest day any start, end or simulation time may refer to
pub const MAX_DAY: f64 = 100.0;

/// Why a field was flagged
#[derive(Debug, Clone, PartialEq)]
pub enum InvalidReason {
    /// The field does not start with a number
    NotNumeric,
    /// A dial value outside the dial's range
    OutOfRange { min: f64, max: f64 },
    /// A day beyond the simulation horizon
    BeyondHorizon { max_day: f64 },
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidReason::NotNumeric => write!(f, "not a number"),
            InvalidReason::OutOfRange { min, max } => write!(f, "outside {min}..={max}"),
            InvalidReason::BeyondHorizon { max_day } => write!(f, "later than day {max_day}"),
        }
    }
}

/// A flagged form field
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidField {
    pub name: String,
    pub reason: InvalidReason,
}

/// The form failed validation; nothing was submitted
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Form validation failed: {}", describe(.fields))]
pub struct ValidationError {
    pub fields: Vec<InvalidField>,
}

impl ValidationError {
    /// Whether the field `name` was flagged
    pub fn flags(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }
}

fn describe(fields: &[InvalidField]) -> String {
    fields
        .iter()
        .map(|f| format!("{} ({})", f.name, f.reason))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Validate every editable field of the form and the dosing inputs.
///
/// Numeric fields are rewritten to their parsed value. Dials must lie within
/// their range and days within [MAX_DAY]. A start or end day later than the
/// simulation time extends the simulation time to that day. Fields of
/// disabled inputs and fields locked by single-dose mode are skipped.
pub fn validate(form: &mut FormState, registry: &mut DosingRegistry) -> Result<(), ValidationError> {
    let mut flagged = Vec::new();
    let mut latest_day: Option<f64> = None;

    let simtime = check_day("simtime", form.simtime_mut(), &mut flagged);

    for (i, (entry, dial)) in form.dials_mut().iter_mut().zip(DIALS).enumerate() {
        if let Some(value) = check_numeric(&Dial::name(i), entry, &mut flagged) {
            if value < dial.min || value > dial.max {
                flagged.push(InvalidField {
                    name: Dial::name(i),
                    reason: InvalidReason::OutOfRange {
                        min: dial.min,
                        max: dial.max,
                    },
                });
            }
        }
    }

    for (name, entry) in form.parameters_mut() {
        check_numeric(name, entry, &mut flagged);
    }

    for (name, field, entry) in registry.editable_entries_mut() {
        let value = if field.is_day() {
            check_day(&name, entry, &mut flagged)
        } else {
            check_numeric(&name, entry, &mut flagged)
        };
        if let (true, Some(day)) = (field.is_day(), value) {
            latest_day = Some(latest_day.map_or(day, |d: f64| d.max(day)));
        }
    }

    if let (Some(simtime), Some(day)) = (simtime, latest_day) {
        if day > simtime {
            form.set_simtime(Entry::number(day).text());
        }
    }

    if flagged.is_empty() {
        Ok(())
    } else {
        tracing::warn!(flagged = flagged.len(), "form validation failed");
        Err(ValidationError { fields: flagged })
    }
}

fn check_numeric(
    name: &str,
    entry: &mut Entry,
    flagged: &mut Vec<InvalidField>,
) -> Option<f64> {
    let value = entry.normalize();
    if value.is_none() {
        flagged.push(InvalidField {
            name: name.to_string(),
            reason: InvalidReason::NotNumeric,
        });
    }
    value
}

/// A numeric day within the horizon
fn check_day(
    name: &str,
    entry: &mut Entry,
    flagged: &mut Vec<InvalidField>,
) -> Option<f64> {
    let day = check_numeric(name, entry, flagged)?;
    if day > MAX_DAY {
        flagged.push(InvalidField {
            name: name.to_string(),
            reason: InvalidReason::BeyondHorizon { max_day: MAX_DAY },
        });
        return None;
    }
    Some(day)
}
