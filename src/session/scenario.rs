use std::fmt;
use std::str::FromStr;

use crate::dosing::{DosingRegistry, Hormone, OralDosing};
use crate::form::{FormSnapshot, FormState, DEFAULT_SIMTIME};
use crate::settings::Variant;

/// A canned experiment the solver knows by name
///
/// Submitting a scenario sends only its name and variant. The form and the
/// dosing inputs are rewritten beforehand so they show what the solver runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scenario {
    /// Euthyroid adult
    Default,
    /// Euthyroid child
    DefaultJunior,
    /// Hypothyroid patient on daily oral T4 + T3 replacement
    DiJo19Example1,
}

impl Scenario {
    pub const ALL: [Scenario; 3] = [
        Scenario::Default,
        Scenario::DefaultJunior,
        Scenario::DiJo19Example1,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Scenario::Default => "default",
            Scenario::DefaultJunior => "default-jr",
            Scenario::DiJo19Example1 => "DiJo19-1",
        }
    }

    /// Value of the `experiment` field
    pub fn experiment(&self) -> String {
        format!("experiment-{}", self.name())
    }

    pub fn variant(&self) -> Variant {
        match self {
            Scenario::DefaultJunior => Variant::Junior,
            Scenario::Default | Scenario::DiJo19Example1 => Variant::Standard,
        }
    }

    /// The fixed request sent in place of the form
    pub fn request(&self) -> FormSnapshot {
        [
            ("experiment", self.experiment()),
            ("thysim", self.variant().wire_name().to_string()),
        ]
        .into_iter()
        .collect()
    }

    /// Rewrite the form and the dosing inputs to match the preset
    pub fn apply(&self, form: &mut FormState, registry: &mut DosingRegistry) {
        registry.clear();
        form.set_variant(self.variant());
        match self {
            Scenario::Default => {
                form.set_simtime(DEFAULT_SIMTIME.to_string());
                form.tune_dials([100.0, 88.0, 100.0, 88.0]);
            }
            Scenario::DefaultJunior => {}
            Scenario::DiJo19Example1 => {
                form.set_simtime("30");
                form.tune_dials([25.0, 88.0, 25.0, 88.0]);
                registry.add_oral(Hormone::T4, &daily(123.0));
                registry.add_oral(Hormone::T3, &daily(6.5));
            }
        }
    }
}

/// One dose a day from day 1 to day 30
fn daily(dose: f64) -> OralDosing {
    OralDosing {
        dose,
        interval: 1.0,
        single_dose: false,
        start: 1.0,
        end: 30.0,
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scenario {
    type Err = String;

    /// Accepts both `DiJo19-1` and `experiment-DiJo19-1`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.strip_prefix("experiment-").unwrap_or(s);
        Scenario::ALL
            .into_iter()
            .find(|scenario| scenario.name() == name)
            .ok_or_else(|| format!("unknown scenario '{s}'"))
    }
}
