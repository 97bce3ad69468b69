//! The simulation form: global fields, dials, model parameters and the flat
//! `name=value` snapshot submitted to the solver.

mod entry;
mod validation;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dosing::DosingRegistry;
use crate::settings::Variant;

pub use entry::Entry;
pub use validation::{validate, InvalidField, InvalidReason, ValidationError, MAX_DAY};

/// Simulated days shown before anything is submitted
pub const DEFAULT_SIMTIME: f64 = 5.0;

/// A secretion/absorption adjustment dial
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dial {
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
}

impl Dial {
    /// Form name of the dial at 0-based position `i`
    pub fn name(i: usize) -> String {
        format!("dialinput{}", i + 1)
    }
}

/// The four dials, in form order
pub const DIALS: [Dial; 4] = [
    Dial {
        label: "T4 Secretion",
        min: 0.0,
        max: 125.0,
        default: 100.0,
    },
    Dial {
        label: "T4 Absorption",
        min: 0.0,
        max: 100.0,
        default: 88.0,
    },
    Dial {
        label: "T3 Secretion",
        min: 0.0,
        max: 125.0,
        default: 100.0,
    },
    Dial {
        label: "T3 Absorption",
        min: 0.0,
        max: 100.0,
        default: 88.0,
    },
];

/// Global form fields (everything except the dosing inputs)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormState {
    simtime: Entry,
    dials: [Entry; 4],
    variant: Variant,
    parameters: BTreeMap<String, Entry>,
}

impl Default for FormState {
    fn default() -> Self {
        FormState::new(Variant::default())
    }
}

impl FormState {
    pub fn new(variant: Variant) -> Self {
        FormState {
            simtime: Entry::number(DEFAULT_SIMTIME),
            dials: DIALS.map(|d| Entry::number(d.default)),
            variant,
            parameters: BTreeMap::new(),
        }
    }

    /// Register the model-parameter fields shown on the form
    pub fn with_parameters<I, K, V>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.parameters = parameters
            .into_iter()
            .map(|(k, v)| (k.into(), Entry::new(v)))
            .collect();
        self
    }

    pub fn simtime(&self) -> &Entry {
        &self.simtime
    }

    pub fn set_simtime(&mut self, text: impl Into<String>) {
        self.simtime.set(text);
    }

    /// Dial at 0-based position `i`
    pub fn dial(&self, i: usize) -> Option<&Entry> {
        self.dials.get(i)
    }

    pub fn set_dial(&mut self, i: usize, text: impl Into<String>) {
        if let Some(dial) = self.dials.get_mut(i) {
            dial.set(text);
        }
    }

    /// Set all four dials at once
    pub fn tune_dials(&mut self, values: [f64; 4]) {
        self.dials = values.map(Entry::number);
    }

    /// Numeric dial values, `None` where a dial is not numeric
    pub fn dial_values(&self) -> [Option<f64>; 4] {
        [0, 1, 2, 3].map(|i| self.dials[i].value())
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn set_variant(&mut self, variant: Variant) {
        self.variant = variant;
    }

    pub fn parameter(&self, name: &str) -> Option<&Entry> {
        self.parameters.get(name)
    }

    /// Set a known model parameter; returns `false` for unknown names
    pub fn set_parameter(&mut self, name: &str, text: impl Into<String>) -> bool {
        match self.parameters.get_mut(name) {
            Some(entry) => {
                entry.set(text);
                true
            }
            None => false,
        }
    }

    /// Export the model parameters as a JSON object of `name: value` strings
    pub fn save_params(&self) -> String {
        let object: BTreeMap<&str, &str> = self
            .parameters
            .iter()
            .map(|(k, v)| (k.as_str(), v.text()))
            .collect();
        // A map of strings always serializes
        serde_json::to_string(&object).unwrap_or_default()
    }

    /// Import model parameters from a JSON object. Unknown names are ignored,
    /// as is blank input. Returns how many parameters were updated.
    pub fn load_params(&mut self, json: &str) -> Result<usize, serde_json::Error> {
        if json.trim().is_empty() {
            return Ok(0);
        }
        let object: BTreeMap<String, serde_json::Value> = serde_json::from_str(json)?;
        let mut updated = 0;
        for (name, value) in object {
            let text = match value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            if self.set_parameter(&name, text) {
                updated += 1;
            }
        }
        Ok(updated)
    }

    /// Flatten the form and the dosing inputs into the submitted fields
    pub fn snapshot(&self, registry: &DosingRegistry) -> FormSnapshot {
        let mut fields = vec![
            ("thysim".to_string(), self.variant.wire_name().to_string()),
            ("simtime".to_string(), self.simtime.text().to_string()),
        ];
        fields.extend(
            self.dials
                .iter()
                .enumerate()
                .map(|(i, d)| (Dial::name(i), d.text().to_string())),
        );
        fields.extend(
            self.parameters
                .iter()
                .map(|(k, v)| (k.clone(), v.text().to_string())),
        );
        fields.extend(registry.form_fields());
        FormSnapshot { fields }
    }

    pub(crate) fn simtime_mut(&mut self) -> &mut Entry {
        &mut self.simtime
    }

    pub(crate) fn dials_mut(&mut self) -> &mut [Entry; 4] {
        &mut self.dials
    }

    pub(crate) fn parameters_mut(&mut self) -> impl Iterator<Item = (&String, &mut Entry)> {
        self.parameters.iter_mut()
    }
}

/// Ordered `name=value` pairs as submitted by the form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSnapshot {
    fields: Vec<(String, String)>,
}

impl FormSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push((name.into(), value.into()));
    }

    /// First value submitted under `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// URL-encoded `a=1&b=2` form of the snapshot
    pub fn encode(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormSnapshot {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        FormSnapshot {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
