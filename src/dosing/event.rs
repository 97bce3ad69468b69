use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::form::Entry;

/// The hormone administered by a dosing event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hormone {
    T4,
    T3,
}

impl Hormone {
    /// Value of the hidden `hormone-n` field
    pub fn id(&self) -> &'static str {
        match self {
            Hormone::T4 => "4",
            Hormone::T3 => "3",
        }
    }
}

impl fmt::Display for Hormone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hormone::T4 => write!(f, "T4"),
            Hormone::T3 => write!(f, "T3"),
        }
    }
}

impl FromStr for Hormone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "T4" => Ok(Hormone::T4),
            "T3" => Ok(Hormone::T3),
            _ => Err(format!("unknown hormone '{s}'")),
        }
    }
}

/// How a dose is administered. Fixed when the event is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    /// Repeating or single oral dose
    Oral,
    /// Intravenous pulse
    IV,
    /// Constant infusion
    Infusion,
}

impl Route {
    /// Value of the hidden `type-n` field
    pub fn id(&self) -> &'static str {
        match self {
            Route::Oral => "1",
            Route::IV => "2",
            Route::Infusion => "3",
        }
    }

    /// Editable numeric fields of this route, in display order
    pub fn fields(&self) -> &'static [Field] {
        match self {
            Route::Oral => &[Field::Dose, Field::Start, Field::Interval, Field::End],
            Route::IV => &[Field::Dose, Field::Start],
            Route::Infusion => &[Field::Dose, Field::Start, Field::End],
        }
    }

    pub fn has(&self, field: Field) -> bool {
        self.fields().contains(&field)
    }

    /// Unit of the dose field
    pub fn dose_unit(&self) -> &'static str {
        match self {
            Route::Oral | Route::IV => "\u{3bc}g",
            Route::Infusion => "\u{3bc}g/day",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Oral => write!(f, "Oral"),
            Route::IV => write!(f, "IV"),
            Route::Infusion => write!(f, "Infusion"),
        }
    }
}

impl FromStr for Route {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Oral" => Ok(Route::Oral),
            "IV" => Ok(Route::IV),
            "Infusion" => Ok(Route::Infusion),
            _ => Err(format!("unknown route '{s}'")),
        }
    }
}

/// A numeric field of a dosing event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    Dose,
    Start,
    Interval,
    End,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Dose, Field::Start, Field::Interval, Field::End];

    /// Prefix of the field's form name
    pub fn prefix(&self) -> &'static str {
        match self {
            Field::Dose => "dose",
            Field::Start => "start",
            Field::Interval => "int",
            Field::End => "end",
        }
    }

    /// Form name of this field on the event at `index`, e.g. `dose-2`
    pub fn name(&self, index: usize) -> String {
        format!("{}-{}", self.prefix(), index)
    }

    /// Whether the field holds a day on the simulation time axis
    pub fn is_day(&self) -> bool {
        matches!(self, Field::Start | Field::End)
    }

    fn from_prefix(prefix: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.prefix() == prefix)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Splits a form name such as `start-3` into its field and input index
pub fn parse_field_name(name: &str) -> Option<(Field, usize)> {
    let (prefix, index) = name.split_once('-')?;
    let field = Field::from_prefix(prefix)?;
    let index = index.parse::<usize>().ok().filter(|i| *i > 0)?;
    Some((field, index))
}

/// One configured drug-administration instruction
///
/// An event does not know its own position; the registry assigns indices from
/// the event's place in the collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DosingEvent {
    hormone: Hormone,
    route: Route,
    dose: Entry,
    start: Entry,
    interval: Entry,
    end: Entry,
    enabled: bool,
    single_dose: bool,
}

impl DosingEvent {
    pub(crate) fn new(route: Route, hormone: Hormone) -> Self {
        DosingEvent {
            hormone,
            route,
            dose: Entry::default(),
            start: Entry::default(),
            interval: Entry::default(),
            end: Entry::default(),
            enabled: true,
            single_dose: false,
        }
    }

    pub fn hormone(&self) -> Hormone {
        self.hormone
    }

    pub fn route(&self) -> Route {
        self.route
    }

    /// Title used in labels, e.g. `T4-Oral`
    pub fn title(&self) -> String {
        format!("{}-{}", self.hormone, self.route)
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn single_dose(&self) -> bool {
        self.single_dose
    }

    /// Dose in µg (µg/day for infusions)
    pub fn dose(&self) -> Option<f64> {
        self.dose.value()
    }

    pub fn start_day(&self) -> Option<f64> {
        self.start.value()
    }

    /// Last dosing day; `0` for a single oral dose, `None` for IV pulses
    pub fn end_day(&self) -> Option<f64> {
        self.numeric(Field::End)
    }

    /// Days between oral doses; `0` for a single dose, `None` off the oral route
    pub fn interval_days(&self) -> Option<f64> {
        self.numeric(Field::Interval)
    }

    fn numeric(&self, field: Field) -> Option<f64> {
        if !self.route.has(field) {
            return None;
        }
        if self.is_locked_by_single_dose(field) {
            return Some(0.0);
        }
        self.entry(field).and_then(Entry::value)
    }

    /// Raw text of `field`, if the route has it
    pub fn entry(&self, field: Field) -> Option<&Entry> {
        if !self.route.has(field) {
            return None;
        }
        Some(match field {
            Field::Dose => &self.dose,
            Field::Start => &self.start,
            Field::Interval => &self.interval,
            Field::End => &self.end,
        })
    }

    /// Text sent to the solver for `field`
    pub(crate) fn submitted_text(&self, field: Field) -> Option<String> {
        if self.route.has(field) && self.is_locked_by_single_dose(field) {
            return Some("0".to_string());
        }
        self.entry(field).map(|e| e.text().to_string())
    }

    /// Whether the user may currently change `field`
    pub fn is_editable(&self, field: Field) -> bool {
        self.enabled && self.route.has(field) && !self.is_locked_by_single_dose(field)
    }

    fn is_locked_by_single_dose(&self, field: Field) -> bool {
        self.single_dose && matches!(field, Field::Interval | Field::End)
    }

    pub(crate) fn entry_mut(&mut self, field: Field) -> &mut Entry {
        match field {
            Field::Dose => &mut self.dose,
            Field::Start => &mut self.start,
            Field::Interval => &mut self.interval,
            Field::End => &mut self.end,
        }
    }

    /// The fields the user may currently change, with mutable access
    pub(crate) fn editable_entries_mut(&mut self) -> Vec<(Field, &mut Entry)> {
        let locked = !self.enabled;
        let single_dose = self.single_dose;
        let route = self.route;
        let DosingEvent {
            dose,
            start,
            interval,
            end,
            ..
        } = self;
        [
            (Field::Dose, dose),
            (Field::Start, start),
            (Field::Interval, interval),
            (Field::End, end),
        ]
        .into_iter()
        .filter(|(field, _)| {
            !locked
                && route.has(*field)
                && !(single_dose && matches!(field, Field::Interval | Field::End))
        })
        .collect()
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Switch single-dose mode. Turning it on fills blank interval and end
    /// fields with `0`; turning it off leaves their text as it is.
    pub(crate) fn set_single_dose(&mut self, single_dose: bool) {
        self.single_dose = single_dose;
        if single_dose {
            for field in [Field::Interval, Field::End] {
                let entry = self.entry_mut(field);
                if entry.is_blank() {
                    entry.set("0");
                }
            }
        }
    }
}
