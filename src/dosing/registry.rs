use serde::{Deserialize, Serialize};

use crate::dosing::error::RegistryError;
use crate::dosing::event::{parse_field_name, DosingEvent, Field, Hormone, Route};
use crate::form::Entry;

/// Settings for an oral input added in one step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OralDosing {
    pub dose: f64,
    pub interval: f64,
    pub single_dose: bool,
    pub start: f64,
    pub end: f64,
}

/// Ordered collection of dosing events
///
/// Events are numbered `1..=len()` by position. Removing an event shifts every
/// later event down by one, so the numbering never has gaps; anything that
/// refers to an event by number (field names, labels, toggle and delete
/// actions) is derived from the current position through [DosingRegistry::rows]
/// and never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DosingRegistry {
    events: Vec<DosingEvent>,
}

impl DosingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Event at 1-based `index`
    pub fn get(&self, index: usize) -> Option<&DosingEvent> {
        index.checked_sub(1).and_then(|i| self.events.get(i))
    }

    /// Events with their 1-based indices
    pub fn iter(&self) -> impl Iterator<Item = (usize, &DosingEvent)> {
        self.events.iter().enumerate().map(|(i, e)| (i + 1, e))
    }

    /// Append a new, empty event and return its index
    pub fn add(&mut self, route: Route, hormone: Hormone) -> usize {
        self.events.push(DosingEvent::new(route, hormone));
        let index = self.events.len();
        tracing::debug!(index, %route, %hormone, "added dosing input");
        index
    }

    /// Append an event from a title such as `T4-Oral`
    pub fn add_titled(&mut self, title: &str) -> Result<usize, RegistryError> {
        let unknown = || RegistryError::UnknownTitle(title.to_string());
        let (hormone, route) = title.split_once('-').ok_or_else(unknown)?;
        let hormone = hormone.parse::<Hormone>().map_err(|_| unknown())?;
        let route = route.parse::<Route>().map_err(|_| unknown())?;
        Ok(self.add(route, hormone))
    }

    /// Append a fully specified oral event and return its index
    pub fn add_oral(&mut self, hormone: Hormone, dosing: &OralDosing) -> usize {
        let index = self.add(Route::Oral, hormone);
        let event = &mut self.events[index - 1];
        event.entry_mut(Field::Dose).set(Entry::number(dosing.dose).text());
        event.entry_mut(Field::Interval).set(Entry::number(dosing.interval).text());
        event.entry_mut(Field::Start).set(Entry::number(dosing.start).text());
        event.entry_mut(Field::End).set(Entry::number(dosing.end).text());
        if dosing.single_dose {
            event.set_single_dose(true);
        }
        index
    }

    /// Remove the event at `index`; later events move down by one
    pub fn remove(&mut self, index: usize) -> Result<DosingEvent, RegistryError> {
        self.check(index)?;
        let removed = self.events.remove(index - 1);
        tracing::debug!(index, remaining = self.events.len(), "removed dosing input");
        Ok(removed)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Enable or disable an event. A disabled event keeps its values and is
    /// still submitted, but none of its fields can be edited.
    pub fn set_enabled(&mut self, index: usize, enabled: bool) -> Result<(), RegistryError> {
        self.event_mut(index)?.set_enabled(enabled);
        tracing::debug!(index, enabled, "toggled dosing input");
        Ok(())
    }

    /// Flip an event between enabled and disabled; returns the new state
    pub fn toggle(&mut self, index: usize) -> Result<bool, RegistryError> {
        let enabled = !self.event(index)?.enabled();
        self.set_enabled(index, enabled)?;
        Ok(enabled)
    }

    /// Switch single-dose mode on an oral event
    pub fn set_single_dose(&mut self, index: usize, single_dose: bool) -> Result<(), RegistryError> {
        let event = self.event_mut(index)?;
        if event.route() != Route::Oral {
            return Err(RegistryError::NotOral {
                index,
                route: event.route(),
            });
        }
        if !event.enabled() {
            return Err(RegistryError::Locked {
                name: format!("singledose-{index}"),
            });
        }
        event.set_single_dose(single_dose);
        Ok(())
    }

    /// Set the text of a field of the event at `index`
    pub fn set_field(
        &mut self,
        index: usize,
        field: Field,
        text: impl Into<String>,
    ) -> Result<(), RegistryError> {
        let event = self.event_mut(index)?;
        if !event.route().has(field) {
            return Err(RegistryError::NotApplicable {
                field,
                route: event.route(),
            });
        }
        if !event.is_editable(field) {
            return Err(RegistryError::Locked {
                name: field.name(index),
            });
        }
        event.entry_mut(field).set(text);
        Ok(())
    }

    /// Set a field addressed by its form name, e.g. `dose-2`
    pub fn set_named(&mut self, name: &str, text: impl Into<String>) -> Result<(), RegistryError> {
        let (field, index) =
            parse_field_name(name).ok_or_else(|| RegistryError::UnknownField(name.to_string()))?;
        self.set_field(index, field, text)
    }

    /// Presentation rows, with every identifier derived from the current position
    pub fn rows(&self) -> Vec<InputRow> {
        self.iter().map(|(index, event)| InputRow::new(index, event)).collect()
    }

    /// Flat `name=value` pairs submitted for every event, in display order
    pub fn form_fields(&self) -> Vec<(String, String)> {
        let mut fields = Vec::with_capacity(self.events.len() * 8);
        for (index, event) in self.iter() {
            let disabled = if event.enabled() { "0" } else { "1" };
            fields.push((format!("disabled-{index}"), disabled.to_string()));
            for field in event.route().fields() {
                if let Some(text) = event.submitted_text(*field) {
                    fields.push((field.name(index), text));
                }
                // The checkbox sits right after the dose
                if *field == Field::Dose && event.single_dose() {
                    fields.push((format!("singledose-{index}"), "1".to_string()));
                }
            }
            fields.push((format!("hormone-{index}"), event.hormone().id().to_string()));
            fields.push((format!("type-{index}"), event.route().id().to_string()));
        }
        fields
    }

    /// Mutable access to every editable field, keyed by form name
    pub(crate) fn editable_entries_mut(&mut self) -> Vec<(String, Field, &mut Entry)> {
        self.events
            .iter_mut()
            .enumerate()
            .flat_map(|(i, event)| {
                event
                    .editable_entries_mut()
                    .into_iter()
                    .map(move |(field, entry)| (field.name(i + 1), field, entry))
            })
            .collect()
    }

    fn check(&self, index: usize) -> Result<(), RegistryError> {
        if index == 0 || index > self.events.len() {
            return Err(RegistryError::NoSuchInput {
                index,
                count: self.events.len(),
            });
        }
        Ok(())
    }

    fn event(&self, index: usize) -> Result<&DosingEvent, RegistryError> {
        self.check(index)?;
        Ok(&self.events[index - 1])
    }

    fn event_mut(&mut self, index: usize) -> Result<&mut DosingEvent, RegistryError> {
        self.check(index)?;
        Ok(&mut self.events[index - 1])
    }
}

/// What the presentation layer action on an input refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Toggle(usize),
    SingleDose(usize),
    Delete(usize),
}

/// One editable field as shown on an input row
#[derive(Debug, Clone, PartialEq)]
pub struct FieldView {
    pub field: Field,
    /// Element id and form name, e.g. `start-2`
    pub name: String,
    pub text: String,
    pub editable: bool,
}

/// View of one dosing event, rebuilt on every render
#[derive(Debug, Clone, PartialEq)]
pub struct InputRow {
    pub index: usize,
    /// Element id of the row, e.g. `input-2`
    pub id: String,
    /// e.g. `Input 2 (T4-Oral)`
    pub label: String,
    /// Alternating row parity class, `row0` or `row1`
    pub row_class: String,
    /// Text of the on/off toggle
    pub toggle_text: &'static str,
    pub toggle: InputAction,
    /// Present on oral rows only
    pub single_dose: Option<InputAction>,
    pub delete: InputAction,
    pub fields: Vec<FieldView>,
}

impl InputRow {
    fn new(index: usize, event: &DosingEvent) -> Self {
        let fields = event
            .route()
            .fields()
            .iter()
            .map(|field| FieldView {
                field: *field,
                name: field.name(index),
                text: event.entry(*field).map(|e| e.text().to_string()).unwrap_or_default(),
                editable: event.is_editable(*field),
            })
            .collect();
        InputRow {
            index,
            id: format!("input-{index}"),
            label: format!("Input {} ({})", index, event.title()),
            row_class: format!("row{}", index % 2),
            toggle_text: if event.enabled() { "ON" } else { "OFF" },
            toggle: InputAction::Toggle(index),
            single_dose: (event.route() == Route::Oral).then_some(InputAction::SingleDose(index)),
            delete: InputAction::Delete(index),
            fields,
        }
    }
}
