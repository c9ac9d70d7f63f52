//! Scoped lifecycle logging
//!
//! `ObservationScope` logs `{name}_BEGIN` on creation and either
//! `{name}_COMPLETE` or `{name}_FAILED` when finished. A scope dropped
//! without finishing logs `{name}_INCOMPLETE` at WARN.

use std::time::Instant;

use super::logger::Logger;

pub struct ObservationScope {
    name: String,
    fields: Vec<(String, String)>,
    timer: Timer,
    finished: bool,
}

impl ObservationScope {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_fields(name, &[])
    }

    /// Fields given here are repeated on the closing event
    pub fn with_fields(name: impl Into<String>, fields: &[(&str, &str)]) -> Self {
        let name = name.into();
        Logger::info(&format!("{}_BEGIN", name), fields);

        Self {
            name,
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            timer: Timer::new(),
            finished: false,
        }
    }

    pub fn complete(self) {
        self.complete_with_fields(&[]);
    }

    pub fn complete_with_fields(mut self, extra: &[(&str, &str)]) {
        self.finished = true;
        let duration = self.timer.elapsed_ms();

        let mut fields = self.field_refs();
        fields.extend(extra.iter().copied());
        fields.push(("duration_ms", duration.as_str()));

        Logger::info(&format!("{}_COMPLETE", self.name), &fields);
    }

    pub fn fail(mut self, reason: &str) {
        self.finished = true;
        let mut fields = self.field_refs();
        fields.push(("reason", reason));
        Logger::error(&format!("{}_FAILED", self.name), &fields);
    }

    fn field_refs(&self) -> Vec<(&str, &str)> {
        self.fields
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }
}

impl Drop for ObservationScope {
    fn drop(&mut self) {
        if !self.finished {
            Logger::warn(
                &format!("{}_INCOMPLETE", self.name),
                &[("reason", "scope dropped without completion")],
            );
        }
    }
}

/// Wall-clock timer for duration fields
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Elapsed milliseconds, as a log field value
    pub fn elapsed_ms(&self) -> String {
        self.start.elapsed().as_millis().to_string()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
