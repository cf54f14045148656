use std::fmt;

use tracing::field::{Field, Visit};

/// Collects an event's fields as key/value strings, keeping the message
/// separate and the remaining fields in recording order.
#[derive(Default)]
pub(crate) struct KvVisitor {
    pub message: Option<String>,
    pub fields: Vec<(String, String)>,
}

impl KvVisitor {
    fn push(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = Some(value);
        } else {
            self.fields.push((field.name().to_string(), value));
        }
    }

    /// Removes and returns the first field with the given name.
    pub fn take(&mut self, name: &str) -> Option<String> {
        let index = self.fields.iter().position(|(key, _)| key == name)?;
        Some(self.fields.remove(index).1)
    }
}

impl Visit for KvVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.push(field, format!("{:?}", value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push(field, value.to_string());
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.push(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push(field, value.to_string());
    }
}
