use crate::models::Definition;
use crate::transformations::common::Transformation;
use serde_json::Value;

/// Appends the definition's name to the list at `field`.
///
/// Not idempotent: every call adds another entry.
pub struct AppendName {
    pub field: String,
    pub verbose: bool,
}

impl Transformation<Definition> for AppendName {
    fn transform(&self, name: &str, definition: &mut Definition) {
        definition.append(&self.field, Value::String(name.to_string()));
        if self.verbose {
            let len = definition
                .get(&self.field)
                .and_then(Value::as_array)
                .map_or(0, Vec::len);
            crate::logger!("AppendName: {}.{} now has {} entries", name, self.field, len);
        }
    }
}
