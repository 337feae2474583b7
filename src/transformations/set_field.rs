use crate::models::Definition;
use crate::transformations::common::Transformation;
use serde_json::Value;

/// Sets `field` to a fixed value on every definition.
pub struct SetField {
    pub field: String,
    pub value: Value,
    pub verbose: bool,
}

impl Transformation<Definition> for SetField {
    fn transform(&self, name: &str, definition: &mut Definition) {
        let previous = definition.insert(self.field.clone(), self.value.clone());
        if self.verbose {
            match previous {
                Some(old) if old != self.value => {
                    crate::logger!("SetField: {}.{}: {} -> {}", name, self.field, old, self.value);
                }
                Some(_) => {}
                None => {
                    crate::logger!("SetField: {}.{} = {}", name, self.field, self.value);
                }
            }
        }
    }
}

/// Stores the definition's own name in `field`.
pub struct RecordName {
    pub field: String,
    pub verbose: bool,
}

impl Transformation<Definition> for RecordName {
    fn transform(&self, name: &str, definition: &mut Definition) {
        definition.insert(self.field.clone(), Value::String(name.to_string()));
        if self.verbose {
            crate::logger!("RecordName: {}.{} = \"{}\"", name, self.field, name);
        }
    }
}
