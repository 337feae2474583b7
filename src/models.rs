use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single definition: an ordered JSON object of named fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Definition {
    fields: Map<String, Value>,
}

impl Definition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Sets `field`, returning the value it replaced.
    pub fn insert(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(field.into(), value)
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.shift_remove(field)
    }

    /// Pushes `value` onto the list stored at `field`.
    ///
    /// A missing field becomes a one-element list. A non-list value is kept
    /// as the first element of the new list.
    pub fn append(&mut self, field: &str, value: Value) {
        let slot = self
            .fields
            .entry(field.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));

        if !slot.is_array() {
            let previous = slot.take();
            *slot = Value::Array(vec![previous]);
        }

        if let Value::Array(items) = slot {
            items.push(value);
        }
    }

    /// Moves `from` to `to`, leaving the definition untouched on failure.
    pub fn rename(&mut self, from: &str, to: &str) -> Result<()> {
        if from == to {
            if self.contains(from) {
                return Ok(());
            }
            bail!("field '{}' does not exist", from);
        }
        if self.contains(to) {
            bail!("field '{}' already exists", to);
        }
        let value = self
            .remove(from)
            .with_context(|| format!("field '{}' does not exist", from))?;
        self.fields.insert(to.to_string(), value);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }
}

impl From<Map<String, Value>> for Definition {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentLayout {
    /// Definitions are the top-level members.
    Flat,
    /// Definitions live under a top-level `"definitions"` object.
    Nested,
}

/// Named definitions read from one JSON document.
#[derive(Debug, Clone, PartialEq)]
pub struct DefinitionDocument {
    pub layout: DocumentLayout,
    pub definitions: Vec<(String, Definition)>,
    /// Top-level members other than `"definitions"` in a nested document.
    pub extra: Map<String, Value>,
    /// Index of the `"definitions"` key among the top-level members.
    position: usize,
}

impl DefinitionDocument {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text).context("Invalid JSON")?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(root) = value else {
            bail!("Expected a JSON object at the top level");
        };

        let (layout, members, extra, position) = if holds_nested_definitions(&root) {
            let mut extra = Map::with_capacity(root.len());
            let mut members = Map::new();
            let mut position = 0;
            for (key, value) in root {
                match value {
                    Value::Object(inner) if key == "definitions" => {
                        position = extra.len();
                        members = inner;
                    }
                    other => {
                        extra.insert(key, other);
                    }
                }
            }
            (DocumentLayout::Nested, members, extra, position)
        } else {
            (DocumentLayout::Flat, root, Map::new(), 0)
        };

        let mut definitions = Vec::with_capacity(members.len());
        for (name, member) in members {
            match member {
                Value::Object(fields) => definitions.push((name, Definition::from(fields))),
                other => bail!(
                    "Definition '{}' must be a JSON object, found {}",
                    name,
                    json_kind(&other)
                ),
            }
        }

        Ok(Self {
            layout,
            definitions,
            extra,
            position,
        })
    }

    pub fn to_value(&self) -> Value {
        let mut members = Map::with_capacity(self.definitions.len());
        for (name, definition) in &self.definitions {
            members.insert(name.clone(), Value::Object(definition.fields.clone()));
        }

        match self.layout {
            DocumentLayout::Flat => Value::Object(members),
            DocumentLayout::Nested => {
                let mut root = Map::with_capacity(self.extra.len() + 1);
                let mut members = Some(members);
                for (index, (key, value)) in self.extra.iter().enumerate() {
                    if index == self.position {
                        if let Some(members) = members.take() {
                            root.insert("definitions".to_string(), Value::Object(members));
                        }
                    }
                    root.insert(key.clone(), value.clone());
                }
                if let Some(members) = members {
                    root.insert("definitions".to_string(), Value::Object(members));
                }
                Value::Object(root)
            }
        }
    }

    pub fn to_json_string(&self) -> Result<String> {
        let mut text = serde_json::to_string_pretty(&self.to_value())?;
        text.push('\n');
        Ok(text)
    }

    pub fn get(&self, name: &str) -> Option<&Definition> {
        self.definitions
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, d)| d)
    }
}

/// A `"definitions"` member only marks a nested document when it is an
/// object of objects; otherwise it is an ordinary top-level definition.
fn holds_nested_definitions(root: &Map<String, Value>) -> bool {
    match root.get("definitions") {
        Some(Value::Object(members)) => members.values().all(Value::is_object),
        _ => false,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
