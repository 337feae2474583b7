use crate::models::Definition;
use crate::transformations::common::Transformation;

pub struct RemoveField {
    pub field: String,
    pub verbose: bool,
}

impl Transformation<Definition> for RemoveField {
    fn transform(&self, name: &str, definition: &mut Definition) {
        let removed = definition.remove(&self.field);
        if self.verbose && removed.is_some() {
            crate::logger!("RemoveField: removed {}.{}", name, self.field);
        }
    }
}
