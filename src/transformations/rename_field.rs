use crate::models::Definition;
use crate::transformations::common::Transformation;

/// Moves `from` to `to`. Definitions where the move is not possible are
/// logged and left untouched.
pub struct RenameField {
    pub from: String,
    pub to: String,
    pub verbose: bool,
}

impl Transformation<Definition> for RenameField {
    fn transform(&self, name: &str, definition: &mut Definition) {
        if !definition.contains(&self.from) {
            if self.verbose {
                crate::logger!("RenameField: {} has no field '{}'", name, self.from);
            }
            return;
        }

        match definition.rename(&self.from, &self.to) {
            Ok(()) => {
                if self.verbose {
                    crate::logger!("RenameField: {}.{} -> {}", name, self.from, self.to);
                }
            }
            Err(e) => {
                crate::logger!("RenameField: skipped {}: {}", name, e);
            }
        }
    }
}
