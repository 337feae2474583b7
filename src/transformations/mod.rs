pub mod append_name;
pub mod common;
pub mod noop;
pub mod remove_field;
pub mod rename_field;
pub mod set_field;

pub use append_name::AppendName;
pub use common::Transformation;
pub use noop::Noop;
pub use remove_field::RemoveField;
pub use rename_field::RenameField;
pub use set_field::{RecordName, SetField};
