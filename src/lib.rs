//! In-place transformation of named definitions.
//!
//! [`Transformation`] is the contract: given a name and an exclusive borrow of
//! a definition, mutate the definition. The [`transformations`] module ships
//! a handful of implementations for the JSON-backed [`Definition`], and
//! [`processor`] applies one of them to every definition in a set of files.

pub mod logger;
pub mod models;
pub mod processor;
pub mod transformations;

pub use models::{Definition, DefinitionDocument, DocumentLayout};
pub use transformations::Transformation;
