//! Dynamic form engine: declarative field schemas compiled into runtime
//! validators, row/section layout computation, and dirty/valid submit gating.
//!
//! A form is described as an ordered list of [`FieldDescriptor`]s. Layout
//! markers (section/column breaks) shape the rendered grid; input fields
//! carry a kind, a required flag and an ordered rule list. [`compile`] turns
//! the description into a [`CompiledSchema`] that validates form submissions;
//! custom rules are resolved against a [`PredicateRegistry`] of named
//! functions, never executed from schema data.

pub mod compiled;
pub mod error;
pub mod field;
pub mod intake;
pub mod layout;
pub mod rules;
pub mod state;

pub use compiled::{CompiledSchema, FormData, ValidationFailure, compile};
pub use error::FormError;
pub use field::{FieldDescriptor, FieldKind};
pub use layout::{DEFAULT_COLUMNS, FormLayout, FormSection, layout};
pub use rules::{FieldValue, PredicateRegistry, ValidationRule};
pub use state::FormState;
