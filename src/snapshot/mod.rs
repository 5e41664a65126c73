//! Capturing and restoring live interpreter state
//!
//! Each submodule owns one slice of a save: variable bindings, the execution
//! position, and the transient dialog/menu presentation.

pub mod position;
pub mod presentation;
pub mod variables;

pub use position::{capture_position, check_position, resume_at, ExecutionPosition, ResumeError};
pub use presentation::{
    apply_presentation, capture_presentation, restore_presentation, MenuOption, Presentation,
};
pub use variables::{
    capture_variables, restore_variables, EncodedVariable, VariableKind, VariableRestoreIssue,
    VariableRestoreReport, VariableSnapshot, VariableValue,
};
