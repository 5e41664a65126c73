use crate::snapshot::{ExecutionPosition, VariableKind, VariableValue};

/// The script interpreter whose state is saved and resumed.
///
/// Methods take `&self`; implementations are expected to guard their own
/// state so the interpreter can be shared with the rest of the runtime.
pub trait Interpreter: Send + Sync {
    /// Identifier of the loaded script graph
    fn script_id(&self) -> String;

    /// Currently executing block and active command, `None` when idle
    fn current_position(&self) -> Option<ExecutionPosition>;

    /// Stop every running block
    fn halt_all(&self);

    /// Start executing `block_id` at `command_index`. Returns `false` if the
    /// block does not exist.
    fn execute_from(&self, block_id: &str, command_index: usize) -> bool;

    /// Number of commands in `block_id`, `None` if the block does not exist
    fn command_count(&self, block_id: &str) -> Option<usize>;

    /// Every declared variable with its current value
    fn variables(&self) -> Vec<(String, VariableValue)>;

    /// Declared type of a variable, `None` if the script has no such key
    fn find_variable(&self, key: &str) -> Option<VariableKind>;

    /// Overwrite a declared variable
    fn assign_variable(&self, key: &str, value: VariableValue);

    /// Key of the most recently executed progress marker, if the script uses them
    fn latest_progress_marker(&self) -> Option<String> {
        None
    }

    /// Mark `key` as the most recently executed progress marker. Returns
    /// `false` if no marker with that key exists.
    fn set_latest_progress_marker(&self, _key: &str) -> bool {
        false
    }
}
