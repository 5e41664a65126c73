//! Presentation state capture
//!
//! Records whichever of the two mutually exclusive UI modes is active (a
//! dialog showing text, or a menu of choices) so the same screen can be put
//! back after a resume.

use serde::{Deserialize, Serialize};

use crate::runtime::{FrameTicker, Interpreter, Presenter};

/// One menu choice: the label and the block it jumps to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuOption {
    pub text: String,
    pub target_block_id: String,
}

impl MenuOption {
    pub fn new(text: impl Into<String>, target_block_id: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            target_block_id: target_block_id.into(),
        }
    }
}

/// Transient UI state. At most one mode is ever recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Presentation {
    Dialog { text: String },
    Menu { options: Vec<MenuOption> },
}

/// Capture the active UI mode. A visible dialog wins over a menu.
pub fn capture_presentation(presenter: &dyn Presenter) -> Option<Presentation> {
    if let Some(text) = presenter.active_dialog_text() {
        if !text.is_empty() {
            return Some(Presentation::Dialog { text });
        }
    }

    match presenter.active_menu_options() {
        Some(options) if !options.is_empty() => Some(Presentation::Menu { options }),
        _ => None,
    }
}

/// Wait one frame, then re-create the captured UI.
pub async fn restore_presentation(
    presentation: &Presentation,
    presenter: &dyn Presenter,
    interpreter: &dyn Interpreter,
    ticker: &dyn FrameTicker,
) {
    ticker.next_frame().await;
    apply_presentation(presentation, presenter, interpreter);
}

/// Re-create the captured UI immediately.
///
/// Menu targets are re-resolved by block id; options whose block is gone are
/// dropped.
pub fn apply_presentation(
    presentation: &Presentation,
    presenter: &dyn Presenter,
    interpreter: &dyn Interpreter,
) {
    match presentation {
        Presentation::Dialog { text } => presenter.show_dialog(text),
        Presentation::Menu { options } => {
            let resolved: Vec<MenuOption> = options
                .iter()
                .filter(|option| {
                    let found = interpreter.command_count(&option.target_block_id).is_some();
                    if !found {
                        tracing::warn!(
                            target_block = %option.target_block_id,
                            text = %option.text,
                            "Dropping menu option whose block no longer exists"
                        );
                    }
                    found
                })
                .cloned()
                .collect();
            presenter.clear_menu();
            presenter.show_menu(&resolved);
        }
    }
}
