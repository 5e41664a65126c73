use crate::snapshot::MenuOption;

/// The dialog/menu UI layer
pub trait Presenter: Send + Sync {
    /// Show a dialog with `text` already fully displayed
    fn show_dialog(&self, text: &str);

    /// Create fresh option widgets for `options`, in order
    fn show_menu(&self, options: &[MenuOption]);

    /// Destroy any existing option widgets
    fn clear_menu(&self);

    /// Close the active dialog and menu
    fn hide_all(&self);

    /// Text of the visible dialog, `None` if no dialog is shown
    fn active_dialog_text(&self) -> Option<String>;

    /// Options of the visible menu, `None` if no menu is shown
    fn active_menu_options(&self) -> Option<Vec<MenuOption>>;
}
