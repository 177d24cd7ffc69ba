pub mod banner;
pub mod menu;
pub mod render;

/// Prints the welcome banner and applies the theme for all subsequent inquire
/// prompts. Call once at startup (e.g. in main after tracing init).
pub fn init_ui() {
    banner::print_welcome();
    menu::apply_theme();
}
