//! Logging facilities for SimpleUI.
//!
//! SimpleUI uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in your application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("simpleui::group_view=debug")
//!     .init();
//! ```

/// Span names used throughout SimpleUI for tracing.
///
/// These constants can be used to filter traces for specific operations.
pub mod span_names {
    /// Full group rebuild.
    pub const CREATE_GROUP: &str = "simpleui::create_group";
    /// Group refresh pass.
    pub const REFRESH: &str = "simpleui::refresh";
    /// View reordering.
    pub const SORT_ITEMS: &str = "simpleui::sort_items";
    /// Group teardown.
    pub const DESTROY_GROUP: &str = "simpleui::destroy_group";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Signal/slot system target.
    pub const SIGNAL: &str = "simpleui_core::signal";
    /// Show/hide lifecycle target.
    pub const ELEMENT: &str = "simpleui::element";
    /// Item view target.
    pub const ITEM_VIEW: &str = "simpleui::item_view";
    /// Group view target.
    pub const GROUP_VIEW: &str = "simpleui::group_view";
    /// Form stack target.
    pub const FORM: &str = "simpleui::form";
    /// Tooltip target.
    pub const TOOLTIP: &str = "simpleui::tooltip";
    /// Error reporter target.
    pub const ERRORS: &str = "simpleui::errors";
}
