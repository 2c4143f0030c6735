//! Built-in theme definitions

use super::colors::hex;
use super::Theme;

/// Default light theme
pub fn mahlzeit_light() -> Theme {
    Theme {
        id: "mahlzeit",
        name: "Mahlzeit",
        is_dark: false,

        primary: hex("#2f9e44"),

        error: hex("#e03131"),
        success: hex("#2f9e44"),

        text: hex("#212529"),
        text_muted: hex("#868e96"),
        text_foreground: hex("#ffffff"),

        foreground: hex("#f1f3f5"),
        shadow: hex("#000000"),
        background: hex("#ffffff"),
        background_panel: hex("#f8f9fa"),
        background_element: hex("#e9ecef"),

        border: hex("#dee2e6"),
        border_subtle: hex("#f1f3f5"),
    }
}

/// Dark variant
pub fn mahlzeit_dark() -> Theme {
    Theme {
        id: "mahlzeit-dark",
        name: "Mahlzeit Dark",
        is_dark: true,

        primary: hex("#40c057"),

        error: hex("#fa5252"),
        success: hex("#40c057"),

        text: hex("#f1f3f5"),
        text_muted: hex("#868e96"),
        text_foreground: hex("#0b0d0e"),

        foreground: hex("#2b3035"),
        shadow: hex("#000000"),
        background: hex("#16191c"),
        background_panel: hex("#1e2226"),
        background_element: hex("#2b3035"),

        border: hex("#343a40"),
        border_subtle: hex("#2b3035"),
    }
}
