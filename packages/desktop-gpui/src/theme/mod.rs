//! Theme system for Mahlzeit Desktop
//!
//! Provides light and dark built-in themes plus the color utilities
//! used to define them.

mod colors;
mod themes;

pub use colors::*;
pub use themes::*;

use gpui::*;
use std::collections::HashMap;

// ============================================================================
// Theme Structure
// ============================================================================

/// Complete theme with all color definitions
#[derive(Debug, Clone)]
pub struct Theme {
    pub id: &'static str,
    pub name: &'static str,
    pub is_dark: bool,

    // Core colors
    pub primary: Hsla,

    // Status colors
    pub error: Hsla,
    pub success: Hsla,

    // Text colors
    pub text: Hsla,
    pub text_muted: Hsla,
    /// Text rendered on top of `primary` or `foreground` surfaces
    pub text_foreground: Hsla,

    // Surface colors
    pub foreground: Hsla,
    pub shadow: Hsla,
    pub background: Hsla,
    pub background_panel: Hsla,
    pub background_element: Hsla,

    // Border colors
    pub border: Hsla,
    pub border_subtle: Hsla,
}

impl Default for Theme {
    fn default() -> Self {
        themes::mahlzeit_light()
    }
}

impl Global for Theme {}

// ============================================================================
// Theme Registry
// ============================================================================

/// Registry of all available themes
pub struct ThemeRegistry {
    themes: HashMap<&'static str, fn() -> Theme>,
    theme_list: Vec<ThemeInfo>,
}

/// Basic theme information for UI display
#[derive(Debug, Clone)]
pub struct ThemeInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub is_dark: bool,
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ThemeRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            themes: HashMap::new(),
            theme_list: Vec::new(),
        };

        registry.register("mahlzeit", "Mahlzeit", false, themes::mahlzeit_light);
        registry.register("mahlzeit-dark", "Mahlzeit Dark", true, themes::mahlzeit_dark);

        registry
    }

    fn register(
        &mut self,
        id: &'static str,
        name: &'static str,
        is_dark: bool,
        theme_fn: fn() -> Theme,
    ) {
        self.themes.insert(id, theme_fn);
        self.theme_list.push(ThemeInfo { id, name, is_dark });
    }

    /// Get a theme by ID
    pub fn get(&self, id: &str) -> Option<Theme> {
        self.themes.get(id).map(|f| f())
    }

    /// Get list of all available themes
    pub fn list(&self) -> &[ThemeInfo] {
        &self.theme_list
    }
}

impl Global for ThemeRegistry {}

// ============================================================================
// Theme Initialization
// ============================================================================

/// Initialize the theme system with the configured theme id
pub fn init(cx: &mut App, theme_id: &str) {
    let registry = ThemeRegistry::new();
    let theme = match registry.get(theme_id) {
        Some(theme) => theme,
        None => {
            tracing::warn!("Theme not found: {}, falling back to default", theme_id);
            Theme::default()
        }
    };

    tracing::debug!("Theme system initialized with theme: {}", theme.id);
    cx.set_global(registry);
    cx.set_global(theme);
}

#[cfg(test)]
mod tests {
    use core::prelude::v1::test;

    use super::*;

    #[test]
    fn test_registry_contains_light_and_dark() {
        let registry = ThemeRegistry::new();

        let light = registry.get("mahlzeit").unwrap();
        assert!(!light.is_dark);

        let dark = registry.get("mahlzeit-dark").unwrap();
        assert!(dark.is_dark);

        assert!(registry.get("nonexistent").is_none());
    }
}
