//! Primary action button
//!
//! Pill-shaped button used for the "add meal" entry points. Shows a
//! plus icon by default and a spinner while loading.

use gpui::prelude::*;
use gpui::*;

use crate::theme::Theme;

/// Primary action button with optional icon and loading spinner
#[derive(IntoElement)]
pub struct AddButton {
    id: ElementId,
    label: SharedString,
    loading: bool,
    disabled: bool,
    show_icon: bool,
    on_click: Option<Box<dyn Fn(&ClickEvent, &mut Window, &mut App) + 'static>>,
}

impl AddButton {
    pub fn new(id: impl Into<ElementId>, label: impl Into<SharedString>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            loading: false,
            disabled: false,
            show_icon: true,
            on_click: None,
        }
    }

    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn show_icon(mut self, show_icon: bool) -> Self {
        self.show_icon = show_icon;
        self
    }

    pub fn on_click(
        mut self,
        handler: impl Fn(&ClickEvent, &mut Window, &mut App) + 'static,
    ) -> Self {
        self.on_click = Some(Box::new(handler));
        self
    }
}

impl RenderOnce for AddButton {
    fn render(self, _window: &mut Window, cx: &mut App) -> impl IntoElement {
        let theme = cx.global::<Theme>();
        let interactive = !self.disabled && !self.loading;

        div()
            .id(self.id)
            .h(px(48.0))
            .px(px(24.0))
            .py(px(12.0))
            .rounded(px(16.0))
            .bg(theme.primary)
            .flex()
            .flex_row()
            .items_center()
            .justify_center()
            .gap(px(8.0))
            .when(self.disabled, |el| el.opacity(0.5))
            .when(interactive, |el| {
                el.cursor_pointer().hover(|s| s.opacity(0.9))
            })
            .child(if self.loading {
                // Pulsing spinner while the action is pending
                div()
                    .w(px(16.0))
                    .h(px(16.0))
                    .rounded_full()
                    .border_2()
                    .border_color(theme.text_foreground)
                    .with_animation(
                        "add-button-spinner",
                        Animation::new(std::time::Duration::from_millis(800))
                            .repeat()
                            .with_easing(ease_in_out),
                        |el, delta| el.opacity(0.3 + 0.7 * delta),
                    )
                    .into_any_element()
            } else if self.show_icon {
                div()
                    .text_color(theme.text_foreground)
                    .child("+")
                    .into_any_element()
            } else {
                div().into_any_element()
            })
            .child(
                div()
                    .font_weight(FontWeight::BOLD)
                    .text_color(theme.text_foreground)
                    .child(self.label),
            )
            .when_some(self.on_click, |el, handler| {
                el.when(interactive, |el| {
                    el.on_click(move |event, window, cx| handler(event, window, cx))
                })
            })
    }
}

#[cfg(test)]
mod tests {
    use core::prelude::v1::test;

    use super::*;

    #[test]
    fn test_builders_set_visual_state() {
        let button = AddButton::new("save", "Speichern")
            .loading(true)
            .disabled(true)
            .show_icon(false);

        assert!(button.loading);
        assert!(button.disabled);
        assert!(!button.show_icon);
        assert_eq!(button.label.as_ref(), "Speichern");
    }

    #[test]
    fn test_defaults_show_icon_and_accept_clicks() {
        let button = AddButton::new("add", "Hinzufügen");

        assert!(!button.loading);
        assert!(!button.disabled);
        assert!(button.show_icon);
        assert!(button.on_click.is_none());
    }
}
