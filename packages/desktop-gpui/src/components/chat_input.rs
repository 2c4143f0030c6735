//! Chat input component
//!
//! Single-line text input with a send button. Emits [`SendMessage`]
//! on Enter or when the send button is clicked. The input stays
//! editable while a reply is pending so follow-up messages can be
//! queued, but callers may disable it entirely.

use gpui::prelude::*;
use gpui::*;

use crate::components::button::AddButton;
use crate::theme::Theme;

/// Event emitted when the user wants to send a message
#[derive(Clone)]
pub struct SendMessage {
    pub content: String,
}

/// Chat input component
pub struct ChatInput {
    focus_handle: FocusHandle,
    text: String,
    cursor_position: usize,
    placeholder: String,
    disabled: bool,
}

impl ChatInput {
    pub fn new(cx: &mut Context<Self>) -> Self {
        Self {
            focus_handle: cx.focus_handle(),
            text: String::new(),
            cursor_position: 0,
            placeholder: "Was hast du gegessen?".to_string(),
            disabled: false,
        }
    }

    pub fn set_disabled(&mut self, disabled: bool, cx: &mut Context<Self>) {
        if self.disabled != disabled {
            self.disabled = disabled;
            cx.notify();
        }
    }

    pub fn focus(&self, window: &mut Window, cx: &mut Context<Self>) {
        self.focus_handle.focus(window);
    }

    fn send(&mut self, cx: &mut Context<Self>) {
        if self.text.trim().is_empty() {
            return;
        }
        cx.emit(SendMessage {
            content: self.text.clone(),
        });
        self.text.clear();
        self.cursor_position = 0;
        cx.notify();
    }

    fn insert_text(&mut self, text: &str, cx: &mut Context<Self>) {
        if self.disabled {
            return;
        }
        self.text.insert_str(self.cursor_position, text);
        self.cursor_position += text.len();
        cx.notify();
    }

    fn backspace(&mut self, cx: &mut Context<Self>) {
        if self.disabled || self.cursor_position == 0 {
            return;
        }
        let prev_char_boundary = self.text[..self.cursor_position]
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0);
        self.text.remove(prev_char_boundary);
        self.cursor_position = prev_char_boundary;
        cx.notify();
    }

    fn move_left(&mut self, cx: &mut Context<Self>) {
        if self.cursor_position > 0 {
            self.cursor_position = self.text[..self.cursor_position]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            cx.notify();
        }
    }

    fn move_right(&mut self, cx: &mut Context<Self>) {
        if self.cursor_position < self.text.len() {
            self.cursor_position = self.text[self.cursor_position..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor_position + i)
                .unwrap_or(self.text.len());
            cx.notify();
        }
    }

    fn handle_key_down(&mut self, event: &KeyDownEvent, cx: &mut Context<Self>) {
        if self.disabled {
            return;
        }

        let modifiers = event.keystroke.modifiers;

        match event.keystroke.key.as_str() {
            "backspace" => self.backspace(cx),
            "left" => self.move_left(cx),
            "right" => self.move_right(cx),
            "home" => {
                self.cursor_position = 0;
                cx.notify();
            }
            "end" => {
                self.cursor_position = self.text.len();
                cx.notify();
            }
            "enter" => self.send(cx),
            key => {
                if let Some(key_char) = event.keystroke.key_char.clone() {
                    if !modifiers.control && !modifiers.alt && !modifiers.platform {
                        self.insert_text(&key_char, cx);
                    }
                } else if key == "space" && !modifiers.control && !modifiers.alt {
                    self.insert_text(" ", cx);
                }
            }
        }
    }

    fn render_text_with_cursor(&self, is_focused: bool, theme: &Theme) -> impl IntoElement {
        if self.text.is_empty() {
            return div()
                .text_color(theme.text_muted)
                .child(self.placeholder.clone())
                .into_any_element();
        }

        let (before, after) = self.text.split_at(self.cursor_position);

        div()
            .flex()
            .child(div().child(before.to_string()))
            .when(is_focused, |el| {
                el.child(div().w(px(2.0)).h(px(18.0)).bg(theme.primary))
            })
            .child(div().child(after.to_string()))
            .into_any_element()
    }
}

impl EventEmitter<SendMessage> for ChatInput {}

impl Render for ChatInput {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.global::<Theme>();
        let is_focused = self.focus_handle.is_focused(window);
        let can_send = !self.text.trim().is_empty() && !self.disabled;

        let border_color = if is_focused { theme.primary } else { theme.border };

        div()
            .p(px(12.0))
            .flex()
            .gap(px(8.0))
            .when(self.disabled, |el| el.opacity(0.6))
            .child(
                div()
                    .id("chat-input")
                    .track_focus(&self.focus_handle)
                    .flex_1()
                    .min_h(px(44.0))
                    .px(px(14.0))
                    .py(px(10.0))
                    .rounded(px(22.0))
                    .bg(theme.background)
                    .border_1()
                    .border_color(border_color)
                    .cursor_text()
                    .on_key_down(cx.listener(|this, event, _window, cx| {
                        this.handle_key_down(event, cx);
                    }))
                    .child(self.render_text_with_cursor(is_focused, theme)),
            )
            .child(
                AddButton::new("send-button", "Senden")
                    .show_icon(false)
                    .loading(self.disabled)
                    .disabled(!can_send && !self.disabled)
                    .on_click(cx.listener(|this, _event, _window, cx| {
                        this.send(cx);
                    })),
            )
    }
}
