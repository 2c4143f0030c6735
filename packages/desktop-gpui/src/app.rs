//! Main application root view
//!
//! AppRoot shows the home screen with the entry button and hosts the
//! chat panel as an overlay. The chat entity is created when the panel
//! opens and dropped when it closes, so every visit starts a fresh
//! conversation.

use gpui::prelude::*;
use gpui::*;

use crate::components::button::AddButton;
use crate::state::AppState;
use crate::theme::{with_alpha, Theme};
use crate::views::chat::{ChatScreen, Dismissed};

/// Root view of the application
pub struct AppRoot {
    chat_screen: Option<Entity<ChatScreen>>,
}

impl AppRoot {
    pub fn new(_cx: &mut Context<Self>) -> Self {
        Self { chat_screen: None }
    }

    fn open_chat(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        if self.chat_screen.is_some() {
            return;
        }

        let screen = cx.new(ChatScreen::new);
        cx.subscribe(&screen, |this, _screen, _event: &Dismissed, cx| {
            this.close_chat(cx);
        })
        .detach();

        // The user came here to type; focus the input right away.
        screen.update(cx, |screen, cx| screen.focus_input(window, cx));

        self.chat_screen = Some(screen);
        cx.global_mut::<AppState>().open_chat();
        cx.notify();
    }

    fn close_chat(&mut self, cx: &mut Context<Self>) {
        // Dropping the entity tears down the session and its timers.
        self.chat_screen = None;
        cx.global_mut::<AppState>().close_chat();
        cx.notify();
    }

    fn render_home(&self, theme: &Theme, cx: &mut Context<Self>) -> impl IntoElement {
        let state = cx.global::<AppState>();
        let chat_open = state.chat_open;
        let backend_url = state.backend_url.clone();

        div()
            .size_full()
            .flex()
            .flex_col()
            .items_center()
            .justify_center()
            .gap(px(16.0))
            .child(
                div()
                    .text_2xl()
                    .font_weight(FontWeight::BOLD)
                    .child("Mahlzeit"),
            )
            .child(
                div()
                    .text_color(theme.text_muted)
                    .child("Beschreibe dein Essen, die KI erstellt die Einträge."),
            )
            .child(
                AddButton::new("open-chat", "Mahlzeit per KI-Chat erfassen")
                    .disabled(chat_open)
                    .on_click(cx.listener(|this, _event: &ClickEvent, window, cx| {
                        this.open_chat(window, cx);
                    })),
            )
            .child(
                div()
                    .text_xs()
                    .text_color(theme.text_muted)
                    .child(backend_url),
            )
    }

    fn render_chat_overlay(
        &self,
        screen: Entity<ChatScreen>,
        theme: &Theme,
        cx: &mut Context<Self>,
    ) -> impl IntoElement {
        div()
            .id("chat-overlay")
            .absolute()
            .inset_0()
            .bg(with_alpha(theme.shadow, 0.32))
            .flex()
            .items_end()
            .justify_center()
            .p(px(12.0))
            .on_click(cx.listener(|this, _event, _window, cx| {
                this.close_chat(cx);
            }))
            .child(
                div()
                    .occlude()
                    .w_full()
                    .h(px(640.0))
                    .child(screen),
            )
    }
}

impl Render for AppRoot {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.global::<Theme>().clone();

        let mut root = div()
            .relative()
            .size_full()
            .bg(theme.background)
            .text_color(theme.text)
            .child(self.render_home(&theme, cx));

        if let Some(screen) = self.chat_screen.clone() {
            root = root.child(self.render_chat_overlay(screen, &theme, cx));
        }

        root
    }
}
