//! Chat view for AI meal entry
//!
//! Hosts one [`ChatSession`] per screen incarnation and drives its
//! effects: generation calls run on the shared Tokio runtime, the
//! placeholder delay and the scroll debounce run as GPUI timer tasks.
//! Dropping a timer task cancels it.

use gpui::prelude::*;
use gpui::*;

use mahlzeit_core::{
    ChatMessage, ChatSession, Effect, MessageKind, SessionEvent, PLACEHOLDER_DELAY, SCROLL_DEBOUNCE,
};

use crate::api::ApiState;
use crate::components::chat_input::{ChatInput, SendMessage};
use crate::theme::{with_alpha, Theme};

/// Emitted when the user closes the chat
pub struct Dismissed;

/// Chat screen driving one meal entry conversation
pub struct ChatScreen {
    session: ChatSession,
    input: Entity<ChatInput>,
    scroll_handle: ScrollHandle,
    placeholder_timer: Option<Task<()>>,
    scroll_timer: Option<Task<()>>,
}

impl ChatScreen {
    pub fn new(cx: &mut Context<Self>) -> Self {
        let chat_id = format!("chat-{}", uuid::Uuid::new_v4());
        let input = cx.new(ChatInput::new);

        cx.subscribe(&input, |this, _input, event: &SendMessage, cx| {
            this.handle_event(SessionEvent::Submitted(event.content.clone()), cx);
        })
        .detach();

        Self {
            session: ChatSession::new(&chat_id),
            input,
            scroll_handle: ScrollHandle::new(),
            placeholder_timer: None,
            scroll_timer: None,
        }
    }

    /// Move keyboard focus into the input box.
    pub fn focus_input(&self, window: &mut Window, cx: &mut Context<Self>) {
        self.input.update(cx, |input, cx| input.focus(window, cx));
    }

    /// Apply one session event and execute the resulting effects.
    fn handle_event(&mut self, event: SessionEvent, cx: &mut Context<Self>) {
        let effects = self.session.apply(event);

        for effect in effects {
            match effect {
                Effect::StartGeneration { token, prompt } => {
                    self.start_generation(token, prompt, cx);
                }
                Effect::SchedulePlaceholder => {
                    self.placeholder_timer = Some(cx.spawn(async move |this, cx| {
                        cx.background_executor().timer(PLACEHOLDER_DELAY).await;
                        let _ = this.update(cx, |this, cx| {
                            this.handle_event(SessionEvent::PlaceholderDelayElapsed, cx);
                        });
                    }));
                }
                Effect::CancelPlaceholder => {
                    // Dropping the task cancels the timer.
                    self.placeholder_timer = None;
                }
                Effect::ScheduleScroll => {
                    self.scroll_timer = Some(cx.spawn(async move |this, cx| {
                        cx.background_executor().timer(SCROLL_DEBOUNCE).await;
                        let _ = this.update(cx, |this, cx| {
                            this.scroll_handle.scroll_to_bottom();
                            cx.notify();
                        });
                    }));
                }
            }
        }

        let generating = self.session.is_generating();
        self.input.update(cx, |input, cx| {
            input.set_disabled(generating, cx);
        });

        cx.notify();
    }

    fn start_generation(
        &mut self,
        token: mahlzeit_core::GenerationToken,
        prompt: String,
        cx: &mut Context<Self>,
    ) {
        let api_state = cx.global::<ApiState>();
        let client = api_state.client.clone();
        let runtime = api_state.runtime.clone();

        cx.spawn(async move |this, cx| {
            let result = runtime
                .spawn(async move { client.generate_entries(&prompt).await })
                .await;

            let event = match result {
                Ok(Ok(response)) => SessionEvent::CallResolved { token, response },
                Ok(Err(err)) => {
                    tracing::error!(error = %err, "generation call failed");
                    SessionEvent::CallRejected {
                        token,
                        reason: err.to_string(),
                    }
                }
                Err(err) => {
                    tracing::error!(error = %err, "generation task panicked");
                    SessionEvent::CallRejected {
                        token,
                        reason: err.to_string(),
                    }
                }
            };

            let _ = this.update(cx, |this, cx| {
                this.handle_event(event, cx);
            });
        })
        .detach();
    }

    fn render_message(&self, message: &ChatMessage, theme: &Theme) -> AnyElement {
        let is_user = message.role() == mahlzeit_core::ChatRole::User;

        let bubble = match message.kind() {
            MessageKind::Loading => div()
                .max_w(px(320.0))
                .px(px(14.0))
                .py(px(10.0))
                .rounded(px(16.0))
                .bg(theme.foreground)
                .text_color(theme.text_muted)
                .italic()
                .child(message.content().to_string()),
            MessageKind::Error => div()
                .max_w(px(320.0))
                .px(px(14.0))
                .py(px(10.0))
                .rounded(px(16.0))
                .bg(with_alpha(theme.error, 0.1))
                .border_1()
                .border_color(theme.error)
                .text_color(theme.text)
                .child(message.content().to_string()),
            MessageKind::Text => {
                let (bg, fg) = if is_user {
                    (theme.primary, theme.text_foreground)
                } else {
                    (theme.foreground, theme.text)
                };
                div()
                    .max_w(px(320.0))
                    .px(px(14.0))
                    .py(px(10.0))
                    .rounded(px(16.0))
                    .bg(bg)
                    .text_color(fg)
                    .child(message.content().to_string())
            }
        };

        let attachments = message.attachments().to_vec();

        div()
            .w_full()
            .flex()
            .flex_col()
            .gap(px(4.0))
            .when(is_user, |el| el.items_end())
            .when(!is_user, |el| el.items_start())
            .child(bubble)
            .when(!attachments.is_empty(), |el| {
                el.child(
                    div()
                        .flex()
                        .flex_col()
                        .gap(px(4.0))
                        .children(attachments.into_iter().map(|entry| {
                            let summary = match entry.calories_kcal {
                                Some(kcal) => format!("{} · {:.0} kcal", entry.name, kcal),
                                None => entry.name.clone(),
                            };
                            div()
                                .px(px(10.0))
                                .py(px(6.0))
                                .rounded(px(12.0))
                                .bg(theme.background_element)
                                .border_1()
                                .border_color(theme.border_subtle)
                                .text_sm()
                                .text_color(theme.text)
                                .child(summary)
                        })),
                )
            })
            .into_any_element()
    }
}

impl EventEmitter<Dismissed> for ChatScreen {}

impl Render for ChatScreen {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.global::<Theme>().clone();
        let messages: Vec<ChatMessage> = self.session.messages().to_vec();

        div()
            .size_full()
            .flex()
            .flex_col()
            .bg(theme.background_panel)
            .rounded(px(24.0))
            .overflow_hidden()
            .child(
                // Header with close button
                div()
                    .p(px(12.0))
                    .flex()
                    .justify_start()
                    .child(
                        div()
                            .id("close-chat")
                            .w(px(36.0))
                            .h(px(36.0))
                            .rounded_full()
                            .bg(theme.foreground)
                            .shadow_md()
                            .flex()
                            .items_center()
                            .justify_center()
                            .cursor_pointer()
                            .hover(|s| s.opacity(0.8))
                            .on_click(cx.listener(|_this, _event, _window, cx| {
                                cx.emit(Dismissed);
                            }))
                            .child(div().text_color(theme.text).child("×")),
                    ),
            )
            .child(
                div()
                    .id("messages")
                    .flex_1()
                    .overflow_y_scroll()
                    .track_scroll(&self.scroll_handle)
                    .px(px(12.0))
                    .pb(px(32.0))
                    .flex()
                    .flex_col()
                    .gap(px(8.0))
                    .children(
                        messages
                            .iter()
                            .map(|message| self.render_message(message, &theme)),
                    ),
            )
            .child(self.input.clone())
    }
}
