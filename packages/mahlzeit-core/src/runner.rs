//! Tokio driver for the chat session state machine.
//!
//! The runner owns the session behind a single consumer task: every
//! input goes through one queue, so all mutations of the message list
//! are serialized exactly like on a UI event loop. Timers (placeholder
//! insertion, scroll debounce) are spawned tasks that feed events back
//! into the queue and are aborted on cancellation and on teardown.

use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::session::{
    ChatSession, Effect, SessionEvent, PLACEHOLDER_DELAY, SCROLL_DEBOUNCE,
};
use crate::types::{ChatMessage, GenerationResponse};
use crate::{Error, Result};

/// Generation backend invoked with the built prompt.
///
/// Implementations live outside this crate (the desktop app uses an
/// HTTP client); tests inject mocks.
pub trait GenerateEntries: Send + Sync + 'static {
    fn generate(&self, prompt: String) -> BoxFuture<'static, Result<GenerationResponse>>;
}

/// Observable state of a running session.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    /// Messages in append order.
    pub messages: Vec<ChatMessage>,
    /// Whether a generation call is in flight.
    pub is_generating: bool,
    /// Bumped each time the debounced scroll-to-end fires; a view layer
    /// scrolls when it observes a new value.
    pub scroll_generation: u64,
}

/// Everything flowing through the runner queue. Session events are
/// forwarded to the state machine; the scroll tick is handled by the
/// runner itself.
#[derive(Debug)]
enum RunnerMessage {
    Event(SessionEvent),
    ScrollElapsed,
}

/// Owns one chat session and the task driving it.
///
/// Dropping the runner tears the session down: the event loop stops and
/// all pending timers are released. An in-flight generation call is not
/// cancelled; its late result has nowhere to go and is dropped.
pub struct SessionRunner {
    events: mpsc::UnboundedSender<RunnerMessage>,
    snapshot: watch::Receiver<SessionSnapshot>,
    task: JoinHandle<()>,
}

impl SessionRunner {
    /// Start a fresh session on the current tokio runtime.
    pub fn spawn(chat_id: &str, backend: Arc<dyn GenerateEntries>) -> Self {
        let session = ChatSession::new(chat_id);
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(snapshot_of(&session, 0));

        let task = tokio::spawn(run_loop(
            session,
            events_rx,
            events_tx.clone(),
            snapshot_tx,
            backend,
        ));

        Self {
            events: events_tx,
            snapshot: snapshot_rx,
            task,
        }
    }

    /// Submit user input. Rejects blank text at the boundary so the
    /// state machine only ever sees real submissions.
    pub fn submit(&self, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Err(Error::EmptyMessage);
        }
        self.events
            .send(RunnerMessage::Event(SessionEvent::Submitted(
                text.to_string(),
            )))
            .map_err(|_| Error::SessionClosed)
    }

    /// Current snapshot of the session.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot updates.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot.clone()
    }
}

impl Drop for SessionRunner {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn snapshot_of(session: &ChatSession, scroll_generation: u64) -> SessionSnapshot {
    SessionSnapshot {
        messages: session.messages().to_vec(),
        is_generating: session.is_generating(),
        scroll_generation,
    }
}

async fn run_loop(
    mut session: ChatSession,
    mut events_rx: mpsc::UnboundedReceiver<RunnerMessage>,
    events_tx: mpsc::UnboundedSender<RunnerMessage>,
    snapshot_tx: watch::Sender<SessionSnapshot>,
    backend: Arc<dyn GenerateEntries>,
) {
    let mut scroll_generation: u64 = 0;
    let mut placeholder_timer: Option<JoinHandle<()>> = None;
    let mut scroll_timer: Option<JoinHandle<()>> = None;

    while let Some(message) = events_rx.recv().await {
        match message {
            RunnerMessage::ScrollElapsed => {
                scroll_generation += 1;
            }
            RunnerMessage::Event(event) => {
                for effect in session.apply(event) {
                    match effect {
                        Effect::StartGeneration { token, prompt } => {
                            let backend = backend.clone();
                            let events = events_tx.clone();
                            tokio::spawn(async move {
                                let event = match backend.generate(prompt).await {
                                    Ok(response) => SessionEvent::CallResolved { token, response },
                                    Err(error) => SessionEvent::CallRejected {
                                        token,
                                        reason: error.to_string(),
                                    },
                                };
                                // Queue may be gone if the session was
                                // torn down mid-flight.
                                let _ = events.send(RunnerMessage::Event(event));
                            });
                        }
                        Effect::SchedulePlaceholder => {
                            abort_timer(&mut placeholder_timer);
                            let events = events_tx.clone();
                            placeholder_timer = Some(tokio::spawn(async move {
                                tokio::time::sleep(PLACEHOLDER_DELAY).await;
                                let _ = events.send(RunnerMessage::Event(
                                    SessionEvent::PlaceholderDelayElapsed,
                                ));
                            }));
                        }
                        Effect::CancelPlaceholder => {
                            abort_timer(&mut placeholder_timer);
                        }
                        Effect::ScheduleScroll => {
                            abort_timer(&mut scroll_timer);
                            let events = events_tx.clone();
                            scroll_timer = Some(tokio::spawn(async move {
                                tokio::time::sleep(SCROLL_DEBOUNCE).await;
                                let _ = events.send(RunnerMessage::ScrollElapsed);
                            }));
                        }
                    }
                }
            }
        }

        if snapshot_tx
            .send(snapshot_of(&session, scroll_generation))
            .is_err()
        {
            // Nobody is watching anymore.
            break;
        }
    }

    abort_timer(&mut placeholder_timer);
    abort_timer(&mut scroll_timer);
}

fn abort_timer(timer: &mut Option<JoinHandle<()>>) {
    if let Some(handle) = timer.take() {
        handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChatRole, MealEntry};
    use futures::FutureExt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Notify;

    /// Backend that blocks until the test releases it, counting calls.
    struct GatedBackend {
        release: Arc<Notify>,
        calls: AtomicUsize,
        result: Result<GenerationResponse>,
    }

    impl GatedBackend {
        fn ok(response: GenerationResponse) -> Arc<Self> {
            Arc::new(Self {
                release: Arc::new(Notify::new()),
                calls: AtomicUsize::new(0),
                result: Ok(response),
            })
        }

        fn failing(reason: &str) -> Arc<Self> {
            Arc::new(Self {
                release: Arc::new(Notify::new()),
                calls: AtomicUsize::new(0),
                result: Err(Error::Generation(reason.to_string())),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl GenerateEntries for GatedBackend {
        fn generate(&self, _prompt: String) -> BoxFuture<'static, Result<GenerationResponse>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let release = self.release.clone();
            let result = match &self.result {
                Ok(response) => Ok(response.clone()),
                Err(Error::Generation(reason)) => Err(Error::Generation(reason.clone())),
                Err(_) => unreachable!("tests only use Generation errors"),
            };
            async move {
                release.notified().await;
                result
            }
            .boxed()
        }
    }

    /// Backend that resolves immediately.
    struct InstantBackend {
        response: GenerationResponse,
    }

    impl GenerateEntries for InstantBackend {
        fn generate(&self, _prompt: String) -> BoxFuture<'static, Result<GenerationResponse>> {
            let response = self.response.clone();
            async move { Ok(response) }.boxed()
        }
    }

    fn notiert_response() -> GenerationResponse {
        GenerationResponse {
            answer_text: "Notiert!".into(),
            entries: vec![MealEntry::named("Apple")],
        }
    }

    async fn wait_for(
        rx: &mut watch::Receiver<SessionSnapshot>,
        predicate: impl Fn(&SessionSnapshot) -> bool,
    ) -> SessionSnapshot {
        tokio::time::timeout(Duration::from_secs(30), async {
            loop {
                {
                    let snapshot = rx.borrow_and_update();
                    if predicate(&snapshot) {
                        return snapshot.clone();
                    }
                }
                rx.changed().await.expect("session ended unexpectedly");
            }
        })
        .await
        .expect("condition not reached in time")
    }

    fn loading_count(snapshot: &SessionSnapshot) -> usize {
        snapshot.messages.iter().filter(|m| m.is_loading()).count()
    }

    #[tokio::test(start_paused = true)]
    async fn test_placeholder_lifecycle_end_to_end() {
        let backend = GatedBackend::ok(notiert_response());
        let runner = SessionRunner::spawn("chat-1", backend.clone());
        let mut rx = runner.subscribe();

        runner.submit("Ich hatte einen Apfel").unwrap();

        // Pending longer than the insertion delay: exactly one
        // placeholder appears.
        let snapshot = wait_for(&mut rx, |s| loading_count(s) == 1).await;
        assert!(snapshot.is_generating);
        assert_eq!(backend.calls(), 1);

        // Resolve the call: the placeholder disappears and the reply
        // lands with its attachment.
        backend.release.notify_one();
        let snapshot = wait_for(&mut rx, |s| !s.is_generating).await;

        assert_eq!(loading_count(&snapshot), 0);
        let last = snapshot.messages.last().unwrap();
        assert_eq!(last.content(), "Notiert!");
        assert_eq!(last.attachments(), &[MealEntry::named("Apple")]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fast_resolution_never_shows_placeholder() {
        let backend = Arc::new(InstantBackend {
            response: notiert_response(),
        });
        let runner = SessionRunner::spawn("chat-1", backend);
        let mut rx = runner.subscribe();

        runner.submit("Ich hatte einen Apfel").unwrap();

        let snapshot = wait_for(&mut rx, |s| !s.is_generating && s.messages.len() == 3).await;

        // greeting, user message, assistant reply; no placeholder left.
        assert_eq!(loading_count(&snapshot), 0);
        assert_eq!(snapshot.messages[2].content(), "Notiert!");
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_while_pending_makes_no_second_call() {
        let backend = GatedBackend::ok(notiert_response());
        let runner = SessionRunner::spawn("chat-1", backend.clone());
        let mut rx = runner.subscribe();

        runner.submit("Ich hatte einen Apfel").unwrap();
        wait_for(&mut rx, |s| s.is_generating).await;
        runner.submit("Und eine Banane").unwrap();
        wait_for(&mut rx, |s| s.messages.len() >= 3).await;

        backend.release.notify_one();
        let snapshot = wait_for(&mut rx, |s| !s.is_generating).await;

        assert_eq!(backend.calls(), 1);
        let roles: Vec<ChatRole> = snapshot.messages.iter().map(|m| m.role()).collect();
        assert_eq!(
            roles,
            vec![
                ChatRole::Assistant, // greeting
                ChatRole::User,
                ChatRole::User,
                ChatRole::Assistant,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_surfaces_error_bubble() {
        let backend = GatedBackend::failing("backend unreachable");
        let runner = SessionRunner::spawn("chat-1", backend.clone());
        let mut rx = runner.subscribe();

        runner.submit("Ich hatte einen Apfel").unwrap();
        wait_for(&mut rx, |s| loading_count(s) == 1).await;

        backend.release.notify_one();
        let snapshot = wait_for(&mut rx, |s| !s.is_generating).await;

        assert_eq!(loading_count(&snapshot), 0);
        let last = snapshot.messages.last().unwrap();
        assert_eq!(last.kind(), crate::types::MessageKind::Error);
    }

    #[tokio::test(start_paused = true)]
    async fn test_scroll_debounce_fires_after_append() {
        let backend = Arc::new(InstantBackend {
            response: notiert_response(),
        });
        let runner = SessionRunner::spawn("chat-1", backend);
        let mut rx = runner.subscribe();
        assert_eq!(runner.snapshot().scroll_generation, 0);

        runner.submit("Ich hatte einen Apfel").unwrap();

        let snapshot = wait_for(&mut rx, |s| s.scroll_generation > 0).await;
        assert!(!snapshot.is_generating);
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_submit_rejected_at_boundary() {
        let backend = Arc::new(InstantBackend {
            response: notiert_response(),
        });
        let runner = SessionRunner::spawn("chat-1", backend);

        assert!(matches!(runner.submit("   "), Err(Error::EmptyMessage)));
        assert_eq!(runner.snapshot().messages.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_closes_the_snapshot_stream() {
        let backend = GatedBackend::ok(notiert_response());
        let runner = SessionRunner::spawn("chat-1", backend);
        let mut rx = runner.subscribe();

        runner.submit("Ich hatte einen Apfel").unwrap();
        wait_for(&mut rx, |s| s.is_generating).await;

        drop(runner);

        // The loop task is gone; the watch channel closes.
        tokio::time::timeout(Duration::from_secs(5), async {
            while rx.changed().await.is_ok() {}
        })
        .await
        .expect("stream did not close after teardown");
    }
}
