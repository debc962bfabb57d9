use std::{sync::Arc, time::Duration};

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::{
    analysis::format_chat_seed,
    content::{text, TextKey},
    context::Language,
    error::{CoreError, CoreResult},
    events::{CoreEvent, EventSink},
    log_info, log_warn,
};

use super::{
    client::ConversationService,
    thread::{ChatSnapshot, ChatThread, Role},
};

const ENABLE_LOGS: bool = true;

/// The thread's typing flag doubles as the outstanding-request marker.
struct ChatState {
    thread: ChatThread,
    /// Cancelled on `clear()` so late replies and pending warnings are dropped.
    generation: CancellationToken,
}

impl ChatState {
    fn new() -> Self {
        Self {
            thread: ChatThread::new(),
            generation: CancellationToken::new(),
        }
    }
}

/// One conversation with the assistant. At most one request is outstanding.
#[derive(Clone)]
pub struct ChatSession {
    state: Arc<Mutex<ChatState>>,
    service: Arc<dyn ConversationService>,
    events: Arc<dyn EventSink>,
    warning_delay: Duration,
}

impl ChatSession {
    pub fn new(
        service: Arc<dyn ConversationService>,
        events: Arc<dyn EventSink>,
        warning_delay: Duration,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(ChatState::new())),
            service,
            events,
            warning_delay,
        }
    }

    pub async fn snapshot(&self) -> ChatSnapshot {
        self.state.lock().await.thread.snapshot()
    }

    /// Sends one user message and waits for the reply. Blank input changes
    /// nothing; a second send while a reply is outstanding is refused.
    pub async fn send(&self, message: &str, language: Language) -> CoreResult<ChatSnapshot> {
        let message = message.trim();

        let generation = {
            let mut state = self.state.lock().await;
            if message.is_empty() {
                return Ok(state.thread.snapshot());
            }
            if state.thread.is_typing() {
                return Err(CoreError::Busy);
            }
            state.thread.push(Role::User, message);
            state.thread.set_typing(true);
            self.events
                .emit(CoreEvent::ChatChanged(state.thread.snapshot()));
            state.generation.clone()
        };

        let outcome = self.service.reply(message, language).await;

        let mut state = self.state.lock().await;
        if generation.is_cancelled() {
            log_info!("dropping chat reply for a cleared conversation");
            return Ok(state.thread.snapshot());
        }

        state.thread.set_typing(false);
        match outcome {
            Ok(reply) => {
                state.thread.push(Role::Assistant, reply.text);
                if reply.low_confidence {
                    self.schedule_warning(generation, language);
                }
            }
            Err(err) => {
                log_warn!("chat reply failed: {}", err);
                state
                    .thread
                    .push(Role::Assistant, text(language, TextKey::ChatApology));
            }
        }

        let snapshot = state.thread.snapshot();
        self.events.emit(CoreEvent::ChatChanged(snapshot.clone()));
        Ok(snapshot)
    }

    /// Asks about a classified condition using the prefilled question.
    pub async fn discuss(&self, label: &str, language: Language) -> CoreResult<ChatSnapshot> {
        self.send(&format_chat_seed(label, language), language).await
    }

    pub async fn clear(&self) -> ChatSnapshot {
        let mut state = self.state.lock().await;
        state.generation.cancel();
        state.generation = CancellationToken::new();
        state.thread.clear();
        let snapshot = state.thread.snapshot();
        self.events.emit(CoreEvent::ChatChanged(snapshot.clone()));
        snapshot
    }

    fn schedule_warning(&self, generation: CancellationToken, language: Language) {
        let state = Arc::clone(&self.state);
        let events = Arc::clone(&self.events);
        let delay = self.warning_delay;

        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {
                    let mut state = state.lock().await;
                    if generation.is_cancelled() {
                        return;
                    }
                    state
                        .thread
                        .push(Role::Assistant, text(language, TextKey::ChatLowConfidenceWarning));
                    events.emit(CoreEvent::ChatChanged(state.thread.snapshot()));
                }
                _ = generation.cancelled() => {}
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        chat::{client::ChatReply, LocalAssistant},
        error::ServiceError,
        events::MemorySink,
    };
    use async_trait::async_trait;
    use std::sync::Mutex as StdMutex;

    const DELAY: Duration = Duration::from_millis(500);

    struct ScriptedAssistant {
        replies: StdMutex<Vec<Result<ChatReply, ServiceError>>>,
        received: StdMutex<Vec<String>>,
    }

    impl ScriptedAssistant {
        fn new(replies: Vec<Result<ChatReply, ServiceError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: StdMutex::new(replies),
                received: StdMutex::new(Vec::new()),
            })
        }

        fn received(&self) -> Vec<String> {
            self.received.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ConversationService for ScriptedAssistant {
        async fn reply(&self, message: &str, _language: Language) -> Result<ChatReply, ServiceError> {
            self.received.lock().unwrap().push(message.to_string());
            let mut replies = self.replies.lock().unwrap();
            if replies.is_empty() {
                return Err(ServiceError::Transport("no scripted reply".into()));
            }
            replies.remove(0)
        }
    }

    fn reply(text: &str, low_confidence: bool) -> Result<ChatReply, ServiceError> {
        Ok(ChatReply {
            text: text.to_string(),
            low_confidence,
            has_prediction: true,
        })
    }

    fn session(service: Arc<dyn ConversationService>) -> (ChatSession, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        (ChatSession::new(service, sink.clone(), DELAY), sink)
    }

    fn texts(snapshot: &ChatSnapshot) -> Vec<(Role, String)> {
        snapshot
            .messages
            .iter()
            .map(|m| (m.role, m.text.clone()))
            .collect()
    }

    #[tokio::test]
    async fn blank_input_is_a_noop() {
        let service = ScriptedAssistant::new(vec![]);
        let (chat, sink) = session(service.clone());

        let snapshot = chat.send("   \n\t ", Language::En).await.unwrap();

        assert!(snapshot.messages.is_empty());
        assert!(service.received().is_empty());
        assert!(sink.events().is_empty());
    }

    #[tokio::test]
    async fn sends_trimmed_text_and_appends_reply() {
        let service = ScriptedAssistant::new(vec![reply("Moisturize often.", false)]);
        let (chat, sink) = session(service.clone());

        let snapshot = chat.send("  eczema tips? ", Language::En).await.unwrap();

        assert_eq!(service.received(), vec!["eczema tips?"]);
        assert_eq!(
            texts(&snapshot),
            vec![
                (Role::User, "eczema tips?".to_string()),
                (Role::Assistant, "Moisturize often.".to_string()),
            ]
        );
        assert!(!snapshot.typing);

        let typing_states: Vec<bool> = sink
            .events()
            .into_iter()
            .filter_map(|event| match event {
                CoreEvent::ChatChanged(snapshot) => Some(snapshot.typing),
                _ => None,
            })
            .collect();
        assert_eq!(typing_states, vec![true, false]);
    }

    #[tokio::test(start_paused = true)]
    async fn low_confidence_reply_is_followed_by_warning() {
        let service = ScriptedAssistant::new(vec![reply("It may be acne.", true)]);
        let (chat, _) = session(service);

        let snapshot = chat.send("what is it?", Language::En).await.unwrap();
        assert_eq!(snapshot.messages.len(), 2);

        tokio::time::sleep(DELAY - Duration::from_millis(1)).await;
        assert_eq!(chat.snapshot().await.messages.len(), 2);

        tokio::time::sleep(Duration::from_millis(50)).await;
        let snapshot = chat.snapshot().await;
        let roles: Vec<_> = snapshot.messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant, Role::Assistant]);
        assert_eq!(
            snapshot.messages[2].text,
            text(Language::En, TextKey::ChatLowConfidenceWarning)
        );
        assert!(snapshot.messages[2].timestamp >= snapshot.messages[1].timestamp);
    }

    #[tokio::test(start_paused = true)]
    async fn clear_cancels_pending_warning() {
        let service = ScriptedAssistant::new(vec![reply("Unclear.", true)]);
        let (chat, _) = session(service);

        chat.send("hello", Language::Tr).await.unwrap();
        let cleared = chat.clear().await;
        assert!(cleared.messages.is_empty());
        assert!(!cleared.typing);
        tokio::time::sleep(DELAY * 2).await;

        assert!(chat.snapshot().await.messages.is_empty());
    }

    #[tokio::test]
    async fn clear_mid_request_drops_late_reply_and_unblocks_send() {
        let service = Arc::new(GatedAssistant {
            gate: tokio::sync::Semaphore::new(0),
        });
        let (chat, _) = session(service.clone());

        let first = tokio::spawn({
            let chat = chat.clone();
            async move { chat.send("one", Language::En).await }
        });
        while !chat.snapshot().await.typing {
            tokio::task::yield_now().await;
        }

        let cleared = chat.clear().await;
        assert!(!cleared.typing);

        service.gate.add_permits(1);
        assert!(first.await.unwrap().unwrap().messages.is_empty());

        service.gate.add_permits(1);
        let snapshot = chat.send("two", Language::En).await.unwrap();
        let texts: Vec<_> = snapshot.messages.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["two", "done"]);
    }

    #[tokio::test]
    async fn failures_become_a_localized_apology() {
        let service = ScriptedAssistant::new(vec![
            Err(ServiceError::Rejected(Some("quota exceeded".into()))),
            Err(ServiceError::Transport("connection refused".into())),
        ]);
        let (chat, _) = session(service.clone());

        chat.send("first", Language::Tr).await.unwrap();
        let snapshot = chat.send("second", Language::En).await.unwrap();

        assert_eq!(service.received().len(), 2);
        assert_eq!(
            snapshot.messages[1].text,
            text(Language::Tr, TextKey::ChatApology)
        );
        assert_eq!(
            snapshot.messages[3].text,
            text(Language::En, TextKey::ChatApology)
        );
    }

    struct GatedAssistant {
        gate: tokio::sync::Semaphore,
    }

    #[async_trait]
    impl ConversationService for GatedAssistant {
        async fn reply(&self, _message: &str, _language: Language) -> Result<ChatReply, ServiceError> {
            let _permit = self
                .gate
                .acquire()
                .await
                .map_err(|err| ServiceError::Transport(err.to_string()))?;
            reply("done", false)
        }
    }

    #[tokio::test]
    async fn second_send_is_refused_while_awaiting() {
        let service = Arc::new(GatedAssistant {
            gate: tokio::sync::Semaphore::new(0),
        });
        let (chat, _) = session(service.clone());

        let first = tokio::spawn({
            let chat = chat.clone();
            async move { chat.send("one", Language::En).await }
        });
        while !chat.snapshot().await.typing {
            tokio::task::yield_now().await;
        }

        assert!(matches!(
            chat.send("two", Language::En).await,
            Err(CoreError::Busy)
        ));

        service.gate.add_permits(1);
        let snapshot = first.await.unwrap().unwrap();
        assert_eq!(snapshot.messages.len(), 2);
        assert!(!snapshot.typing);
    }

    #[tokio::test]
    async fn discuss_sends_the_seed_question() {
        let service = ScriptedAssistant::new(vec![reply("Vitiligo is...", false)]);
        let (chat, _) = session(service.clone());

        chat.discuss("Vitiligo", Language::En).await.unwrap();

        assert_eq!(
            service.received(),
            vec![format_chat_seed("Vitiligo", Language::En)]
        );
    }

    #[tokio::test]
    async fn offline_assistant_answers_locally() {
        let (chat, _) = session(Arc::new(LocalAssistant));
        let snapshot = chat.send("I have a pimple", Language::En).await.unwrap();
        assert!(snapshot.messages[1].text.starts_with("Acne is caused"));
    }
}
