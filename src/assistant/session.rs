use futures_util::FutureExt;
use futures_util::Stream;
use futures_util::future::BoxFuture;
use std::fmt;
use std::future::IntoFuture;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use super::client::{
    ApiFlavor, CompletionRequest, EndpointConfig, GenerationOptions, HttpBackend, InferenceBackend,
};
use super::error::{BackendError, ConfigError};
use super::fallback::fallback_response;
use super::language::Language;
use super::message::ChatMessage;
use super::transcript::{DEFAULT_MAX_TRANSCRIPT, Transcript};
use crate::history::{DEFAULT_HISTORY_KEY, DEFAULT_LANGUAGE_KEY, TranscriptStore};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_CONTEXT_MESSAGES: usize = 10;
pub const DEFAULT_HISTORY_LIMIT: usize = 25;

const EVENT_CAPACITY: usize = 64;

/// Connectivity to the inference endpoint, as last observed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Degraded,
}

impl ConnectionState {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Degraded => "degraded",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings fixed for the lifetime of a session.
///
/// `language` and `model` are only the starting values; they can be changed
/// on a live session with [`ChatSession::toggle_language`] and
/// [`ChatSession::set_model`]. A language saved under `language_key` replaces
/// `language` when the session is restored from a store.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub endpoint: EndpointConfig,
    pub model: String,
    /// Models offered by the endpoint, cycled by [`ChatSession::cycle_model`].
    pub models: Vec<String>,
    pub language: Language,
    pub options: GenerationOptions,
    /// Upper bound for a single remote call (completion or probe).
    pub timeout: Duration,
    /// Number of previous transcript entries sent along with a question.
    pub context_messages: usize,
    pub max_transcript: usize,
    /// Number of messages persisted and restored.
    pub history_limit: usize,
    pub history_key: String,
    pub language_key: String,
}

impl SessionConfig {
    /// Creates a configuration with default tuning for an Ollama endpoint.
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: EndpointConfig::new(endpoint, ApiFlavor::default()),
            model: model.into(),
            models: Vec::new(),
            language: Language::default(),
            options: GenerationOptions::default(),
            timeout: DEFAULT_TIMEOUT,
            context_messages: DEFAULT_CONTEXT_MESSAGES,
            max_transcript: DEFAULT_MAX_TRANSCRIPT,
            history_limit: DEFAULT_HISTORY_LIMIT,
            history_key: DEFAULT_HISTORY_KEY.to_string(),
            language_key: DEFAULT_LANGUAGE_KEY.to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.endpoint.validate()?;
        if self.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel);
        }
        if self.max_transcript == 0 {
            return Err(ConfigError::ZeroTranscriptCap);
        }
        Ok(())
    }
}

/// Change notifications for presentation layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    MessageAppended(ChatMessage),
    ConnectionChanged {
        previous: ConnectionState,
        current: ConnectionState,
    },
    LanguageChanged(Language),
    ModelChanged(String),
    Cleared,
}

/// Point-in-time view of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStatus {
    pub language: Language,
    pub model: String,
    pub connection: ConnectionState,
    pub transcript_len: usize,
}

/// An accepted question: the user message already in the transcript plus the
/// pending assistant reply.
///
/// Awaiting the submission (or [`Submission::reply`]) resolves the reply and
/// appends it to the transcript. Dropping it unawaited abandons the request.
pub struct Submission {
    message: ChatMessage,
    reply: BoxFuture<'static, ChatMessage>,
}

impl Submission {
    /// The user message appended by `submit`.
    pub const fn message(&self) -> &ChatMessage {
        &self.message
    }

    pub async fn reply(self) -> ChatMessage {
        self.reply.await
    }
}

impl IntoFuture for Submission {
    type Output = ChatMessage;
    type IntoFuture = BoxFuture<'static, ChatMessage>;

    fn into_future(self) -> Self::IntoFuture {
        self.reply
    }
}

struct State {
    transcript: Transcript,
    connection: ConnectionState,
    language: Language,
    model: String,
}

struct Inner<B> {
    config: SessionConfig,
    backend: B,
    state: Mutex<State>,
    events: broadcast::Sender<SessionEvent>,
    store: Option<Arc<dyn TranscriptStore>>,
}

/// Conversation state plus the dispatch of questions to the endpoint or the
/// offline fallback.
///
/// Cloning is cheap and yields another handle to the same session.
pub struct ChatSession<B = HttpBackend> {
    inner: Arc<Inner<B>>,
}

impl<B> Clone for ChatSession<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl ChatSession<HttpBackend> {
    /// Creates a session talking HTTP to `config.endpoint`.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        let backend = HttpBackend::new(&config.endpoint)?;
        Self::with_backend(config, backend)
    }
}

impl<B: InferenceBackend> ChatSession<B> {
    /// Creates a session with an empty transcript and no persistence.
    pub fn with_backend(config: SessionConfig, backend: B) -> Result<Self, ConfigError> {
        Self::build(config, backend, None, Vec::new())
    }

    /// Creates a session backed by `store`, restoring the most recent
    /// `history_limit` messages and the saved language.
    ///
    /// An unreadable slot is logged and treated as empty.
    pub fn restore(
        mut config: SessionConfig,
        backend: B,
        store: Arc<dyn TranscriptStore>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        match store.load_preference(&config.language_key) {
            Ok(Some(code)) => match code.parse::<Language>() {
                Ok(language) => config.language = language,
                Err(e) => warn!(error = %e, "ignoring saved language"),
            },
            Ok(None) => {}
            Err(e) => warn!(error = %e, "could not load saved language"),
        }

        let mut restored = store.load(&config.history_key).unwrap_or_else(|e| {
            warn!(error = %e, key = %config.history_key, "could not load chat history");
            Vec::new()
        });
        let skip = restored.len().saturating_sub(config.history_limit);
        restored.drain(..skip);
        debug!(count = restored.len(), "restored chat history");

        Self::build(config, backend, Some(store), restored)
    }

    fn build(
        config: SessionConfig,
        backend: B,
        store: Option<Arc<dyn TranscriptStore>>,
        restored: Vec<ChatMessage>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let state = State {
            transcript: Transcript::from_messages(restored, config.max_transcript),
            connection: ConnectionState::Disconnected,
            language: config.language,
            model: config.model.trim().to_string(),
        };
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Ok(Self {
            inner: Arc::new(Inner {
                config,
                backend,
                state: Mutex::new(state),
                events,
                store,
            }),
        })
    }

    /// Accepts a question.
    ///
    /// Returns `None` and leaves the transcript untouched when `text` is blank.
    /// Otherwise the user message is appended before this returns, and the
    /// returned [`Submission`] resolves to the assistant reply.
    pub fn submit(&self, text: &str) -> Option<Submission> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let message = ChatMessage::user(text);
        let (request, connected) = {
            let mut state = self.inner.lock();
            let context = state.transcript.recent(self.inner.config.context_messages);
            state.transcript.push(message.clone());

            let request = CompletionRequest {
                model: state.model.clone(),
                language: state.language,
                context,
                question: text.to_string(),
                options: self.inner.config.options,
            };
            (request, state.connection == ConnectionState::Connected)
        };
        self.inner.emit(SessionEvent::MessageAppended(message.clone()));

        let inner = Arc::clone(&self.inner);
        let reply = async move { inner.resolve(request, connected).await }.boxed();

        Some(Submission { message, reply })
    }

    /// Submits `text` and waits for the reply.
    pub async fn ask(&self, text: &str) -> Option<ChatMessage> {
        let submission = self.submit(text)?;
        Some(submission.await)
    }

    /// Canned answer for `text` in the session's current language.
    pub fn fallback_responder(&self, text: &str) -> &'static str {
        fallback_response(text, self.language())
    }

    /// Checks the endpoint's health path and updates the connection state.
    ///
    /// Cancelling the returned future while the state is still `Connecting`
    /// puts the session back to `Disconnected`.
    pub async fn probe_connection(&self) -> ConnectionState {
        let mut guard = ConnectingGuard {
            inner: &self.inner,
            armed: self.inner.begin_connecting(),
        };

        let timeout = self.inner.config.timeout;
        let result = tokio::time::timeout(timeout, self.inner.backend.probe())
            .await
            .unwrap_or_else(|_| Err(BackendError::Timeout(timeout)));

        let next = match result {
            Ok(()) => ConnectionState::Connected,
            Err(e) => {
                debug!(error = %e, "probe failed");
                ConnectionState::Degraded
            }
        };
        guard.armed = false;
        self.inner.set_connection(next);
        next
    }

    /// Switches between English and Portuguese. Returns the new language.
    pub fn toggle_language(&self) -> Language {
        let language = {
            let mut state = self.inner.lock();
            state.language = state.language.toggled();
            state.language
        };
        self.inner.language_changed(language);
        language
    }

    /// Selects the answer language for subsequent submissions.
    pub fn set_language(&self, language: Language) {
        self.inner.lock().language = language;
        self.inner.language_changed(language);
    }

    /// Selects the model used by subsequent submissions.
    ///
    /// Blank ids are ignored; returns whether the model was changed.
    pub fn set_model(&self, id: &str) -> bool {
        let id = id.trim();
        if id.is_empty() {
            return false;
        }

        self.inner.lock().model = id.to_string();
        self.inner.emit(SessionEvent::ModelChanged(id.to_string()));
        true
    }

    /// Advances to the next configured model, wrapping around.
    ///
    /// With no configured models the current one is kept.
    pub fn cycle_model(&self) -> String {
        let models = &self.inner.config.models;
        let current = self.model();
        if models.is_empty() {
            return current;
        }

        let next = models
            .iter()
            .position(|m| *m == current)
            .map_or(0, |i| (i + 1) % models.len());
        let model = models[next].clone();
        self.set_model(&model);
        model
    }

    /// Empties the transcript and its storage slot.
    pub fn clear(&self) {
        self.inner.lock().transcript.clear();

        if let Some(store) = &self.inner.store
            && let Err(e) = store.clear(&self.inner.config.history_key)
        {
            warn!(error = %e, "could not clear chat history");
        }
        self.inner.emit(SessionEvent::Cleared);
    }

    pub fn transcript(&self) -> Vec<ChatMessage> {
        self.inner.lock().transcript.to_vec()
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.inner.lock().connection
    }

    pub fn language(&self) -> Language {
        self.inner.lock().language
    }

    pub fn model(&self) -> String {
        self.inner.lock().model.clone()
    }

    pub fn status(&self) -> SessionStatus {
        let state = self.inner.lock();
        SessionStatus {
            language: state.language,
            model: state.model.clone(),
            connection: state.connection,
            transcript_len: state.transcript.len(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    /// Subscribes to change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    /// Change notifications as a stream. Lagging subscribers skip missed events.
    pub fn events(&self) -> impl Stream<Item = SessionEvent> + Send + 'static {
        let mut receiver = self.subscribe();

        async_stream::stream! {
            loop {
                match receiver.recv().await {
                    Ok(event) => yield event,
                    Err(RecvError::Lagged(skipped)) => {
                        debug!(skipped, "session event subscriber lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }
}

impl<B: InferenceBackend> Inner<B> {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    async fn resolve(&self, request: CompletionRequest, connected: bool) -> ChatMessage {
        let text = if connected {
            let timeout = self.config.timeout;
            let result = tokio::time::timeout(timeout, self.backend.complete(&request))
                .await
                .unwrap_or_else(|_| Err(BackendError::Timeout(timeout)));

            match result {
                Ok(answer) => answer,
                Err(e) => {
                    warn!(error = %e, model = %request.model, "inference request failed, answering offline");
                    self.set_connection(ConnectionState::Degraded);
                    fallback_response(&request.question, request.language).to_string()
                }
            }
        } else {
            debug!("endpoint not connected, answering offline");
            fallback_response(&request.question, request.language).to_string()
        };

        let reply = ChatMessage::assistant(text);
        self.lock().transcript.push(reply.clone());
        self.emit(SessionEvent::MessageAppended(reply.clone()));
        self.persist();

        reply
    }

    fn persist(&self) {
        let Some(store) = &self.store else {
            return;
        };

        let messages = self.lock().transcript.recent(self.config.history_limit);
        if let Err(e) = store.save(&self.config.history_key, &messages) {
            warn!(error = %e, "could not save chat history");
        }
    }

    fn language_changed(&self, language: Language) {
        if let Some(store) = &self.store
            && let Err(e) = store.save_preference(&self.config.language_key, language.code())
        {
            warn!(error = %e, "could not save language");
        }
        self.emit(SessionEvent::LanguageChanged(language));
    }

    /// Moves `Disconnected` to `Connecting`. Returns whether it did.
    fn begin_connecting(&self) -> bool {
        let changed = {
            let mut state = self.lock();
            if state.connection == ConnectionState::Disconnected {
                state.connection = ConnectionState::Connecting;
                true
            } else {
                false
            }
        };

        if changed {
            self.emit(SessionEvent::ConnectionChanged {
                previous: ConnectionState::Disconnected,
                current: ConnectionState::Connecting,
            });
        }
        changed
    }

    fn abandon_connecting(&self) {
        let reset = {
            let mut state = self.lock();
            if state.connection == ConnectionState::Connecting {
                state.connection = ConnectionState::Disconnected;
                true
            } else {
                false
            }
        };

        if reset {
            debug!("probe cancelled while connecting");
            self.emit(SessionEvent::ConnectionChanged {
                previous: ConnectionState::Connecting,
                current: ConnectionState::Disconnected,
            });
        }
    }

    fn set_connection(&self, next: ConnectionState) {
        let previous = std::mem::replace(&mut self.lock().connection, next);

        if previous != next {
            info!(from = %previous, to = %next, "connection state changed");
            self.emit(SessionEvent::ConnectionChanged {
                previous,
                current: next,
            });
        }
    }
}

/// Undoes `Connecting` when a probe is dropped before it finishes.
struct ConnectingGuard<'a, B: InferenceBackend> {
    inner: &'a Inner<B>,
    armed: bool,
}

impl<B: InferenceBackend> Drop for ConnectingGuard<'_, B> {
    fn drop(&mut self) {
        if self.armed {
            self.inner.abandon_connecting();
        }
    }
}
