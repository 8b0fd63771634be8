use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::future::Future;
use tracing::debug;

use super::error::{BackendError, ConfigError};
use super::language::Language;
use super::message::{ChatMessage, Role};
use super::prompt::{build_prompt, system_prompt};

/// Wire schema spoken by the inference endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiFlavor {
    /// Ollama native API (`/api/generate`, `/api/tags`).
    #[default]
    Ollama,
    /// OpenAI-compatible chat completions (`/v1/chat/completions`, `/v1/models`).
    OpenAi,
}

impl ApiFlavor {
    pub const fn default_completion_path(self) -> &'static str {
        match self {
            Self::Ollama => "/api/generate",
            Self::OpenAi => "/v1/chat/completions",
        }
    }

    pub const fn default_health_path(self) -> &'static str {
        match self {
            Self::Ollama => "/api/tags",
            Self::OpenAi => "/v1/models",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ollama => "ollama",
            Self::OpenAi => "openai",
        }
    }
}

/// Sampling parameters forwarded with every request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_tokens: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.9,
            top_k: 40,
            max_tokens: 2048,
        }
    }
}

/// Everything a backend needs to answer one question.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    pub language: Language,
    /// Previous transcript entries, oldest first. Does not include `question`.
    pub context: Vec<ChatMessage>,
    pub question: String,
    pub options: GenerationOptions,
}

/// Remote side of a chat session.
///
/// Implementations report every failure as a [`BackendError`]; the session
/// decides what to do with it.
pub trait InferenceBackend: Send + Sync + 'static {
    /// Sends one question and returns the answer text.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<String, BackendError>> + Send;

    /// Lightweight health check. `Ok` means the endpoint is usable.
    fn probe(&self) -> impl Future<Output = Result<(), BackendError>> + Send;
}

/// Where and how to reach the endpoint.
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    pub url: String,
    pub flavor: ApiFlavor,
    pub completion_path: Option<String>,
    pub health_path: Option<String>,
    pub api_key: Option<String>,
}

impl EndpointConfig {
    pub fn new(url: impl Into<String>, flavor: ApiFlavor) -> Self {
        Self {
            url: url.into(),
            flavor,
            completion_path: None,
            health_path: None,
            api_key: None,
        }
    }

    /// Checks that the endpoint is a non-empty, absolute http(s) URL.
    pub fn validate(&self) -> Result<Url, ConfigError> {
        let trimmed = self.url.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::EmptyEndpoint);
        }

        let url = Url::parse(trimmed).map_err(|e| ConfigError::InvalidEndpoint {
            url: trimmed.to_string(),
            reason: e.to_string(),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEndpoint {
                url: trimmed.to_string(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        Ok(url)
    }
}

// Ollama /api/generate

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    system: &'a str,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

// OpenAI /v1/chat/completions

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: Cow<'a, str>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// [`InferenceBackend`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    completion_url: String,
    health_url: String,
    flavor: ApiFlavor,
    api_key: Option<String>,
}

impl HttpBackend {
    pub fn new(config: &EndpointConfig) -> Result<Self, ConfigError> {
        let base = config.validate()?;
        let base = base.as_str().trim_end_matches('/');

        let completion_path = config
            .completion_path
            .as_deref()
            .unwrap_or_else(|| config.flavor.default_completion_path());
        let health_path = config
            .health_path
            .as_deref()
            .unwrap_or_else(|| config.flavor.default_health_path());

        Ok(Self {
            client: Client::new(),
            completion_url: join_path(base, completion_path),
            health_url: join_path(base, health_path),
            flavor: config.flavor,
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
        })
    }

    pub fn completion_url(&self) -> &str {
        &self.completion_url
    }

    pub fn health_url(&self) -> &str {
        &self.health_url
    }

    fn with_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    fn request_body(&self, request: &CompletionRequest) -> Result<String, BackendError> {
        let system = system_prompt(request.language);
        let body = match self.flavor {
            ApiFlavor::Ollama => serde_json::to_string(&GenerateRequest {
                model: &request.model,
                prompt: build_prompt(&request.context, &request.question),
                system,
                stream: false,
                options: OllamaOptions {
                    temperature: request.options.temperature,
                    top_p: request.options.top_p,
                    top_k: request.options.top_k,
                    num_predict: request.options.max_tokens,
                },
            }),
            ApiFlavor::OpenAi => {
                let mut messages = Vec::with_capacity(request.context.len() + 2);
                messages.push(Message {
                    role: "system",
                    content: Cow::Borrowed(system),
                });
                messages.extend(request.context.iter().map(|m| Message {
                    role: match m.role() {
                        Role::User => "user",
                        Role::Assistant => "assistant",
                    },
                    content: Cow::Borrowed(m.text()),
                }));
                messages.push(Message {
                    role: "user",
                    content: Cow::Borrowed(&request.question),
                });

                serde_json::to_string(&ChatCompletionRequest {
                    model: &request.model,
                    messages,
                    temperature: request.options.temperature,
                    top_p: request.options.top_p,
                    max_tokens: request.options.max_tokens,
                    stream: false,
                })
            }
        };

        body.map_err(|e| BackendError::MalformedResponse(format!("failed to encode request: {e}")))
    }
}

impl InferenceBackend for HttpBackend {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, BackendError> {
        let body = self.request_body(request)?;
        debug!(url = %self.completion_url, model = %request.model, flavor = self.flavor.as_str(), "sending completion request");

        let response = self
            .with_auth(self.client.post(&self.completion_url))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| BackendError::Network {
                url: self.completion_url.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
            });
        }

        let text = response.text().await.map_err(|e| BackendError::Network {
            url: self.completion_url.clone(),
            reason: e.to_string(),
        })?;

        parse_answer(self.flavor, &text)
    }

    async fn probe(&self) -> Result<(), BackendError> {
        debug!(url = %self.health_url, "probing endpoint");

        let response = self
            .with_auth(self.client.get(&self.health_url))
            .send()
            .await
            .map_err(|e| BackendError::Network {
                url: self.health_url.clone(),
                reason: e.to_string(),
            })?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(BackendError::Status {
                status: response.status().as_u16(),
            })
        }
    }
}

/// Extracts the answer text from a response body.
fn parse_answer(flavor: ApiFlavor, body: &str) -> Result<String, BackendError> {
    let answer = match flavor {
        ApiFlavor::Ollama => serde_json::from_str::<GenerateResponse>(body)
            .map(|r| r.response)
            .map_err(|e| BackendError::MalformedResponse(e.to_string()))?,
        ApiFlavor::OpenAi => serde_json::from_str::<ChatCompletionResponse>(body)
            .map_err(|e| BackendError::MalformedResponse(e.to_string()))?
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default(),
    };

    let answer = answer.trim();
    if answer.is_empty() {
        return Err(BackendError::MalformedResponse("empty answer".to_string()));
    }

    Ok(answer.to_string())
}

fn join_path(base: &str, path: &str) -> String {
    let path = path.trim();
    if path.is_empty() {
        base.to_string()
    } else if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}
