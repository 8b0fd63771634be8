#![allow(clippy::unwrap_used)]
//! Session behavior against a local HTTP endpoint.
//!
//! A minimal HTTP/1.1 responder on a tokio listener stands in for Ollama and
//! OpenAI-compatible servers. Each connection serves one request and closes.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use illunare_assistant::assistant::{
    ApiFlavor, ChatSession, ConnectionState, HttpBackend, Language, Role, SessionConfig,
    SessionEvent, fallback_response,
};
use illunare_assistant::history::{SqliteStore, TranscriptStore};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

#[derive(Debug, Clone)]
struct Recorded {
    method: String,
    path: String,
    head: String,
    body: String,
}

struct Reply {
    status: u16,
    body: String,
    delay: Duration,
}

impl Reply {
    fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

type Routes = Arc<dyn Fn(&str, &str) -> Reply + Send + Sync>;

struct MockServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockServer {
    async fn start(routes: impl Fn(&str, &str) -> Reply + Send + Sync + 'static) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let routes: Routes = Arc::new(routes);

        let recorded = Arc::clone(&requests);
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let routes = Arc::clone(&routes);
                let recorded = Arc::clone(&recorded);
                tokio::spawn(async move {
                    serve(stream, &routes, &recorded).await;
                });
            }
        });

        Self { addr, requests }
    }

    fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    fn requests_to(&self, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }
}

async fn serve(mut stream: TcpStream, routes: &Routes, recorded: &Mutex<Vec<Recorded>>) {
    let mut buf = Vec::new();
    let mut chunk = [0_u8; 4096];

    let header_end = loop {
        let Ok(n) = stream.read(&mut chunk).await else {
            return;
        };
        if n == 0 {
            return;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let Ok(n) = stream.read(&mut chunk).await else {
            return;
        };
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let mut request_line = head.lines().next().unwrap_or("").split_whitespace();
    let method = request_line.next().unwrap_or("").to_string();
    let path = request_line.next().unwrap_or("").to_string();
    let body = String::from_utf8_lossy(&buf[header_end..]).to_string();

    let reply = (**routes)(&method, &path);
    recorded.lock().unwrap().push(Recorded {
        method,
        path,
        head: head.to_ascii_lowercase(),
        body,
    });

    tokio::time::sleep(reply.delay).await;
    let response = format!(
        "HTTP/1.1 {} Mock\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        reply.status,
        reply.body.len(),
        reply.body
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

fn ollama_routes(method: &str, path: &str) -> Reply {
    match (method, path) {
        ("GET", "/api/tags") => Reply::json(200, r#"{"models":[]}"#),
        ("POST", "/api/generate") => Reply::json(
            200,
            r#"{"model":"deepseek-r1","response":"Use the Profibus adapter with the RJ45 kit.","done":true}"#,
        ),
        _ => Reply::json(404, "{}"),
    }
}

fn config(server: &MockServer) -> SessionConfig {
    let mut config = SessionConfig::new(server.url(), "deepseek-r1");
    config.timeout = Duration::from_secs(5);
    config
}

#[tokio::test]
async fn test_healthy_endpoint_answers_remotely() {
    let server = MockServer::start(ollama_routes).await;
    let session = ChatSession::new(config(&server)).unwrap();

    assert_eq!(session.connection_state(), ConnectionState::Disconnected);
    assert_eq!(
        session.probe_connection().await,
        ConnectionState::Connected
    );

    let reply = session
        .ask("How do I integrate the industrial protocol adapter?")
        .await
        .unwrap();
    assert_eq!(reply.role(), Role::Assistant);
    assert_eq!(reply.text(), "Use the Profibus adapter with the RJ45 kit.");
    assert_eq!(session.connection_state(), ConnectionState::Connected);

    let generate = server.requests_to("/api/generate");
    assert_eq!(generate.len(), 1);
    let body: serde_json::Value = serde_json::from_str(&generate[0].body).unwrap();
    assert_eq!(body["model"], "deepseek-r1");
    assert_eq!(body["stream"], false);
    assert!(
        body["prompt"]
            .as_str()
            .unwrap()
            .contains("How do I integrate the industrial protocol adapter?")
    );
    assert_eq!(body["options"]["top_k"], 40);
}

#[tokio::test]
async fn test_context_is_sent_with_follow_up_questions() {
    let server = MockServer::start(ollama_routes).await;
    let session = ChatSession::new(config(&server)).unwrap();
    session.probe_connection().await;

    session.ask("first question about modbus").await.unwrap();
    session.ask("and the second one?").await.unwrap();

    let generate = server.requests_to("/api/generate");
    assert_eq!(generate.len(), 2);
    let body: serde_json::Value = serde_json::from_str(&generate[1].body).unwrap();
    let prompt = body["prompt"].as_str().unwrap();
    assert!(prompt.contains("first question about modbus"));
    assert!(prompt.contains("Use the Profibus adapter"));
    assert!(prompt.contains("and the second one?"));
}

#[tokio::test]
async fn test_server_error_degrades_and_falls_back() {
    let server = MockServer::start(|method, path| match (method, path) {
        ("GET", "/api/tags") => Reply::json(200, "{}"),
        _ => Reply::json(500, r#"{"error":"model crashed"}"#),
    })
    .await;
    let session = ChatSession::new(config(&server)).unwrap();
    session.probe_connection().await;
    let mut events = session.subscribe();

    let question = "How do I integrate the industrial protocol adapter?";
    let reply = session.ask(question).await.unwrap();

    assert_eq!(reply.text(), fallback_response(question, Language::English));
    assert_eq!(session.connection_state(), ConnectionState::Degraded);
    assert_eq!(session.transcript().len(), 2);

    let mut saw_degrade = false;
    while let Ok(event) = events.try_recv() {
        if event
            == (SessionEvent::ConnectionChanged {
                previous: ConnectionState::Connected,
                current: ConnectionState::Degraded,
            })
        {
            saw_degrade = true;
        }
    }
    assert!(saw_degrade);
}

#[tokio::test]
async fn test_degraded_session_stays_offline_until_probe_succeeds() {
    let server = MockServer::start(|method, path| match (method, path) {
        ("GET", "/api/tags") => Reply::json(503, "{}"),
        _ => Reply::json(200, r#"{"response":"remote"}"#),
    })
    .await;
    let session = ChatSession::new(config(&server)).unwrap();

    assert_eq!(session.probe_connection().await, ConnectionState::Degraded);
    let reply = session.ask("what about elixir hot reload?").await.unwrap();

    assert_eq!(
        reply.text(),
        fallback_response("what about elixir hot reload?", Language::English)
    );
    assert!(server.requests_to("/api/generate").is_empty());
}

#[tokio::test]
async fn test_slow_endpoint_times_out_to_fallback() {
    let server = MockServer::start(|method, path| match (method, path) {
        ("GET", "/api/tags") => Reply::json(200, "{}"),
        _ => Reply::json(200, r#"{"response":"too late"}"#).delayed(Duration::from_secs(3)),
    })
    .await;
    let mut config = config(&server);
    config.timeout = Duration::from_millis(300);
    let session = ChatSession::new(config).unwrap();
    session.probe_connection().await;

    let reply = session.ask("LGPD compliance?").await.unwrap();

    assert_eq!(
        reply.text(),
        fallback_response("LGPD compliance?", Language::English)
    );
    assert_eq!(session.connection_state(), ConnectionState::Degraded);
}

#[tokio::test]
async fn test_empty_answer_is_treated_as_failure() {
    let server = MockServer::start(|method, path| match (method, path) {
        ("GET", "/api/tags") => Reply::json(200, "{}"),
        _ => Reply::json(200, r#"{"response":"   "}"#),
    })
    .await;
    let session = ChatSession::new(config(&server)).unwrap();
    session.probe_connection().await;

    let reply = session.ask("obd").await.unwrap();

    assert_eq!(reply.text(), fallback_response("obd", Language::English));
    assert_eq!(session.connection_state(), ConnectionState::Degraded);
}

#[tokio::test]
async fn test_openai_flavor_with_api_key() {
    let server = MockServer::start(|method, path| match (method, path) {
        ("GET", "/v1/models") => Reply::json(200, r#"{"data":[]}"#),
        ("POST", "/v1/chat/completions") => Reply::json(
            200,
            r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"Olá! A LGPD é suportada."}}]}"#,
        ),
        _ => Reply::json(404, "{}"),
    })
    .await;

    let mut config = config(&server);
    config.endpoint.flavor = ApiFlavor::OpenAi;
    config.endpoint.api_key = Some("sk-test".to_string());
    config.language = Language::Portuguese;
    let session = ChatSession::new(config).unwrap();

    assert_eq!(
        session.probe_connection().await,
        ConnectionState::Connected
    );
    let reply = session.ask("A plataforma suporta LGPD?").await.unwrap();
    assert_eq!(reply.text(), "Olá! A LGPD é suportada.");

    let requests = server.requests();
    assert!(
        requests
            .iter()
            .all(|r| r.head.contains("authorization: bearer sk-test"))
    );

    let completion = server.requests_to("/v1/chat/completions");
    assert_eq!(completion[0].method, "POST");
    let body: serde_json::Value = serde_json::from_str(&completion[0].body).unwrap();
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.first().unwrap()["role"], "system");
    assert_eq!(messages.last().unwrap()["content"], "A plataforma suporta LGPD?");
    assert_eq!(body["stream"], false);
}

#[tokio::test]
async fn test_custom_paths_are_used() {
    let server = MockServer::start(|method, path| match (method, path) {
        ("GET", "/healthz") => Reply::json(200, "{}"),
        ("POST", "/chat") => Reply::json(200, r#"{"response":"custom"}"#),
        _ => Reply::json(404, "{}"),
    })
    .await;

    let mut config = config(&server);
    config.endpoint.completion_path = Some("/chat".to_string());
    config.endpoint.health_path = Some("/healthz".to_string());
    let session = ChatSession::new(config).unwrap();

    assert_eq!(
        session.probe_connection().await,
        ConnectionState::Connected
    );
    assert_eq!(session.ask("hi").await.unwrap().text(), "custom");
}

#[tokio::test]
async fn test_transcript_survives_restart() {
    let server = MockServer::start(ollama_routes).await;
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("history.db");

    {
        let store = Arc::new(SqliteStore::open(&db_path).unwrap());
        let backend = HttpBackend::new(&config(&server).endpoint).unwrap();
        let session = ChatSession::restore(config(&server), backend, store).unwrap();
        session.probe_connection().await;
        session.ask("profinet setup?").await.unwrap();
        session.ask("and modbus?").await.unwrap();
    }

    let store = SqliteStore::open(&db_path).unwrap();
    let saved = store.load("illunare-ai-history").unwrap();
    assert_eq!(saved.len(), 4);

    let mut config = config(&server);
    config.history_limit = 3;
    let backend = HttpBackend::new(&config.endpoint).unwrap();
    let session = ChatSession::restore(config, backend, Arc::new(store)).unwrap();

    let transcript = session.transcript();
    assert_eq!(transcript.len(), 3);
    assert_eq!(transcript[0].text(), "Use the Profibus adapter with the RJ45 kit.");
    assert_eq!(transcript[1].text(), "and modbus?");
    assert_eq!(transcript[2].role(), Role::Assistant);
}
