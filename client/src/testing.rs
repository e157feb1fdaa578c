//! Test doubles for the transport and the view.

use crate::error::ClientError;
use crate::models::QueryResult;
use crate::transport::{FormBody, HttpResponse, Transport};
use crate::view::{Trigger, View};
use async_trait::async_trait;
use std::sync::Mutex;

enum Reply {
    Respond(HttpResponse),
    Fail(String),
    Hang,
}

pub struct StubTransport {
    reply: Reply,
    calls: Mutex<Vec<(String, FormBody)>>,
}

impl StubTransport {
    pub fn json(status: u16, body: &str) -> Self {
        let status_text = reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("")
            .to_string();

        Self::with_reply(Reply::Respond(HttpResponse {
            status,
            status_text,
            body: body.as_bytes().to_vec(),
        }))
    }

    pub fn failing(message: &str) -> Self {
        Self::with_reply(Reply::Fail(message.to_string()))
    }

    /// Never answers; only a timeout or cancellation ends the request.
    pub fn hanging() -> Self {
        Self::with_reply(Reply::Hang)
    }

    fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, FormBody)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn post_form(&self, url: &str, form: FormBody) -> Result<HttpResponse, ClientError> {
        self.calls.lock().unwrap().push((url.to_string(), form));

        match &self.reply {
            Reply::Respond(response) => Ok(response.clone()),
            Reply::Fail(message) => Err(ClientError::Transport(message.clone())),
            Reply::Hang => std::future::pending().await,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Alert(String),
    Enabled(Trigger, bool),
    Cleared,
    Placeholder(String),
    Block(QueryResult),
}

#[derive(Default)]
pub struct RecordingView {
    events: Mutex<Vec<ViewEvent>>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ViewEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ViewEvent::Alert(msg) => Some(msg),
                _ => None,
            })
            .collect()
    }

    pub fn blocks(&self) -> Vec<QueryResult> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ViewEvent::Block(result) => Some(result),
                _ => None,
            })
            .collect()
    }

    pub fn render_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, ViewEvent::Cleared))
            .count()
    }

    /// Last enabled state reported for `trigger`; enabled if never touched.
    pub fn is_enabled(&self, trigger: Trigger) -> bool {
        self.events()
            .iter()
            .rev()
            .find_map(|e| match e {
                ViewEvent::Enabled(t, enabled) if *t == trigger => Some(*enabled),
                _ => None,
            })
            .unwrap_or(true)
    }

    fn push(&self, event: ViewEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl View for RecordingView {
    fn alert(&self, message: &str) {
        self.push(ViewEvent::Alert(message.to_string()));
    }

    fn set_trigger_enabled(&self, trigger: Trigger, enabled: bool) {
        self.push(ViewEvent::Enabled(trigger, enabled));
    }

    fn clear_results(&self) {
        self.push(ViewEvent::Cleared);
    }

    fn show_placeholder(&self, text: &str) {
        self.push(ViewEvent::Placeholder(text.to_string()));
    }

    fn append_result(&self, result: &QueryResult) {
        self.push(ViewEvent::Block(result.clone()));
    }
}
