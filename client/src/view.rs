//! Output surface of the client and the results renderer.
//!
//! A [`View`] stands in for the handful of page elements the controller
//! touches: the two triggers, the notice area and the results container.
//! Implementations use interior mutability so a view can be shared with
//! the controller behind an `Arc`.

use crate::models::QueryResult;
use std::collections::HashSet;
use std::sync::Mutex;

pub const NO_RESULTS: &str = "No results found.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    Upload,
    Query,
}

pub trait View: Send + Sync {
    /// Blocking, user-facing notice.
    fn alert(&self, message: &str);
    fn set_trigger_enabled(&self, trigger: Trigger, enabled: bool);
    fn clear_results(&self);
    fn show_placeholder(&self, text: &str);
    fn append_result(&self, result: &QueryResult);
}

/// Clears the container, then shows either the placeholder or one block
/// per result in the order given. No sorting, no dedup, no truncation.
pub fn render_results(view: &dyn View, results: Option<&[QueryResult]>) {
    view.clear_results();

    match results {
        Some(results) if !results.is_empty() => {
            for result in results {
                view.append_result(result);
            }
        }
        _ => view.show_placeholder(NO_RESULTS),
    }
}

pub fn escape_markup(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[derive(Debug, Default)]
struct HtmlState {
    container: String,
    notices: Vec<String>,
    disabled: HashSet<Trigger>,
}

/// Builds the results container as markup. Every backend-provided value is
/// escaped before it is spliced in.
#[derive(Debug, Default)]
pub struct HtmlView {
    state: Mutex<HtmlState>,
}

impl HtmlView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn results_html(&self) -> String {
        self.lock().container.clone()
    }

    pub fn notices(&self) -> Vec<String> {
        self.lock().notices.clone()
    }

    pub fn is_enabled(&self, trigger: Trigger) -> bool {
        !self.lock().disabled.contains(&trigger)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HtmlState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl View for HtmlView {
    fn alert(&self, message: &str) {
        self.lock().notices.push(message.to_string());
    }

    fn set_trigger_enabled(&self, trigger: Trigger, enabled: bool) {
        let mut state = self.lock();
        if enabled {
            state.disabled.remove(&trigger);
        } else {
            state.disabled.insert(trigger);
        }
    }

    fn clear_results(&self) {
        self.lock().container.clear();
    }

    fn show_placeholder(&self, text: &str) {
        self.lock().container = escape_markup(text);
    }

    fn append_result(&self, result: &QueryResult) {
        let block = format!(
            "<div><hr><p><strong>Rank:</strong> {}</p><p><strong>Source:</strong> {}</p><p><strong>Content:</strong> {}</p></div>",
            result.rank,
            escape_markup(&result.source),
            escape_markup(&result.content)
        );
        self.lock().container.push_str(&block);
    }
}
