use crate::backend_service::BackendClient;
use crate::cancel::CancelToken;
use crate::error::ClientError;
use crate::models::*;
use crate::view::{self, Trigger, View};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

pub const SELECT_FILE_NOTICE: &str = "Please select a PDF file first.";
pub const ENTER_QUERY_NOTICE: &str = "Please enter a query.";
pub const UPLOAD_FAILED_NOTICE: &str = "Failed to upload and ingest PDF.";
pub const QUERY_FAILED_NOTICE: &str = "Query failed.";

/// How a single user action ended.
#[derive(Debug)]
pub enum Outcome {
    /// Input was rejected before any network call. Always an
    /// [`ClientError::InputValidation`].
    Rejected(ClientError),
    /// The same trigger already has a request in flight.
    Busy,
    Completed,
    Failed(ClientError),
}

impl Outcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed)
    }
}

/// Disables a trigger while held and re-enables it on drop, whichever way
/// the request ends.
struct TriggerGuard<'a> {
    flag: &'a AtomicBool,
    view: &'a dyn View,
    trigger: Trigger,
}

impl<'a> TriggerGuard<'a> {
    fn acquire(flag: &'a AtomicBool, view: &'a dyn View, trigger: Trigger) -> Option<Self> {
        if flag
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return None;
        }

        view.set_trigger_enabled(trigger, false);
        Some(Self {
            flag,
            view,
            trigger,
        })
    }
}

impl Drop for TriggerGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
        self.view.set_trigger_enabled(self.trigger, true);
    }
}

/// Ties user actions to backend requests and feeds the outcome back to the view.
pub struct UiController {
    backend: BackendClient,
    view: Arc<dyn View>,
    upload_in_flight: AtomicBool,
    query_in_flight: AtomicBool,
    cancel: Mutex<CancelToken>,
}

impl UiController {
    pub fn new(backend: BackendClient, view: Arc<dyn View>) -> Self {
        Self {
            backend,
            view,
            upload_in_flight: AtomicBool::new(false),
            query_in_flight: AtomicBool::new(false),
            cancel: Mutex::new(CancelToken::new()),
        }
    }

    /// Reads the selected file, then uploads it. The trigger is disabled and
    /// the cancel token taken before the read, so a cancel during a slow read
    /// ends the upload.
    pub async fn submit_upload_path(&self, path: Option<&Path>) -> Outcome {
        let Some(path) = path else {
            return self.reject_missing_file();
        };

        let Some(_guard) = self.acquire_upload(&path.display().to_string()) else {
            return Outcome::Busy;
        };

        let cancel = self.current_token();
        let read = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ClientError::Cancelled),
            read = UploadRequest::from_path(path) => read.map_err(ClientError::Io),
        };

        match read {
            Ok(request) => self.send_upload(request, &cancel).await,
            Err(e) => {
                log::error!("Upload of {} failed before sending: {}", path.display(), e);
                self.view.alert(UPLOAD_FAILED_NOTICE);
                Outcome::Failed(e)
            }
        }
    }

    pub async fn submit_upload(&self, file: Option<UploadRequest>) -> Outcome {
        let Some(file) = file else {
            return self.reject_missing_file();
        };

        let Some(_guard) = self.acquire_upload(&file.filename) else {
            return Outcome::Busy;
        };

        let cancel = self.current_token();
        self.send_upload(file, &cancel).await
    }

    fn reject_missing_file(&self) -> Outcome {
        self.view.alert(SELECT_FILE_NOTICE);
        Outcome::Rejected(ClientError::InputValidation("no file selected".to_string()))
    }

    fn acquire_upload(&self, name: &str) -> Option<TriggerGuard<'_>> {
        let guard =
            TriggerGuard::acquire(&self.upload_in_flight, self.view.as_ref(), Trigger::Upload);
        if guard.is_none() {
            log::warn!("Upload already in flight, ignoring {}", name);
        }
        guard
    }

    async fn send_upload(&self, file: UploadRequest, cancel: &CancelToken) -> Outcome {
        match self.backend.upload_pdf(file, cancel).await {
            Ok(response) => {
                self.view.alert(&response.message);
                Outcome::Completed
            }
            Err(e) => {
                log::error!("Upload failed: {}", e);
                self.view.alert(UPLOAD_FAILED_NOTICE);
                Outcome::Failed(e)
            }
        }
    }

    /// Sends the trimmed query with the configured `top_k` and renders the
    /// results. The renderer is not touched when the request fails.
    pub async fn submit_query(&self, query_text: &str) -> Outcome {
        let query = query_text.trim();
        if query.is_empty() {
            self.view.alert(ENTER_QUERY_NOTICE);
            return Outcome::Rejected(ClientError::InputValidation("empty query".to_string()));
        }

        let Some(_guard) =
            TriggerGuard::acquire(&self.query_in_flight, self.view.as_ref(), Trigger::Query)
        else {
            log::warn!("Query already in flight, ignoring {:?}", query);
            return Outcome::Busy;
        };

        let request = QueryRequest {
            query: query.to_string(),
            top_k: self.backend.config().top_k,
        };

        let cancel = self.current_token();
        match self.backend.query(&request, &cancel).await {
            Ok(response) => {
                self.render_results(Some(response.results.as_slice()));
                Outcome::Completed
            }
            Err(e) => {
                log::error!("Query failed: {}", e);
                self.view.alert(QUERY_FAILED_NOTICE);
                Outcome::Failed(e)
            }
        }
    }

    pub fn render_results(&self, results: Option<&[QueryResult]>) {
        view::render_results(self.view.as_ref(), results);
    }

    /// Cancels every request currently in flight. Later submissions get a
    /// fresh token.
    pub fn cancel_in_flight(&self) {
        let mut token = self.cancel.lock().unwrap_or_else(|p| p.into_inner());
        token.cancel();
        *token = CancelToken::new();
    }

    fn current_token(&self) -> CancelToken {
        self.cancel
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }
}
