use crate::cancel::CancelToken;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::models::*;
use crate::transport::{FormBody, HttpResponse, Transport};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

pub const UPLOAD_PATH: &str = "/upload-pdf";
pub const QUERY_PATH: &str = "/query";

/// Talks to the ingestion/query backend over an injected transport.
pub struct BackendClient {
    transport: Arc<dyn Transport>,
    config: ClientConfig,
}

impl BackendClient {
    pub fn new(transport: Arc<dyn Transport>, config: ClientConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub async fn upload_pdf(
        &self,
        request: UploadRequest,
        cancel: &CancelToken,
    ) -> Result<UploadResponse, ClientError> {
        log::info!(
            "Uploading {} ({} bytes)",
            request.filename,
            request.bytes.len()
        );

        let form = FormBody::new().file(UPLOAD_FIELD, &request.filename, PDF_MIME, request.bytes);
        let response = self.post(UPLOAD_PATH, form, cancel).await?;
        decode(&response)
    }

    pub async fn query(
        &self,
        request: &QueryRequest,
        cancel: &CancelToken,
    ) -> Result<QueryResponse, ClientError> {
        let form = FormBody::new()
            .text("query", request.query.as_str())
            .text("top_k", request.top_k.to_string());

        let response = self.post(QUERY_PATH, form, cancel).await?;
        let parsed: QueryResponse = decode(&response)?;

        log::info!("Query returned {} results", parsed.results.len());
        Ok(parsed)
    }

    async fn post(
        &self,
        path: &str,
        form: FormBody,
        cancel: &CancelToken,
    ) -> Result<HttpResponse, ClientError> {
        let url = self.config.endpoint(path);
        let request_id = Uuid::new_v4();
        let start_time = Instant::now();

        log::info!("[{}] POST {}", request_id, url);

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                log::warn!("[{}] cancelled", request_id);
                return Err(ClientError::Cancelled);
            }
            result = tokio::time::timeout(self.config.timeout(), self.transport.post_form(&url, form)) => {
                match result {
                    Ok(response) => response?,
                    Err(_) => return Err(ClientError::Timeout(self.config.timeout_secs)),
                }
            }
        };

        log::info!(
            "[{}] {} {} in {}ms",
            request_id,
            response.status,
            response.status_text,
            start_time.elapsed().as_millis()
        );

        if !response.is_success() {
            let detail = serde_json::from_slice::<ErrorResponse>(&response.body)
                .ok()
                .map(|e| e.error);

            return Err(ClientError::HttpStatus {
                status: response.status,
                status_text: response.status_text,
                detail,
            });
        }

        Ok(response)
    }
}

fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ClientError> {
    serde_json::from_slice(&response.body).map_err(|e| ClientError::MalformedResponse(e.to_string()))
}
