pub mod models;
pub mod error;
pub mod config;
pub mod cancel;
pub mod transport;
pub mod backend_service;
pub mod view;
pub mod controller;

#[cfg(test)]
mod testing;

pub use models::*;
pub use error::ClientError;
pub use config::ClientConfig;
pub use cancel::CancelToken;
pub use transport::{FormBody, FormPart, HttpResponse, ReqwestTransport, Transport};
pub use backend_service::BackendClient;
pub use view::{render_results, HtmlView, Trigger, View};
pub use controller::{Outcome, UiController};
