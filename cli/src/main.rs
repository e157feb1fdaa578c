//! `ragq`: command-line front end for the document ingestion and query backend.
//!
//! ```bash
//! ragq upload ./policy.pdf
//! ragq --top-k 3 query "What is covered under the policy?"
//! ragq --html query "knee surgery"
//! ```
//!
//! Backend settings come from `RAG_BASE_URL`, `RAG_TOP_K` and
//! `RAG_TIMEOUT_SECS` (a `.env` file is honoured); flags override them.

mod terminal_view;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rag_client::{
    BackendClient, ClientConfig, HtmlView, Outcome, ReqwestTransport, UiController, View,
};
use std::future::Future;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use terminal_view::TerminalView;

#[derive(Parser)]
#[command(name = "ragq", version, about = "Upload PDFs to and query a document ingestion backend")]
struct Cli {
    /// Backend origin, e.g. http://127.0.0.1:5001
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Number of ranked results to ask for.
    #[arg(long, global = true)]
    top_k: Option<usize>,

    /// Give up on a request after this many seconds.
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Print the results container as escaped HTML instead of plain text.
    #[arg(long, global = true)]
    html: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a PDF for ingestion.
    Upload {
        /// File to upload.
        file: Option<PathBuf>,
    },
    /// Ask a question against the ingested documents.
    Query {
        /// Query text; multiple words are joined with spaces.
        text: Vec<String>,
    },
}

impl Cli {
    fn config(&self) -> Result<ClientConfig> {
        let mut config = ClientConfig::from_env()?;

        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(top_k) = self.top_k {
            config.top_k = top_k;
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config.timeout_secs = timeout_secs;
        }

        config.validate()?;
        Ok(config)
    }
}

async fn run(ui: &UiController, command: &Commands) -> Outcome {
    match command {
        Commands::Upload { file } => ui.submit_upload_path(file.as_deref()).await,
        Commands::Query { text } => ui.submit_query(&text.join(" ")).await,
    }
}

/// Runs `command` until it finishes. If `interrupt` resolves with `Ok`, the
/// request in flight is cancelled and its outcome awaited; an `Err` (no
/// signal handler) leaves the request alone.
async fn run_until_interrupted<F>(ui: &UiController, command: &Commands, interrupt: F) -> Outcome
where
    F: Future<Output = std::io::Result<()>>,
{
    let action = run(ui, command);
    tokio::pin!(action);

    tokio::select! {
        biased;
        outcome = &mut action => outcome,
        Ok(()) = interrupt => {
            log::warn!("Interrupted, cancelling request");
            ui.cancel_in_flight();
            action.await
        }
    }
}

fn exit_code(outcome: &Outcome) -> u8 {
    match outcome {
        Outcome::Completed => 0,
        Outcome::Rejected(_) => 2,
        Outcome::Busy | Outcome::Failed(_) => 1,
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.config()?;
    log::info!("Using backend {} (top_k={})", config.base_url, config.top_k);

    let html_view = cli.html.then(|| Arc::new(HtmlView::new()));
    let view: Arc<dyn View> = match &html_view {
        Some(html) => html.clone() as Arc<dyn View>,
        None => Arc::new(TerminalView::stdio()) as Arc<dyn View>,
    };

    let backend = BackendClient::new(Arc::new(ReqwestTransport::new()), config);
    let ui = UiController::new(backend, view);

    let outcome = run_until_interrupted(&ui, &cli.command, tokio::signal::ctrl_c()).await;

    if let Some(html) = html_view {
        for notice in html.notices() {
            eprintln!("{}", notice);
        }
        let markup = html.results_html();
        if !markup.is_empty() {
            println!("{}", markup);
        }
    }

    Ok(ExitCode::from(exit_code(&outcome)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rag_client::{ClientError, FormBody, HttpResponse, Transport};

    /// Answers every request with `body` after `delay`, or never answers
    /// when `body` is `None`.
    struct FixedTransport {
        body: Option<&'static str>,
        delay: std::time::Duration,
    }

    #[async_trait]
    impl Transport for FixedTransport {
        async fn post_form(&self, _url: &str, _form: FormBody) -> Result<HttpResponse, ClientError> {
            tokio::time::sleep(self.delay).await;
            match self.body {
                Some(body) => Ok(HttpResponse {
                    status: 200,
                    status_text: "OK".to_string(),
                    body: body.as_bytes().to_vec(),
                }),
                None => std::future::pending().await,
            }
        }
    }

    fn controller(transport: FixedTransport) -> UiController {
        let backend = BackendClient::new(Arc::new(transport), ClientConfig::default());
        UiController::new(backend, Arc::new(HtmlView::new()))
    }

    fn query(text: &str) -> Commands {
        Commands::Query {
            text: vec![text.to_string()],
        }
    }

    #[tokio::test]
    async fn test_interrupt_cancels_request_in_flight() {
        let ui = controller(FixedTransport {
            body: None,
            delay: std::time::Duration::ZERO,
        });

        let outcome = run_until_interrupted(&ui, &query("hangs"), async { Ok(()) }).await;

        assert!(matches!(outcome, Outcome::Failed(ClientError::Cancelled)));
    }

    #[tokio::test]
    async fn test_failed_signal_registration_does_not_cancel() {
        // The interrupt future fails before the backend answers.
        let ui = controller(FixedTransport {
            body: Some(r#"{"results":[]}"#),
            delay: std::time::Duration::from_millis(50),
        });

        let outcome = run_until_interrupted(&ui, &query("answers"), async {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "no signal handler"))
        })
        .await;

        assert!(outcome.is_completed());
    }

    #[test]
    fn test_query_words_are_collected() {
        let cli = Cli::parse_from(["ragq", "--top-k", "3", "query", "What", "is", "X?"]);
        assert_eq!(cli.top_k, Some(3));
        match cli.command {
            Commands::Query { text } => assert_eq!(text.join(" "), "What is X?"),
            _ => panic!("expected query"),
        }
    }

    #[test]
    fn test_upload_file_is_optional() {
        let cli = Cli::parse_from(["ragq", "upload"]);
        assert!(matches!(cli.command, Commands::Upload { file: None }));

        let cli = Cli::parse_from(["ragq", "upload", "doc.pdf", "--html"]);
        assert!(cli.html);
        assert!(matches!(cli.command, Commands::Upload { file: Some(_) }));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code(&Outcome::Completed), 0);
        assert_eq!(
            exit_code(&Outcome::Rejected(ClientError::InputValidation("empty query".to_string()))),
            2
        );
        assert_eq!(exit_code(&Outcome::Busy), 1);
    }
}
