use rag_client::{BackendClient, CancelToken, ClientConfig, QueryRequest, ReqwestTransport, UploadRequest};
use std::path::PathBuf;
use std::sync::Arc;

/// Drives a running backend directly through `BackendClient`, bypassing the
/// controller. Usage: `cargo run --example client -- <file.pdf> "<question>"`
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ClientConfig::from_env()?;
    let backend = BackendClient::new(Arc::new(ReqwestTransport::new()), config.clone());
    let cancel = CancelToken::new();

    let mut args = std::env::args().skip(1);
    let pdf = args.next().map(PathBuf::from);
    let question = args
        .next()
        .unwrap_or_else(|| "What are the main topics discussed in this document?".to_string());

    println!("🔍 Testing backend at {}", config.base_url);

    if let Some(pdf) = pdf {
        println!("\n📚 Upload:");
        let request = UploadRequest::from_path(&pdf).await?;
        let response = backend.upload_pdf(request, &cancel).await?;
        println!("Response: {}", response.message);
    }

    println!("\n🔍 Query Test:");
    let request = QueryRequest {
        query: question,
        top_k: config.top_k,
    };
    let response = backend.query(&request, &cancel).await?;
    println!("Response: {}", serde_json::to_string_pretty(&response)?);

    println!("\n✅ Client test completed!");
    Ok(())
}
