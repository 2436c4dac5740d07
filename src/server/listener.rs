use anyhow::{anyhow, Context, Result};
use std::io::Read;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::handler::{AnalyzeService, HttpResponse};

/// Request bodies are a single URL; anything larger is rejected.
const MAX_BODY_BYTES: u64 = 64 * 1024;

struct Incoming {
    request: tiny_http::Request,
    body: Vec<u8>,
}

/// Serve until Ctrl-C.
///
/// `tiny_http::Server::recv` blocks, so each receive runs in `spawn_blocking`;
/// every request is then handled on its own tokio task.
pub async fn serve(service: Arc<AnalyzeService>, bind: &str) -> Result<()> {
    let server = Arc::new(
        tiny_http::Server::http(bind).map_err(|e| anyhow!("failed to bind {}: {}", bind, e))?,
    );
    let addr = server
        .server_addr()
        .to_ip()
        .map(|a| a.to_string())
        .unwrap_or_else(|| bind.to_string());
    info!("Listening on http://{}", addr);
    if !service.is_configured() {
        warn!("Credentials missing: POST /analyze will answer 500 until they are set");
    }

    let shutting_down = Arc::new(AtomicBool::new(false));
    {
        let server = Arc::clone(&server);
        let shutting_down = Arc::clone(&shutting_down);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Shutting down");
                shutting_down.store(true, Ordering::SeqCst);
                server.unblock();
            }
        });
    }

    loop {
        let srv = Arc::clone(&server);
        let received = tokio::task::spawn_blocking(move || receive(&srv))
            .await
            .context("listener thread panicked")?;

        match received {
            Ok(Some(incoming)) => {
                let service = Arc::clone(&service);
                tokio::spawn(dispatch(service, incoming));
            }
            Ok(None) => {}
            Err(e) => {
                if shutting_down.load(Ordering::SeqCst) {
                    break;
                }
                warn!("failed to receive request: {}", e);
            }
        }
    }

    Ok(())
}

/// Block for the next request and read its body.
/// Oversized or unreadable bodies are answered here and yield `None`.
fn receive(server: &tiny_http::Server) -> std::io::Result<Option<Incoming>> {
    let mut request = server.recv()?;
    let mut body = Vec::new();

    if let Err(e) = request
        .as_reader()
        .take(MAX_BODY_BYTES + 1)
        .read_to_end(&mut body)
    {
        warn!("failed to read request body: {}", e);
        respond(
            request,
            HttpResponse::error_message(400, "invalid_input", "Could not read request body"),
        );
        return Ok(None);
    }

    if body.len() as u64 > MAX_BODY_BYTES {
        respond(
            request,
            HttpResponse::error_message(413, "invalid_input", "Request body too large"),
        );
        return Ok(None);
    }

    Ok(Some(Incoming { request, body }))
}

async fn dispatch(service: Arc<AnalyzeService>, incoming: Incoming) {
    let Incoming { request, body } = incoming;
    let method = request.method().to_string();
    let path = request.url().to_string();

    let response = service.handle(&method, &path, &body).await;
    info!("{} {} -> {}", method, path, response.status);

    if let Err(e) = tokio::task::spawn_blocking(move || respond(request, response)).await {
        warn!("response writer panicked: {}", e);
    }
}

fn respond(request: tiny_http::Request, response: HttpResponse) {
    let mut out = tiny_http::Response::from_data(response.body).with_status_code(response.status);
    for (name, value) in &response.headers {
        match tiny_http::Header::from_bytes(name.as_bytes(), value.as_bytes()) {
            Ok(header) => out.add_header(header),
            Err(()) => debug!("dropping invalid header {}", name),
        }
    }
    if let Err(e) = request.respond(out) {
        warn!("failed to write response: {}", e);
    }
}
