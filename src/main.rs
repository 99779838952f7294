#[tokio::main]
async fn main() {
    if let Err(err) = form_telegram_relay::axum().await {
        tracing::error!(error = %err, "server stopped");
        eprintln!("form-telegram-relay: {}", err);
        std::process::exit(1);
    }
}
