use std::net::SocketAddr;

use slackr_mock::MockBackend;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "slackr_mock=info".into()),
        )
        .init();

    let port: u16 = std::env::var("SLACKR_MOCK_PORT")
        .unwrap_or_else(|_| "5005".into())
        .parse()?;
    let addr = SocketAddr::from(([127, 0, 0, 1], port));

    let backend = MockBackend::bind(addr).await?;
    backend.wait().await;
    Ok(())
}
