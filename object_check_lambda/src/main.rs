use lambda_http::{run, service_fn, tracing, Error};
mod config;
mod error;
mod event;
mod event_handler;
use config::{load_s3_client, LambdaConfig};
use event_handler::function_handler;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::subscriber::fmt()
        .json()
        .with_env_filter(
            tracing::subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing::subscriber::EnvFilter::new("info")),
        )
        .init();
    let config = LambdaConfig::from_env()?;
    let s3_client = load_s3_client(&config).await.map_err(|e| {
        tracing::error!(error = %e, "Unable to load SDK config");
        e
    })?;
    run(service_fn(|event| function_handler(event, &s3_client))).await
}
