#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use progress_curve::{AppConfig, ProjectSession, http_api, logging};

    let config = AppConfig::from_env().map_err(anyhow::Error::msg)?;
    logging::init_logging(config.log_level.as_deref())?;

    let session = if config.seed_sample {
        ProjectSession::with_sample_data()
    } else {
        ProjectSession::default()
    };

    println!(
        "progress-curve HTTP API listening on http://{}",
        config.http_addr
    );
    let state = http_api::AppState::new(session).with_labels(config.show_labels);
    http_api::serve(config.http_addr, state).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
