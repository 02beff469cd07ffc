use anyhow::Result;
use flashcard_configuration::{load_config, setup_logging};
use flashcard_setup::Application;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let config = load_config()?;
    setup_logging(&config.logging);
    tracing::info!(host = %config.server.host, port = config.server.port, "starting flashcard service");
    let server_config = config.server.clone();
    let app = Application::new(config).await?;
    app.run(server_config).await?;
    Ok(())
}
