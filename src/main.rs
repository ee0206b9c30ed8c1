use chalet_availability::startup;
use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting availability server");

    // Load configuration
    let config = startup::load_config()?;

    #[cfg(feature = "web-interface")]
    startup::start_server(config).await?;

    #[cfg(not(feature = "web-interface"))]
    {
        let _ = config;
        println!("Web interface feature not enabled. Please compile with --features web-interface");
    }

    Ok(())
}
