use tracing::info;
use tracing_subscriber::EnvFilter;

#[rocket::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("🚀 Starting Ballot Box server");

    let rocket = backend::server::build(rocket::Config::figment())?;
    let _rocket = rocket.launch().await?;

    info!("👋 Ballot Box server stopped");
    Ok(())
}
