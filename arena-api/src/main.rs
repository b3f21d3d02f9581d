use arena_api::configuration::get_configuration;
use arena_api::startup::Application;
use arena_api::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Set up tracing telemetry.
    let subscriber = get_subscriber("info".into(), std::io::stdout);
    init_subscriber(subscriber);

    // Get config settings
    let configuration = get_configuration().expect("Failed to read configuration.");

    // Start the rating engine and the API endpoint
    let application = Application::build(&configuration).await?;
    application.run_until_stopped().await?;
    Ok(())
}
