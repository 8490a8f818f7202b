use anyhow::Context;

use calendar_quickstart::{
    Config, Interaction, TerminalConsole,
    google::{GoogleAuthenticator, GoogleCalendarClient},
    storage::InstalledSecret,
};

#[tokio::main]
async fn main() {
    let _guard = setup_logging();

    if let Err(e) = run().await {
        println!("{:#}", e);
        tracing::error!("Quickstart aborted: {:#}", e);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = Config::default();

    let secret = InstalledSecret::load(&config.client_secret_path)
        .context("Error loading client secret file")?;

    let mut console = TerminalConsole::new();
    let authenticator = GoogleAuthenticator::new(config.clone(), secret);

    let credential = authenticator
        .authorize(&mut console)
        .await
        .context("Error while trying to retrieve access token")?;
    let credential = authenticator
        .refresh_if_expired(credential)
        .await
        .context("Error while refreshing access token")?;

    let client = GoogleCalendarClient::new(credential.access_token().to_string())
        .with_base_url(config.endpoints.api_base_url.clone());

    let mut interaction = Interaction::new(client, console, config);
    match interaction.run().await {
        Ok(choice) => tracing::info!("{:?} finished", choice),
        // Already reported on the console by the flow.
        Err(e) => tracing::error!("Flow failed: {}", e),
    }

    Ok(())
}

fn setup_logging() -> tracing_appender::non_blocking::WorkerGuard {
    let log_dir = Config::log_dir();

    std::fs::create_dir_all(&log_dir).ok();

    let file_appender = tracing_appender::rolling::daily(log_dir, "calendar-quickstart.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(false)
        .init();

    tracing::info!("calendar-quickstart started");
    guard
}
