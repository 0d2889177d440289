use std::sync::Arc;

use anyhow::Context;
use order_confirmation_mailer::configuration::get_configuration;
use order_confirmation_mailer::email_client::EmailClient;
use order_confirmation_mailer::startup::Application;
use order_confirmation_mailer::telemetry::{get_subscriber, init_subscriber, install_panic_hook};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("order_confirmation_mailer".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);
    install_panic_hook();

    let configuration = get_configuration().context("Failed to read configuration")?;

    // One client for the whole process, the transport pools its SMTP connections
    let email_client = Arc::new(
        EmailClient::from_settings(&configuration.email_client)
            .context("Failed to build the email client")?,
    );
    tracing::info!(sender = %email_client.sender(), "Email configuration loaded");

    // Checking the relay must not keep the server from starting
    let verifier = email_client.clone();
    tokio::spawn(async move {
        match verifier.verify().await {
            Ok(true) => tracing::info!("SMTP relay is ready to send emails"),
            Ok(false) => tracing::error!("SMTP relay rejected the connection test"),
            Err(e) => tracing::error!(error.cause_chain = ?e, "Failed to verify the SMTP relay"),
        }
    });

    let application = Application::build(configuration, email_client)?;
    tracing::info!(port = application.port(), "Server running");
    application.run_until_stopped().await?;

    Ok(())
}
