use std::net::TcpListener;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::error::InternalError;
use actix_web::{web, App, HttpResponse, HttpServer};
use tracing_actix_web::TracingLogger;

use crate::configuration::{CorsSettings, Settings};
use crate::email_client::MailSender;
use crate::routes::{health_check, send_order_confirmation, ErrorResponse};

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    /// Binds the configured address and builds the server around `mail_sender`.
    ///
    /// A port of `0` asks the OS for a random one, see [`Application::port`].
    pub fn build(
        configuration: Settings,
        mail_sender: Arc<dyn MailSender>,
    ) -> Result<Self, std::io::Error> {
        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(address)?;
        let port = listener.local_addr()?.port();
        let server = run(listener, mail_sender, configuration.cors)?;

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Only returns when the server is stopped
    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn run(
    listener: TcpListener,
    mail_sender: Arc<dyn MailSender>,
    cors: CorsSettings,
) -> Result<Server, std::io::Error> {
    // `web::Data` is an `Arc` already, every worker shares the same sender
    let mail_sender: web::Data<dyn MailSender> = web::Data::from(mail_sender);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware(&cors))
            .wrap(TracingLogger::default())
            .app_data(json_config())
            .route("/health_check", web::get().to(health_check))
            .route(
                "/api/send-order-confirmation",
                web::post().to(send_order_confirmation),
            )
            .app_data(mail_sender.clone())
    })
    .listen(listener)?
    .run();
    // No .await here
    Ok(server)
}

fn cors_middleware(settings: &CorsSettings) -> Cors {
    settings
        .allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST"])
        .allow_any_header()
        .supports_credentials()
}

/// Malformed JSON bodies get the same `{"error": ...}` shape as every other failure
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        tracing::warn!(error = %err, "Rejected an invalid request body");
        let response = HttpResponse::BadRequest().json(ErrorResponse {
            error: "Invalid request body".into(),
        });
        InternalError::from_response(err, response).into()
    })
}
