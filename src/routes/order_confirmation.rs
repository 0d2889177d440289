use std::fmt::{Debug, Formatter};

use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use anyhow::Context;

use crate::domain::{render_order_confirmation, OrderDetails};
use crate::email_client::MailSender;
use crate::routes::error_chain_fmt;

/// Body of `POST /api/send-order-confirmation`.
///
/// Both fields are optional at the type level so a missing one is reported
/// as such instead of as a malformed body. `orderDetails` is kept as raw JSON
/// until the presence check is done.
#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmationRequest {
    order_details: Option<serde_json::Value>,
    user_email: Option<String>,
}

/// `null`, `false`, `0` and `""` count as not provided.
fn is_blank(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => true,
        serde_json::Value::Bool(b) => !b,
        serde_json::Value::Number(n) => n.as_f64() == Some(0.0),
        serde_json::Value::String(s) => s.is_empty(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => false,
    }
}

#[derive(serde::Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(thiserror::Error)]
pub enum OrderConfirmationError {
    #[error("Missing required fields")]
    MissingFields,
    #[error("Invalid request body")]
    InvalidOrderDetails(#[source] serde_json::Error),
    // Render or delivery failure. The cause is only logged, callers get the
    // generic message
    #[error("Failed to send order confirmation email")]
    DeliveryFailed(#[source] anyhow::Error),
}

impl Debug for OrderConfirmationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for OrderConfirmationError {
    fn status_code(&self) -> StatusCode {
        match self {
            OrderConfirmationError::MissingFields
            | OrderConfirmationError::InvalidOrderDetails(_) => StatusCode::BAD_REQUEST,
            OrderConfirmationError::DeliveryFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}

#[tracing::instrument(
    name = "Send order confirmation email",
    skip(body, mail_sender),
    fields(user_email = tracing::field::Empty)
)]
pub async fn send_order_confirmation(
    body: web::Json<OrderConfirmationRequest>,
    mail_sender: web::Data<dyn MailSender>,
) -> Result<HttpResponse, OrderConfirmationError> {
    let OrderConfirmationRequest {
        order_details,
        user_email,
    } = body.into_inner();

    // An empty address is as good as a missing one
    let (order, user_email) = match (
        order_details.filter(|order| !is_blank(order)),
        user_email.filter(|e| !e.is_empty()),
    ) {
        (Some(order), Some(user_email)) => (order, user_email),
        _ => return Err(OrderConfirmationError::MissingFields),
    };
    tracing::Span::current().record("user_email", &tracing::field::display(&user_email));

    let order: OrderDetails = serde_json::from_value(order).map_err(|e| {
        tracing::warn!(error = %e, "Rejected malformed order details");
        OrderConfirmationError::InvalidOrderDetails(e)
    })?;

    let outcome = match render_order_confirmation(&order, &user_email)
        .context("Failed to render the order confirmation email")
    {
        Ok(message) => mail_sender
            .send(&message)
            .await
            .context("Failed to deliver the order confirmation email"),
        Err(e) => Err(e),
    };

    match outcome {
        Ok(()) => {
            tracing::info!("Order confirmation email sent successfully");
            Ok(HttpResponse::Ok().json(MessageResponse {
                message: "Order confirmation email sent successfully".into(),
            }))
        }
        Err(e) => {
            tracing::error!(
                error.cause_chain = ?e,
                "Failed to send order confirmation email"
            );
            Err(OrderConfirmationError::DeliveryFailed(e))
        }
    }
}
