use askama::Template;

use crate::domain::order_details::{format_amount, OrderDetails};

pub const ORDER_CONFIRMATION_SUBJECT: &str = "Order Confirmation - Tulsi Fashion Store";

/// A rendered email, ready to be handed to a [`MailSender`](crate::email_client::MailSender).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub recipient: String,
    pub subject: String,
    /// HTML body
    pub body: String,
}

#[derive(Template)]
#[template(path = "order_confirmation.html")]
struct OrderConfirmationHtml<'a> {
    first_name: &'a str,
    last_name: &'a str,
    items: Vec<LineItemHtml<'a>>,
    total: String,
    street_address: &'a str,
    apartment: Option<&'a str>,
    city: &'a str,
    state: &'a str,
    pin_code: &'a str,
    country: &'a str,
}

struct LineItemHtml<'a> {
    name: &'a str,
    size: &'a str,
    quantity: i64,
    price: String,
}

/// Renders the order confirmation email for `user_email`.
///
/// Pure: the same order and address always produce the same message. All
/// interpolated text is HTML-escaped by the template engine.
pub fn render_order_confirmation(
    order: &OrderDetails,
    user_email: &str,
) -> Result<EmailMessage, askama::Error> {
    let body = OrderConfirmationHtml {
        first_name: &order.first_name,
        last_name: &order.last_name,
        items: order
            .cart_items
            .iter()
            .map(|item| LineItemHtml {
                name: &item.name,
                size: &item.size,
                quantity: item.quantity,
                price: format_amount(item.price),
            })
            .collect(),
        total: format_amount(order.total),
        street_address: &order.street_address,
        apartment: order.apartment(),
        city: &order.city,
        state: &order.state,
        pin_code: &order.pin_code,
        country: &order.country,
    }
    .render()?;

    Ok(EmailMessage {
        recipient: user_email.to_owned(),
        subject: ORDER_CONFIRMATION_SUBJECT.to_owned(),
        body,
    })
}
