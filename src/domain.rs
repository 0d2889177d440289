pub mod email_message;
pub mod order_details;

pub use email_message::{render_order_confirmation, EmailMessage};
pub use order_details::{LineItem, OrderDetails};
