use rust_decimal::{Decimal, RoundingStrategy};

/// An order as submitted by the storefront checkout.
///
/// Text fields are not checked, a missing one renders empty. Quantities,
/// prices and the total are taken as given (the total is not reconciled
/// against the items).
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub street_address: String,
    #[serde(default)]
    pub apartment: Option<String>,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub pin_code: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub cart_items: Vec<LineItem>,
    pub total: Decimal,
}

impl OrderDetails {
    /// The apartment line, if there is anything to print.
    pub fn apartment(&self) -> Option<&str> {
        self.apartment
            .as_deref()
            .filter(|apartment| !apartment.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct LineItem {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub size: String,
    pub quantity: i64,
    /// Unit price
    pub price: Decimal,
}

/// Formats an amount with exactly two fractional digits.
///
/// Midpoints round away from zero, so `19.995` becomes `20.00`.
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}
