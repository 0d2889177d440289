mod health_check;
mod order_confirmation;

pub use health_check::*;
pub use order_confirmation::*;

/// Writes the error followed by every error in its `source` chain.
///
/// Used as the `Debug` representation of the crate's errors so the logs show
/// the full cause and not just the top-level message.
pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}
