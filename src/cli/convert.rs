use super::terminal::{self, TerminalSurface};
use crate::core::{Converter, RateProvider, Surface};
use anyhow::{Result, bail};

/// Runs the widget once: load rates for `base`, pick `target`, type `amount`.
///
/// Returns the rendered frame, or fails with the alert messages when any
/// step raised one.
pub async fn convert<P: RateProvider>(
    provider: P,
    base: &str,
    target: &str,
    amount: Option<&str>,
) -> Result<String> {
    let mut converter = Converter::new(provider, TerminalSurface::new())?;
    converter.init(base, target).await;
    if let Some(amount) = amount {
        converter.input_amount(amount);
    }

    let alerts = converter.surface().alerts();
    if !alerts.is_empty() {
        let messages: Vec<String> = alerts.into_iter().map(|a| a.message).collect();
        bail!("Conversion failed: {}", messages.join("; "));
    }

    Ok(terminal::render_frame(
        converter.surface(),
        converter.widget(),
        converter.state().get(),
    ))
}

pub async fn run<P: RateProvider>(
    provider: P,
    base: &str,
    target: &str,
    amount: Option<&str>,
) -> Result<()> {
    let frame = convert(provider, base, target, amount).await?;
    println!("{frame}");
    Ok(())
}
