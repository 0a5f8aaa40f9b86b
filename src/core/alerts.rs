use crate::core::error::ConverterError;
use crate::core::surface::{AlertHandle, Surface, Widget};
use tracing::warn;

/// Shows a dismissible alert right after the currency selectors.
pub fn report(surface: &mut impl Surface, widget: &Widget, error: &ConverterError) -> AlertHandle {
    warn!(error = ?error, "Conversion failed");
    surface.insert_alert_after(widget.currencies_container, &error.to_string())
}

/// Close control of an alert.
pub fn dismiss(surface: &mut impl Surface, alert: AlertHandle) -> bool {
    surface.dismiss_alert(alert)
}
