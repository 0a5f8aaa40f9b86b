//! Terminal rendition of the converter widget.

use super::ui;
use crate::core::calculator;
use crate::core::snapshot::RateSnapshot;
use crate::core::surface::{
    Alert, AlertHandle, ElementHandle, MemorySurface, SelectOption, Surface, Widget,
};
use comfy_table::Cell;

/// Surface printed to the terminal.
///
/// Element state lives in a [`MemorySurface`]; every mutation bumps a
/// revision counter so the event loop only redraws after a change.
#[derive(Debug, Default)]
pub struct TerminalSurface {
    inner: MemorySurface,
    revision: u64,
}

impl TerminalSurface {
    pub fn new() -> Self {
        TerminalSurface {
            inner: MemorySurface::new(),
            revision: 0,
        }
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision += 1;
    }
}

impl Surface for TerminalSurface {
    fn locate(&self, marker: &str) -> Option<ElementHandle> {
        self.inner.locate(marker)
    }

    fn options(&self, select: ElementHandle) -> Vec<SelectOption> {
        self.inner.options(select)
    }

    fn replace_options(&mut self, select: ElementHandle, options: Vec<SelectOption>) {
        self.touch();
        self.inner.replace_options(select, options)
    }

    fn select_value(&mut self, select: ElementHandle, value: &str) -> bool {
        let changed = self.inner.select_value(select, value);
        if changed {
            self.touch();
        }
        changed
    }

    fn text(&self, element: ElementHandle) -> String {
        self.inner.text(element)
    }

    fn set_text(&mut self, element: ElementHandle, text: &str) {
        self.touch();
        self.inner.set_text(element, text)
    }

    fn insert_alert_after(&mut self, anchor: ElementHandle, message: &str) -> AlertHandle {
        self.touch();
        self.inner.insert_alert_after(anchor, message)
    }

    fn dismiss_alert(&mut self, alert: AlertHandle) -> bool {
        let removed = self.inner.dismiss_alert(alert);
        if removed {
            self.touch();
        }
        removed
    }

    fn alerts(&self) -> Vec<Alert> {
        self.inner.alerts()
    }
}

fn selected_or_dash(surface: &impl Surface, select: ElementHandle) -> String {
    calculator::selected_currency(&surface.options(select))
        .ok()
        .filter(|code| !code.is_empty())
        .unwrap_or_else(|| "-".to_string())
}

/// Renders the widget as it would appear on screen.
pub fn render_frame(surface: &impl Surface, widget: &Widget, snapshot: &RateSnapshot) -> String {
    let mut output = format!("{}\n\n", ui::style_text("Conversor de moedas", ui::StyleType::Title));

    let available = surface.options(widget.currency_one).len();
    output.push_str(&format!(
        "  {}  {}  {}\n",
        ui::style_text("De:  ", ui::StyleType::Label),
        selected_or_dash(surface, widget.currency_one),
        ui::style_text(&format!("({available} moedas)"), ui::StyleType::Subtle)
    ));
    output.push_str(&format!(
        "  {}  {}\n",
        ui::style_text("Para:", ui::StyleType::Label),
        selected_or_dash(surface, widget.currency_two)
    ));

    for alert in surface.alerts() {
        output.push_str(&format!(
            "  {} {}\n",
            ui::style_text(&format!("[{}] ⚠", alert.handle.id()), ui::StyleType::Alert),
            ui::style_text(&alert.message, ui::StyleType::Alert)
        ));
    }

    let amount = surface.text(widget.amount_input);
    if !amount.is_empty() {
        output.push_str(&format!(
            "\n  {} {}",
            ui::style_text("Valor:     ", ui::StyleType::Label),
            amount
        ));
    }
    output.push_str(&format!(
        "\n  {} {}\n",
        ui::style_text("Convertido:", ui::StyleType::Label),
        ui::style_text(&surface.text(widget.converted_value), ui::StyleType::Value)
    ));
    output.push_str(&format!("  {}\n", surface.text(widget.conversion_precision)));

    if let Some(updated) = snapshot.last_updated {
        output.push_str(&format!(
            "  {}\n",
            ui::style_text(
                &format!("Atualizado em {}", updated.format("%Y-%m-%d %H:%M UTC")),
                ui::StyleType::Subtle
            )
        ));
    }

    output
}

/// Table of the currencies offered by the second select with their rates.
pub fn currencies_table(surface: &impl Surface, widget: &Widget, snapshot: &RateSnapshot) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Moeda"),
        ui::header_cell(&format!("Taxa (1 {})", snapshot.base_code)),
    ]);

    for option in surface.options(widget.currency_two) {
        let rate = snapshot
            .rates()
            .and_then(|r| r.get(&option.value))
            .unwrap_or("N/A");
        table.add_row(vec![
            Cell::new(&option.value),
            ui::rate_cell(rate, option.selected),
        ]);
    }

    table.to_string()
}
