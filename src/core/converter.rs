//! Event handlers wiring the provider, the rate state and the surface together.
//!
//! Every recoverable failure ends up as an alert on the surface. Handlers
//! never return errors; only [`Converter::new`] can fail, when the surface
//! lacks a required element.

use crate::core::alerts;
use crate::core::binder;
use crate::core::calculator;
use crate::core::error::ConverterError;
use crate::core::provider::RateProvider;
use crate::core::state::RateState;
use crate::core::surface::{AlertHandle, ElementHandle, Surface, Widget};
use tracing::{debug, info, instrument};

pub struct Converter<P, S> {
    provider: P,
    surface: S,
    widget: Widget,
    state: RateState,
}

impl<P, S> Converter<P, S>
where
    P: RateProvider,
    S: Surface,
{
    pub fn new(provider: P, surface: S) -> Result<Self, ConverterError> {
        let widget = Widget::bind(&surface)?;
        Ok(Converter {
            provider,
            surface,
            widget,
            state: RateState::new(),
        })
    }

    pub fn state(&self) -> &RateState {
        &self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn widget(&self) -> &Widget {
        &self.widget
    }

    /// Loads rates for `base` and fills both selects, preselecting `base` and `target`.
    pub async fn init(&mut self, base: &str, target: &str) {
        info!(base, target, "Initializing converter");
        self.request_rates(base).await;

        let Some(table) = self.state.get().rates() else {
            return;
        };
        binder::populate(&mut self.surface, &self.widget, table, base, target);
        let missing: Vec<String> = [base, target]
            .into_iter()
            .filter(|code| table.get(code).is_none())
            .map(str::to_string)
            .collect();
        for code in missing {
            self.report(&ConverterError::MissingRate(code));
        }
        self.refresh_outputs();
    }

    /// First select changed: fetch rates for the new base and redraw.
    pub async fn select_base(&mut self, code: &str) {
        if !self.surface.select_value(self.widget.currency_one, code) {
            self.report(&ConverterError::MissingRate(code.to_string()));
            return;
        }
        let base = match self.selected(self.widget.currency_one) {
            Some(base) => base,
            None => return,
        };
        if !self.request_rates(&base).await {
            debug!(base, "Rates still belong to the previous base, skipping render");
            return;
        }
        self.refresh_outputs();
    }

    /// Second select changed: redraw from the current rates.
    pub fn select_target(&mut self, code: &str) {
        if !self.surface.select_value(self.widget.currency_two, code) {
            self.report(&ConverterError::MissingRate(code.to_string()));
            return;
        }
        self.refresh_outputs();
    }

    /// Amount field changed. An empty value keeps the last converted value on screen.
    pub fn input_amount(&mut self, text: &str) {
        self.surface.set_text(self.widget.amount_input, text);
        if text.is_empty() {
            debug!("Empty amount, keeping previous converted value");
            return;
        }

        let Some(target) = self.selected(self.widget.currency_two) else {
            return;
        };
        if target.is_empty() {
            debug!("No target currency selected");
            return;
        }
        let result = calculator::multiplier(&self.state, &target)
            .and_then(|m| calculator::converted_value(text, m));
        match result {
            Ok(Some(value)) => self.surface.set_text(self.widget.converted_value, &value),
            Ok(None) => {}
            Err(e) => {
                self.report(&e);
            }
        }
    }

    pub fn dismiss_alert(&mut self, alert: AlertHandle) -> bool {
        alerts::dismiss(&mut self.surface, alert)
    }

    /// Fetches and stores rates. Failures are reported, never returned;
    /// the result only tells whether the state now holds rates for `base`.
    #[instrument(name = "RequestRates", skip(self))]
    async fn request_rates(&mut self, base: &str) -> bool {
        let result = match self.provider.latest(base).await {
            Ok(snapshot) => self.state.set(snapshot),
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => true,
            Err(e) => {
                self.report(&e);
                false
            }
        }
    }

    fn refresh_outputs(&mut self) {
        if self.state.get().rates().is_none() {
            debug!("No rates loaded, skipping render");
            return;
        }
        let (Some(from), Some(to)) = (
            self.selected(self.widget.currency_one),
            self.selected(self.widget.currency_two),
        ) else {
            return;
        };
        if from.is_empty() || to.is_empty() {
            debug!("Selection incomplete, skipping render");
            return;
        }

        let rendered = calculator::convert_currency(&self.state, &to, true).and_then(|fixed| {
            let raw = calculator::convert_currency(&self.state, &to, false)?;
            Ok((fixed, calculator::unit_rate_text(&from, &raw, &to)))
        });
        match rendered {
            Ok((converted, precision)) => {
                binder::render_outputs(&mut self.surface, &self.widget, &converted, &precision)
            }
            Err(e) => {
                self.report(&e);
            }
        }
    }

    fn selected(&mut self, select: ElementHandle) -> Option<String> {
        match calculator::selected_currency(&self.surface.options(select)) {
            Ok(code) => Some(code),
            Err(e) => {
                self.report(&e);
                None
            }
        }
    }

    fn report(&mut self, error: &ConverterError) -> AlertHandle {
        alerts::report(&mut self.surface, &self.widget, error)
    }
}
