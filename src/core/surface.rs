//! The rendering surface the converter draws on.
//!
//! A [`Surface`] exposes elements through opaque [`ElementHandle`]s. The
//! converter never looks elements up by marker after startup: [`Widget::bind`]
//! resolves every marker once and hands typed handles to the rest of the code.

use crate::core::error::ConverterError;
use std::collections::HashMap;

pub const CURRENCY_ONE: &str = "currency-one";
pub const CURRENCY_TWO: &str = "currency-two";
pub const CURRENCIES_CONTAINER: &str = "currencies-container";
pub const CONVERTED_VALUE: &str = "converted-value";
pub const CONVERSION_PRECISION: &str = "conversion-precision";
pub const CURRENCY_ONE_TIMES: &str = "currency-one-times";

/// Every marker a surface has to provide.
pub const REQUIRED_MARKERS: [&str; 6] = [
    CURRENCY_ONE,
    CURRENCY_TWO,
    CURRENCIES_CONTAINER,
    CONVERTED_VALUE,
    CONVERSION_PRECISION,
    CURRENCY_ONE_TIMES,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementHandle(usize);

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AlertHandle(u64);

impl AlertHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub selected: bool,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, selected: bool) -> Self {
        Self {
            value: value.into(),
            selected,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub handle: AlertHandle,
    pub message: String,
}

pub trait Surface {
    fn locate(&self, marker: &str) -> Option<ElementHandle>;

    /// Options of a select element, in document order.
    fn options(&self, select: ElementHandle) -> Vec<SelectOption>;

    fn replace_options(&mut self, select: ElementHandle, options: Vec<SelectOption>);

    /// Makes `value` the only selected option, as a user pick would.
    /// Returns false when no option carries that value.
    fn select_value(&mut self, select: ElementHandle, value: &str) -> bool;

    fn text(&self, element: ElementHandle) -> String;

    fn set_text(&mut self, element: ElementHandle, text: &str);

    /// Inserts an alert directly after `anchor`, above any alert already there.
    fn insert_alert_after(&mut self, anchor: ElementHandle, message: &str) -> AlertHandle;

    /// Removes an alert. Returns false when it was already gone.
    fn dismiss_alert(&mut self, alert: AlertHandle) -> bool;

    /// Alerts currently in the document, in document order.
    fn alerts(&self) -> Vec<Alert>;
}

/// Typed handles to the six elements the converter works with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Widget {
    pub currency_one: ElementHandle,
    pub currency_two: ElementHandle,
    pub currencies_container: ElementHandle,
    pub converted_value: ElementHandle,
    pub conversion_precision: ElementHandle,
    pub amount_input: ElementHandle,
}

impl Widget {
    pub fn bind(surface: &impl Surface) -> Result<Self, ConverterError> {
        let locate = |marker: &str| {
            surface
                .locate(marker)
                .ok_or_else(|| ConverterError::Startup(marker.to_string()))
        };
        Ok(Widget {
            currency_one: locate(CURRENCY_ONE)?,
            currency_two: locate(CURRENCY_TWO)?,
            currencies_container: locate(CURRENCIES_CONTAINER)?,
            converted_value: locate(CONVERTED_VALUE)?,
            conversion_precision: locate(CONVERSION_PRECISION)?,
            amount_input: locate(CURRENCY_ONE_TIMES)?,
        })
    }
}

#[derive(Debug, Default, Clone)]
struct Element {
    options: Vec<SelectOption>,
    text: String,
}

#[derive(Debug, Clone)]
struct PlacedAlert {
    anchor: ElementHandle,
    alert: Alert,
}

/// Surface kept entirely in memory.
#[derive(Debug, Clone)]
pub struct MemorySurface {
    elements: Vec<Element>,
    markers: HashMap<String, ElementHandle>,
    alerts: Vec<PlacedAlert>,
    next_alert: u64,
}

impl MemorySurface {
    /// Creates a surface holding exactly the given markers.
    pub fn with_markers<'a>(markers: impl IntoIterator<Item = &'a str>) -> Self {
        let mut surface = MemorySurface {
            elements: Vec::new(),
            markers: HashMap::new(),
            alerts: Vec::new(),
            next_alert: 0,
        };
        for marker in markers {
            let handle = ElementHandle(surface.elements.len());
            surface.elements.push(Element::default());
            surface.markers.insert(marker.to_string(), handle);
        }
        surface
    }

    /// Creates a surface with every required marker.
    pub fn new() -> Self {
        Self::with_markers(REQUIRED_MARKERS)
    }

    fn element(&self, handle: ElementHandle) -> Option<&Element> {
        self.elements.get(handle.0)
    }

    fn element_mut(&mut self, handle: ElementHandle) -> Option<&mut Element> {
        self.elements.get_mut(handle.0)
    }
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for MemorySurface {
    fn locate(&self, marker: &str) -> Option<ElementHandle> {
        self.markers.get(marker).copied()
    }

    fn options(&self, select: ElementHandle) -> Vec<SelectOption> {
        self.element(select)
            .map(|e| e.options.clone())
            .unwrap_or_default()
    }

    fn replace_options(&mut self, select: ElementHandle, options: Vec<SelectOption>) {
        if let Some(element) = self.element_mut(select) {
            element.options = options;
        }
    }

    fn select_value(&mut self, select: ElementHandle, value: &str) -> bool {
        let Some(element) = self.element_mut(select) else {
            return false;
        };
        if !element.options.iter().any(|o| o.value == value) {
            return false;
        }
        for option in &mut element.options {
            option.selected = option.value == value;
        }
        true
    }

    fn text(&self, element: ElementHandle) -> String {
        self.element(element)
            .map(|e| e.text.clone())
            .unwrap_or_default()
    }

    fn set_text(&mut self, element: ElementHandle, text: &str) {
        if let Some(element) = self.element_mut(element) {
            element.text = text.to_string();
        }
    }

    fn insert_alert_after(&mut self, anchor: ElementHandle, message: &str) -> AlertHandle {
        self.next_alert += 1;
        let handle = AlertHandle(self.next_alert);
        let position = self
            .alerts
            .iter()
            .position(|a| a.anchor == anchor)
            .unwrap_or(self.alerts.len());
        self.alerts.insert(
            position,
            PlacedAlert {
                anchor,
                alert: Alert {
                    handle,
                    message: message.to_string(),
                },
            },
        );
        handle
    }

    fn dismiss_alert(&mut self, alert: AlertHandle) -> bool {
        let before = self.alerts.len();
        self.alerts.retain(|a| a.alert.handle != alert);
        self.alerts.len() != before
    }

    fn alerts(&self) -> Vec<Alert> {
        self.alerts.iter().map(|a| a.alert.clone()).collect()
    }
}
