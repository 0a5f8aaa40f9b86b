use crate::core::snapshot::RateTable;
use crate::core::surface::{SelectOption, Surface, Widget};

/// One option per currency code, in table order, marking `selected` if present.
pub fn options_for(table: &RateTable, selected: &str) -> Vec<SelectOption> {
    table
        .codes()
        .map(|code| SelectOption::new(code, code == selected))
        .collect()
}

/// Fills both currency selects from the rate table.
pub fn populate(
    surface: &mut impl Surface,
    widget: &Widget,
    table: &RateTable,
    currency_one: &str,
    currency_two: &str,
) {
    surface.replace_options(widget.currency_one, options_for(table, currency_one));
    surface.replace_options(widget.currency_two, options_for(table, currency_two));
}

pub fn render_outputs(
    surface: &mut impl Surface,
    widget: &Widget,
    converted_value: &str,
    precision: &str,
) {
    surface.set_text(widget.converted_value, converted_value);
    surface.set_text(widget.conversion_precision, precision);
}
