use super::ui;
use crate::core::Catalog;
use comfy_table::Cell;

/// Prints the unit categories and supported currencies.
pub fn run(catalog: &Catalog) {
    println!("{}", render(catalog));
}

fn render(catalog: &Catalog) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Category"), ui::header_cell("Units")]);
    for category in catalog.categories() {
        let units = category
            .units
            .iter()
            .map(|u| format!("{} ({})", u.id(), u.symbol()))
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![Cell::new(category.name), Cell::new(units)]);
    }

    let currencies = catalog
        .currencies()
        .iter()
        .map(|c| c.code())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "{}\n{}\n\n{} {}",
        ui::style_text("Units", ui::StyleType::Title),
        table,
        ui::style_text("Currencies:", ui::StyleType::Label),
        currencies
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_lists_everything() {
        console::set_colors_enabled(false);
        let text = render(&Catalog::new());

        for name in ["Length", "Weight", "Temperature", "Speed", "Volume"] {
            assert!(text.contains(name), "missing {name}");
        }
        assert!(text.contains("kilometer/hour (km/h)"));
        assert!(text.ends_with("Currencies: USD, EUR, PKR, GBP, JPY, INR, CAD, AUD, CNY"));
    }
}
