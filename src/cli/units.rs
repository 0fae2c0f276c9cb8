use super::ui;
use crate::core::{Catalog, UnitConverter, UnitRegistry};
use anyhow::Result;

/// Converts `value` between two units and prints the result.
pub fn run(
    registry: &UnitRegistry,
    catalog: &Catalog,
    value: f64,
    from: &str,
    to: &str,
) -> Result<()> {
    let converter = UnitConverter::new(registry);
    let converted = converter.convert(value, from, to)?;
    println!("{}", render(registry, catalog, value, from, to, converted)?);
    Ok(())
}

fn render(
    registry: &UnitRegistry,
    catalog: &Catalog,
    value: f64,
    from: &str,
    to: &str,
    converted: f64,
) -> Result<String> {
    let from_unit = registry.parse(from)?;
    let to_unit = registry.parse(to)?;
    let category = catalog
        .category_of(to_unit)
        .map_or("Unit", |c| c.name);

    Ok(format!(
        "{} {}\n{}",
        ui::style_text("Converted value:", ui::StyleType::Label),
        ui::style_text(
            &format!("{} {}", ui::format_number(converted), to_unit),
            ui::StyleType::Value
        ),
        ui::style_text(
            &format!("{category} conversion from {} {from_unit}", ui::format_number(value)),
            ui::StyleType::Subtle
        ),
    ))
}
