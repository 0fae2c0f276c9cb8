use super::ui;
use crate::core::{Catalog, Conversion, CurrencyCode, CurrencyConverter, MarketDataProvider};
use anyhow::Result;

/// Converts `amount` between two currencies at the latest rate and prints the result.
pub async fn run(
    provider: &dyn MarketDataProvider,
    catalog: &Catalog,
    amount: f64,
    from: CurrencyCode,
    to: CurrencyCode,
) -> Result<()> {
    let converter = CurrencyConverter::new(provider, catalog);

    let spinner = ui::new_spinner(&format!("Fetching {from}/{to} rate..."));
    let result = converter.convert(amount, from, to).await;
    spinner.finish_and_clear();

    println!("{}", render(&result?));
    Ok(())
}

fn render(conversion: &Conversion) -> String {
    let Conversion {
        amount,
        from,
        to,
        rate,
        converted,
    } = conversion;
    format!(
        "{} {} = {}\n{}",
        ui::style_text("Converted amount:", ui::StyleType::Label),
        format!("{amount:.2} {from}"),
        ui::style_text(&format!("{converted:.2} {to}"), ui::StyleType::Value),
        ui::style_text(
            &format!("Rate: 1 {from} = {} {to}", ui::format_number(*rate)),
            ui::StyleType::Subtle
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        console::set_colors_enabled(false);
        let conversion = Conversion {
            amount: 10.0,
            from: CurrencyCode::Usd,
            to: CurrencyCode::Pkr,
            rate: 278.5,
            converted: 2785.0,
        };
        assert_eq!(
            render(&conversion),
            "Converted amount: 10.00 USD = 2785.00 PKR\nRate: 1 USD = 278.5 PKR"
        );
    }
}
