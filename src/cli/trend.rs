use super::ui;
use crate::core::{CurrencyCode, HistoricalRateFetcher, MarketDataProvider, RateSeries, TrendRange};
use anyhow::Result;
use chrono::NaiveDate;
use comfy_table::Cell;

/// What to chart: a currency pair and either a preset range or explicit dates.
#[derive(Debug, Clone)]
pub struct TrendRequest {
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    pub range: Option<TrendRange>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub show_table: bool,
}

impl TrendRequest {
    /// Explicit dates win over the preset; with neither, the last month is shown.
    fn resolve_dates(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let end = self.end.unwrap_or(today);
        let start = self.start.unwrap_or_else(|| {
            self.range
                .unwrap_or(TrendRange::OneMonth)
                .start_from(end)
        });
        (start, end)
    }
}

pub async fn run(provider: &dyn MarketDataProvider, request: &TrendRequest) -> Result<()> {
    let fetcher = HistoricalRateFetcher::new(provider);
    let (start, end) = request.resolve_dates(fetcher.today());

    let spinner = ui::new_spinner(&format!(
        "Fetching {}/{} rates from {start} to {end}...",
        request.from, request.to
    ));
    let result = fetcher.fetch(request.from, request.to, start, end).await;
    spinner.finish_and_clear();

    let series = result?;
    println!(
        "{}",
        render(request, start, end, &series, ui::term_width())
    );
    Ok(())
}

fn render(
    request: &TrendRequest,
    start: NaiveDate,
    end: NaiveDate,
    series: &RateSeries,
    width: usize,
) -> String {
    let title = format!(
        "{}/{} exchange rate, {start} to {end}",
        request.from, request.to
    );
    let mut out = ui::style_text(&title, ui::StyleType::Title);
    out.push('\n');

    let (Some(first), Some(last), Some(min), Some(max)) =
        (series.first(), series.last(), series.min(), series.max())
    else {
        out.push_str(&ui::style_text(
            "No trading data in this range.",
            ui::StyleType::Subtle,
        ));
        return out;
    };

    let rates: Vec<f64> = series.points().iter().map(|p| p.rate).collect();
    out.push_str(&ui::sparkline(&rates, width.saturating_sub(2).max(1)));
    out.push('\n');

    let mut summary = ui::new_styled_table();
    summary.set_header(vec![
        ui::header_cell("First"),
        ui::header_cell("Last"),
        ui::header_cell("Low"),
        ui::header_cell("High"),
        ui::header_cell("Change"),
    ]);
    let change = series
        .change_pct()
        .map_or_else(|| Cell::new("N/A"), ui::change_cell);
    summary.add_row(vec![
        ui::number_cell(format!("{:.4} ({})", first.rate, first.date)),
        ui::number_cell(format!("{:.4} ({})", last.rate, last.date)),
        ui::number_cell(format!("{:.4} ({})", min.rate, min.date)),
        ui::number_cell(format!("{:.4} ({})", max.rate, max.date)),
        change,
    ]);
    out.push_str(&summary.to_string());

    if request.show_table {
        let mut table = ui::new_styled_table();
        table.set_header(vec![ui::header_cell("Date"), ui::header_cell("Close")]);
        for point in series.points() {
            table.add_row(vec![
                Cell::new(point.date),
                ui::number_cell(format!("{:.4}", point.rate)),
            ]);
        }
        out.push('\n');
        out.push_str(&table.to_string());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request() -> TrendRequest {
        TrendRequest {
            from: CurrencyCode::Usd,
            to: CurrencyCode::Pkr,
            range: None,
            start: None,
            end: None,
            show_table: false,
        }
    }

    #[test]
    fn test_resolve_dates() {
        let today = date(2024, 7, 31);
        assert_eq!(
            request().resolve_dates(today),
            (date(2024, 7, 1), today)
        );

        let yearly = TrendRequest {
            range: Some(TrendRange::OneYear),
            ..request()
        };
        assert_eq!(yearly.resolve_dates(today), (date(2023, 8, 1), today));

        let custom = TrendRequest {
            range: Some(TrendRange::OneYear),
            start: Some(date(2024, 2, 1)),
            end: Some(date(2024, 3, 1)),
            ..request()
        };
        assert_eq!(
            custom.resolve_dates(today),
            (date(2024, 2, 1), date(2024, 3, 1))
        );
    }

    #[test]
    fn test_render_empty_series() {
        console::set_colors_enabled(false);
        let text = render(
            &request(),
            date(2024, 3, 9),
            date(2024, 3, 9),
            &RateSeries::default(),
            80,
        );
        assert_eq!(
            text,
            "USD/PKR exchange rate, 2024-03-09 to 2024-03-09\nNo trading data in this range."
        );
    }

    #[test]
    fn test_render_series() {
        console::set_colors_enabled(false);
        let series = RateSeries::from_points(vec![
            (date(2024, 3, 4), 280.0),
            (date(2024, 3, 5), 279.0),
            (date(2024, 3, 6), 281.4),
        ]);
        let with_table = TrendRequest {
            show_table: true,
            ..request()
        };

        let text = render(&with_table, date(2024, 3, 4), date(2024, 3, 6), &series, 80);
        assert!(text.contains("▄▁█"));
        assert!(text.contains("281.4000 (2024-03-06)"));
        assert!(text.contains("279.0000 (2024-03-05)"));
        assert!(text.contains("0.50%"));
        assert!(text.contains("2024-03-05"));
        assert!(text.contains("Close"));
    }
}
