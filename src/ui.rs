//! The presentation port and its terminal implementation.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

use crate::controller::ConversionResult;
use crate::error::RateError;
use crate::insight::{RateInsight, Trend};

/// Everything the conversion engine tells the outside world. Keeps the
/// engine testable without a terminal.
pub trait Presenter: Send + Sync {
    fn render_result(&self, result: &ConversionResult);
    fn render_insight(&self, insight: &RateInsight);
    fn render_error(&self, error: &RateError);
    fn clear_error(&self);
    fn set_loading(&self, loading: bool);
    fn warn_degraded(&self);
}

/// Terminal presenter: styled output plus a spinner while a request runs.
pub struct CliPresenter {
    spinner: Mutex<Option<ProgressBar>>,
}

impl CliPresenter {
    pub fn new() -> Self {
        CliPresenter {
            spinner: Mutex::new(None),
        }
    }
}

impl Default for CliPresenter {
    fn default() -> Self {
        Self::new()
    }
}

fn new_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner());
    pb.set_message("Fetching rates...");
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn rate_cell(value: f64) -> Cell {
    Cell::new(format!("{value:.4}")).set_alignment(CellAlignment::Right)
}

fn trend_text(trend: Trend) -> String {
    let styled = match trend {
        Trend::Up => style("up").green().bold(),
        Trend::Down => style("down").red().bold(),
        Trend::Stable => style("stable").dim(),
    };
    styled.to_string()
}

impl Presenter for CliPresenter {
    fn render_result(&self, result: &ConversionResult) {
        println!(
            "{} {} = {} {}",
            result.original_amount,
            result.from,
            style(format!("{:.2}", result.converted_amount)).green().bold(),
            result.to
        );
        println!(
            "{}",
            style(format!(
                "1 {} = {:.4} {}",
                result.from, result.rate, result.to
            ))
            .dim()
        );
    }

    fn render_insight(&self, insight: &RateInsight) {
        let mut table = new_styled_table();
        table.set_header(vec![
            header_cell("Min"),
            header_cell("Max"),
            header_cell("Average"),
            header_cell("Latest"),
            header_cell("Trend"),
        ]);
        table.add_row(vec![
            rate_cell(insight.min),
            rate_cell(insight.max),
            rate_cell(insight.average),
            rate_cell(insight.latest),
            Cell::new(trend_text(insight.trend)),
        ]);

        println!(
            "{} ({} samples over 7 days)",
            style(format!("{}/{}", insight.from, insight.to)).bold().underlined(),
            insight.samples.len()
        );
        println!("{table}");
    }

    fn render_error(&self, error: &RateError) {
        match error {
            RateError::Validation(issues) => {
                for issue in issues {
                    eprintln!("{}", style(issue).red());
                }
            }
            other => eprintln!("{}", style(other).red()),
        }
    }

    fn clear_error(&self) {
        // A terminal has no error region to clear; messages just scroll.
    }

    fn set_loading(&self, loading: bool) {
        let mut spinner = self.spinner.lock().unwrap();
        if loading {
            spinner.get_or_insert_with(new_spinner);
        } else if let Some(pb) = spinner.take() {
            pb.finish_and_clear();
        }
    }

    fn warn_degraded(&self) {
        eprintln!(
            "{}",
            style("Live currency list unavailable; using a built-in set of common currencies.")
                .yellow()
        );
    }
}
