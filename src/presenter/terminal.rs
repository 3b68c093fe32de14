//! Plain-text presenter for terminals.

use super::Presenter;
use crate::core::{Forecast, TimeSeries};
use crate::error::ForecastError;
use crate::models::sarima::ModelFitSummary;
use crate::seasonality::DecompositionResult;
use std::io::{self, Write};

const CHART_WIDTH: usize = 72;
const CHART_HEIGHT: usize = 16;
const OBSERVED_MARK: char = '*';
const FORECAST_MARK: char = '-';

/// Writes tables, an ASCII overlay chart and the fit summary as text.
pub struct TerminalPresenter<W: Write> {
    writer: W,
    width: usize,
    height: usize,
}

impl TerminalPresenter<io::Stdout> {
    /// Presenter writing to standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            width: CHART_WIDTH,
            height: CHART_HEIGHT,
        }
    }

    /// Set the chart size in characters.
    pub fn with_chart_size(mut self, width: usize, height: usize) -> Self {
        self.width = width.max(2);
        self.height = height.max(2);
        self
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn heading(&mut self, title: &str) -> io::Result<()> {
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", title)?;
        writeln!(self.writer, "{}", "=".repeat(title.len()))
    }
}

/// Format a value, leaving undefined ones blank.
fn cell(value: f64, decimals: usize) -> String {
    if value.is_finite() {
        format!("{:.*}", decimals, value)
    } else {
        String::new()
    }
}

/// Render history and forecast on a character grid.
///
/// When there are more points than columns, each column shows the mean of a
/// block of consecutive points; a column containing any forecast point is
/// drawn with the forecast mark.
pub(crate) fn overlay_chart(
    history: &[f64],
    forecast: &[f64],
    width: usize,
    height: usize,
) -> Vec<String> {
    let total = history.len() + forecast.len();
    if total == 0 || height == 0 {
        return Vec::new();
    }
    let columns = total.min(width.max(1));

    let mut points = Vec::with_capacity(columns);
    for c in 0..columns {
        let start = c * total / columns;
        let end = ((c + 1) * total / columns).max(start + 1);
        let values: Vec<f64> = (start..end)
            .map(|i| {
                if i < history.len() {
                    history[i]
                } else {
                    forecast[i - history.len()]
                }
            })
            .filter(|v| v.is_finite())
            .collect();
        let mark = if end > history.len() {
            FORECAST_MARK
        } else {
            OBSERVED_MARK
        };
        let value = if values.is_empty() {
            f64::NAN
        } else {
            values.iter().sum::<f64>() / values.len() as f64
        };
        points.push((value, mark));
    }

    let finite = points.iter().map(|(v, _)| *v).filter(|v| v.is_finite());
    let (min, max) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() {
        return Vec::new();
    }
    let span = if max > min { max - min } else { 1.0 };

    let mut grid = vec![vec![' '; columns]; height];
    for (c, (value, mark)) in points.iter().enumerate() {
        if !value.is_finite() {
            continue;
        }
        let row = ((max - value) / span * (height - 1) as f64).round() as usize;
        grid[row.min(height - 1)][c] = *mark;
    }

    let label_width = format!("{:.0}", max).len().max(format!("{:.0}", min).len());
    grid.iter()
        .enumerate()
        .map(|(r, row)| {
            let label = if r == 0 {
                format!("{:.0}", max)
            } else if r == height - 1 {
                format!("{:.0}", min)
            } else {
                String::new()
            };
            let line: String = row.iter().collect();
            format!("{:>w$} |{}", label, line.trim_end(), w = label_width)
        })
        .collect()
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn present_decomposition(
        &mut self,
        series: &TimeSeries,
        decomposition: &DecompositionResult,
    ) -> io::Result<()> {
        self.heading(&format!(
            "Seasonal decomposition (period {}, {:?})",
            decomposition.period, decomposition.model
        ))?;
        writeln!(
            self.writer,
            "{:<12}{:>12}{:>12}{:>12}{:>12}",
            "date", "observed", "trend", "seasonal", "residual"
        )?;
        for (i, date) in series.timestamps().iter().enumerate() {
            writeln!(
                self.writer,
                "{:<12}{:>12}{:>12}{:>12}{:>12}",
                date.format("%Y-%m-%d").to_string(),
                cell(decomposition.observed[i], 1),
                cell(decomposition.trend[i], 3),
                cell(decomposition.seasonal[i], 3),
                cell(decomposition.residual[i], 3)
            )?;
        }
        writeln!(
            self.writer,
            "seasonal strength {:.3}, trend strength {:.3}",
            decomposition.seasonal_strength(),
            decomposition.trend_strength()
        )
    }

    fn present_overlay(&mut self, series: &TimeSeries, forecast: &Forecast) -> io::Result<()> {
        self.heading(&format!("{} with {}-month forecast", series.label(), forecast.horizon()))?;
        for line in overlay_chart(series.values(), forecast.values(), self.width, self.height) {
            writeln!(self.writer, "{}", line)?;
        }
        let first = series.first_timestamp().map(|d| d.to_string()).unwrap_or_default();
        let last = forecast
            .timestamps()
            .last()
            .copied()
            .or(series.last_timestamp())
            .map(|d| d.to_string())
            .unwrap_or_default();
        writeln!(
            self.writer,
            "{} to {}   {} observed   {} forecast",
            first, last, OBSERVED_MARK, FORECAST_MARK
        )
    }

    fn present_forecast_table(&mut self, forecast: &Forecast) -> io::Result<()> {
        self.heading("Forecast")?;
        match forecast.interval() {
            Some(interval) => {
                let pct = interval.level * 100.0;
                writeln!(
                    self.writer,
                    "{:<12}{:>12}{:>14}{:>14}",
                    "date",
                    "forecast",
                    format!("lo {:.0}%", pct),
                    format!("hi {:.0}%", pct)
                )?;
            }
            None => writeln!(self.writer, "{:<12}{:>12}", "date", "forecast")?,
        }
        for point in forecast.points() {
            let date = point.timestamp.format("%Y-%m-%d").to_string();
            match (point.lower, point.upper) {
                (Some(lo), Some(hi)) => writeln!(
                    self.writer,
                    "{:<12}{:>12.3}{:>14.3}{:>14.3}",
                    date, point.value, lo, hi
                )?,
                _ => writeln!(self.writer, "{:<12}{:>12.3}", date, point.value)?,
            }
        }
        Ok(())
    }

    fn present_summary(&mut self, summary: &ModelFitSummary) -> io::Result<()> {
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", summary.as_text())
    }

    fn present_error(&mut self, error: &ForecastError) -> io::Result<()> {
        writeln!(self.writer, "error [{}]: {}", error.kind(), error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Dataset;
    use crate::error::{LoadError, ParameterError};
    use crate::pipeline::{ForecastPipeline, PipelineParams};
    use chrono::NaiveDate;

    fn render(outcome: &crate::error::Result<crate::pipeline::PipelineReport>) -> String {
        let mut presenter = TerminalPresenter::new(Vec::new());
        presenter.present(outcome).unwrap();
        String::from_utf8(presenter.into_inner()).unwrap()
    }

    #[test]
    fn chart_marks_forecast_columns() {
        let history: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let forecast = vec![20.0, 21.0, 22.0, 23.0];
        let lines = overlay_chart(&history, &forecast, 100, 8);

        assert_eq!(lines.len(), 8);
        let body: String = lines.iter().map(|l| l.split('|').nth(1).unwrap_or("")).collect();
        assert_eq!(body.matches(OBSERVED_MARK).count(), 20);
        assert_eq!(body.matches(FORECAST_MARK).count(), 4);
        assert!(lines[0].starts_with("23"));
        assert!(lines[7].trim_start().starts_with('0'));
    }

    #[test]
    fn chart_downsamples_to_width() {
        let history: Vec<f64> = (0..300).map(|i| (i as f64 * 0.1).sin()).collect();
        let lines = overlay_chart(&history, &[0.0; 30], 50, 10);
        for line in &lines {
            let body = line.split('|').nth(1).unwrap_or("");
            assert!(body.chars().count() <= 50);
        }
    }

    #[test]
    fn chart_handles_flat_and_empty_input() {
        assert!(overlay_chart(&[], &[], 10, 5).is_empty());
        let lines = overlay_chart(&[5.0; 4], &[5.0], 10, 3);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains('*'));
    }

    #[test]
    fn overlay_uses_configured_chart_size() {
        let anchor = NaiveDate::from_ymd_opt(2020, 1, 31).unwrap();
        let series = TimeSeries::monthly(anchor, (0..40).map(|i| i as f64).collect()).unwrap();
        let future = series.future_timestamps(8).unwrap();
        let forecast = Forecast::from_values(future, (40..48).map(|i| i as f64).collect()).unwrap();

        let mut presenter = TerminalPresenter::new(Vec::new()).with_chart_size(12, 4);
        presenter.present_overlay(&series, &forecast).unwrap();
        let text = String::from_utf8(presenter.into_inner()).unwrap();

        let chart: Vec<&str> = text.lines().filter(|l| l.contains(" |")).collect();
        assert_eq!(chart.len(), 4);
        for line in &chart {
            let body = line.split('|').nth(1).unwrap_or("");
            assert!(body.chars().count() <= 12);
        }
        assert!(text.contains("2020-01-31 to 2023-12-31"));

        // Sizes below two characters are raised to the minimum.
        let mut tiny = TerminalPresenter::new(Vec::new()).with_chart_size(0, 0);
        tiny.present_overlay(&series, &forecast).unwrap();
        let text = String::from_utf8(tiny.into_inner()).unwrap();
        assert_eq!(text.lines().filter(|l| l.contains(" |")).count(), 2);
    }

    #[test]
    fn error_is_the_only_output() {
        let err: crate::error::ForecastError = ParameterError::HorizonOutOfRange {
            horizon: 49,
            min: 1,
            max: 48,
        }
        .into();
        let text = render(&Err(err));
        assert_eq!(
            text,
            "error [ParameterError]: parameter error: forecast horizon 49 is outside [1, 48]\n"
        );

        let text = render(&Err(LoadError::Empty.into()));
        assert!(text.starts_with("error [LoadError]"));
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn report_has_all_sections() {
        let pipeline = ForecastPipeline::new(Dataset::reference().unwrap());
        let params = PipelineParams::new(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(), 12);
        let text = render(&pipeline.run(&params));

        assert!(text.contains("Seasonal decomposition (period 12, Additive)"));
        assert!(text.contains("production with 12-month forecast"));
        assert!(text.contains("Forecast\n"));
        assert!(text.contains("lo 95%"));
        assert!(text.contains("2038-05-31"));
        assert!(text.contains("SARIMAX Results"));
        assert!(!text.contains("error ["));
    }
}
