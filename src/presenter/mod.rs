//! Presentation of pipeline results.
//!
//! A [`Presenter`] is the terminal sink of a run: it receives either the full
//! report or the error that ended the run, and returns nothing to the
//! pipeline apart from I/O failures.

mod json;
mod terminal;

pub use json::JsonPresenter;
pub use terminal::TerminalPresenter;

use crate::core::{Forecast, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::models::sarima::ModelFitSummary;
use crate::pipeline::PipelineReport;
use crate::seasonality::DecompositionResult;
use std::io;

/// Output sink for forecast reports.
pub trait Presenter {
    /// Observed, trend, seasonal and residual components.
    fn present_decomposition(
        &mut self,
        series: &TimeSeries,
        decomposition: &DecompositionResult,
    ) -> io::Result<()>;

    /// History and forecast on one chart.
    fn present_overlay(&mut self, series: &TimeSeries, forecast: &Forecast) -> io::Result<()>;

    /// Forecast points, one row per month.
    fn present_forecast_table(&mut self, forecast: &Forecast) -> io::Result<()>;

    /// Model fit summary.
    fn present_summary(&mut self, summary: &ModelFitSummary) -> io::Result<()>;

    /// The error that ended a run.
    fn present_error(&mut self, error: &ForecastError) -> io::Result<()>;

    /// A complete report, section by section.
    fn present_report(&mut self, report: &PipelineReport) -> io::Result<()> {
        self.present_decomposition(&report.series, &report.decomposition)?;
        self.present_overlay(&report.series, &report.forecast)?;
        self.present_forecast_table(&report.forecast)?;
        self.present_summary(&report.summary)
    }

    /// Show the outcome of a run: the full report or only the error.
    fn present(&mut self, outcome: &Result<PipelineReport>) -> io::Result<()> {
        match outcome {
            Ok(report) => self.present_report(report),
            Err(error) => self.present_error(error),
        }
    }
}
