//! JSON presenter: one document per run.

use super::Presenter;
use crate::core::{Forecast, TimeSeries};
use crate::error::ForecastError;
use crate::models::sarima::ModelFitSummary;
use crate::pipeline::PipelineReport;
use crate::seasonality::DecompositionResult;
use serde::Serialize;
use serde_json::json;
use std::io::{self, Write};

/// Writes reports as pretty-printed JSON. Undefined values become `null`.
pub struct JsonPresenter<W: Write> {
    writer: W,
}

impl JsonPresenter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> JsonPresenter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn emit<T: Serialize + ?Sized>(&mut self, value: &T) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, value)?;
        writeln!(self.writer)
    }
}

impl<W: Write> Presenter for JsonPresenter<W> {
    fn present_decomposition(
        &mut self,
        series: &TimeSeries,
        decomposition: &DecompositionResult,
    ) -> io::Result<()> {
        self.emit(&json!({
            "timestamps": series.timestamps(),
            "decomposition": decomposition,
        }))
    }

    fn present_overlay(&mut self, series: &TimeSeries, forecast: &Forecast) -> io::Result<()> {
        self.emit(&json!({ "series": series, "forecast": forecast }))
    }

    fn present_forecast_table(&mut self, forecast: &Forecast) -> io::Result<()> {
        self.emit(forecast)
    }

    fn present_summary(&mut self, summary: &ModelFitSummary) -> io::Result<()> {
        self.emit(summary)
    }

    fn present_error(&mut self, error: &ForecastError) -> io::Result<()> {
        self.emit(&json!({
            "error": { "kind": error.kind(), "message": error.to_string() }
        }))
    }

    fn present_report(&mut self, report: &PipelineReport) -> io::Result<()> {
        self.emit(report)
    }
}
