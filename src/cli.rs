//! Command-line arguments and the interactive session commands.

use crate::config::{default_anchor, FORECAST};
use crate::error::{ParameterError, Result};
use crate::pipeline::PipelineParams;
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Single-column CSV of monthly observations (no header). Falls back to
    /// the embedded reference dataset when the default file is missing.
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Date of the first observation (YYYY-MM-DD); rolled to its month-end
    #[arg(long, default_value_t = default_anchor())]
    pub anchor: NaiveDate,

    /// Months to forecast (1-48)
    #[arg(long, default_value_t = FORECAST.horizon.default_months)]
    pub horizon: usize,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Read commands from stdin and re-run on demand
    #[arg(long, default_value_t = false)]
    pub interactive: bool,
}

impl Cli {
    pub fn params(&self) -> PipelineParams {
        PipelineParams::new(self.anchor, self.horizon)
    }
}

/// One line of the interactive session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run with the current settings, optionally overriding them first.
    Run {
        anchor: Option<NaiveDate>,
        horizon: Option<usize>,
    },
    Anchor(NaiveDate),
    Horizon(usize),
    Show,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  run [ANCHOR] [HORIZON]  run the forecast (ANCHOR as YYYY-MM-DD, HORIZON in months)
  anchor DATE             set the anchor date
  horizon N               set the forecast horizon
  show                    print the current settings
  help                    print this message
  quit                    leave the session";

fn parse_date(token: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(token, "%Y-%m-%d").map_err(|_| {
        ParameterError::Invalid(format!("invalid date {:?}, expected YYYY-MM-DD", token)).into()
    })
}

fn parse_horizon(token: &str) -> Result<usize> {
    token.parse().map_err(|_| {
        ParameterError::Invalid(format!("invalid horizon {:?}, expected a whole number", token))
            .into()
    })
}

impl Command {
    /// Parse a session line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Option<Result<Command>> {
        let mut tokens = line.split_whitespace();
        let verb = tokens.next()?;
        let args: Vec<&str> = tokens.collect();

        let command = match (verb.to_ascii_lowercase().as_str(), args.as_slice()) {
            ("run", []) => Ok(Command::Run {
                anchor: None,
                horizon: None,
            }),
            ("run", [single]) => {
                // A lone argument is a date if it looks like one.
                if single.contains('-') {
                    parse_date(single).map(|d| Command::Run {
                        anchor: Some(d),
                        horizon: None,
                    })
                } else {
                    parse_horizon(single).map(|h| Command::Run {
                        anchor: None,
                        horizon: Some(h),
                    })
                }
            }
            ("run", [date, horizon]) => parse_date(date).and_then(|d| {
                parse_horizon(horizon).map(|h| Command::Run {
                    anchor: Some(d),
                    horizon: Some(h),
                })
            }),
            ("anchor", [date]) => parse_date(date).map(Command::Anchor),
            ("horizon", [n]) => parse_horizon(n).map(Command::Horizon),
            ("show", []) => Ok(Command::Show),
            ("help", []) | ("?", []) => Ok(Command::Help),
            ("quit", []) | ("exit", []) | ("q", []) => Ok(Command::Quit),
            _ => Err(ParameterError::Invalid(format!(
                "unrecognised command {:?} (try `help`)",
                line.trim()
            ))
            .into()),
        };
        Some(command)
    }
}

/// Settings carried between runs of an interactive session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub params: PipelineParams,
}

impl Session {
    pub fn new(params: PipelineParams) -> Self {
        Self { params }
    }

    /// Apply a command's settings; returns the params to run with, if any.
    ///
    /// Out-of-range values are stored as given; the pipeline reports them
    /// when it runs.
    pub fn apply(&mut self, command: &Command) -> Option<PipelineParams> {
        match command {
            Command::Run { anchor, horizon } => {
                if let Some(anchor) = anchor {
                    self.params.anchor = *anchor;
                }
                if let Some(horizon) = horizon {
                    self.params.horizon = *horizon;
                }
                Some(self.params)
            }
            Command::Anchor(anchor) => {
                self.params.anchor = *anchor;
                None
            }
            Command::Horizon(horizon) => {
                self.params.horizon = *horizon;
                None
            }
            Command::Show | Command::Help | Command::Quit => None,
        }
    }

    pub fn describe(&self) -> String {
        format!(
            "anchor {}, horizon {} months",
            self.params.anchor, self.params.horizon
        )
    }
}
