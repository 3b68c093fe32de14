use anyhow::{Context, Result};
use clap::Parser;
use milk_forecast::cli::{Cli, Command, OutputFormat, Session, HELP};
use milk_forecast::config::FORECAST;
use milk_forecast::data::Dataset;
use milk_forecast::pipeline::ForecastPipeline;
use milk_forecast::presenter::{JsonPresenter, Presenter, TerminalPresenter};
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Explicit `--data` must load; the default path falls back to the embedded copy.
fn load_dataset(cli: &Cli) -> milk_forecast::Result<Dataset> {
    match &cli.data {
        Some(path) => Dataset::from_path(path),
        None => {
            let default = Path::new(FORECAST.dataset_path);
            if default.exists() {
                Dataset::from_path(default)
            } else {
                log::info!(
                    "{} not found, using the embedded reference dataset",
                    default.display()
                );
                Dataset::reference()
            }
        }
    }
}

fn presenter(format: OutputFormat) -> Box<dyn Presenter> {
    match format {
        OutputFormat::Text => Box::new(TerminalPresenter::stdout()),
        OutputFormat::Json => Box::new(JsonPresenter::stdout()),
    }
}

fn interactive(pipeline: &ForecastPipeline, cli: &Cli, presenter: &mut dyn Presenter) -> Result<()> {
    let mut session = Session::new(cli.params());
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("{}", HELP);
    loop {
        print!("> ");
        stdout.flush().context("flushing prompt")?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).context("reading command")? == 0 {
            break;
        }

        let command = match Command::parse(&line) {
            None => continue,
            Some(Ok(command)) => command,
            Some(Err(err)) => {
                presenter.present_error(&err)?;
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => println!("{}", HELP),
            Command::Show => println!("{}", session.describe()),
            other => {
                if let Some(params) = session.apply(&other) {
                    log::debug!("running with {}", session.describe());
                    presenter.present(&pipeline.run(&params))?;
                } else {
                    println!("{}", session.describe());
                }
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    log::debug!("parsed arguments: {:?}", cli);

    let mut presenter = presenter(cli.format);

    let dataset = match load_dataset(&cli) {
        Ok(dataset) => dataset,
        Err(err) => {
            presenter.present_error(&err)?;
            std::process::exit(1);
        }
    };
    log::info!("{} observations from {}", dataset.len(), dataset.source());

    let pipeline = ForecastPipeline::new(dataset);

    if cli.interactive {
        return interactive(&pipeline, &cli, presenter.as_mut());
    }

    let outcome = pipeline.run(&cli.params());
    presenter.present(&outcome)?;
    if outcome.is_err() {
        std::process::exit(1);
    }
    Ok(())
}
