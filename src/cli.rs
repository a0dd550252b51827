//! CLI definition and dispatch.

use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::naive_bayes_adapter::NaiveBayesAdapter;
use crate::domain::classifier_strategy::ClassifierStrategy;
use crate::domain::config_validation::{
    classifier_model_path, market_maker_params, oscillator_params, validate_config,
};
use crate::domain::error::TickstratError;
use crate::domain::event::Event;
use crate::domain::market_maker::MarketMakerStrategy;
use crate::domain::oscillator::OscillatorStrategy;
use crate::domain::price_bar::merge_by_time;
use crate::domain::strategy::Strategy;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(name = "tickstrat", about = "Event-driven trading strategy signals")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate the strategy sections of a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Push price history through a strategy and print the orders it emits
    Signals {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long, value_enum)]
        strategy: StrategyKind,
        /// Price source as INSTRUMENT=PATH; repeat for several instruments
        #[arg(short, long = "data", required = true)]
        data: Vec<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrategyKind {
    Oscillator,
    Classifier,
    MarketMaker,
}

/// Counts reported at the end of a `signals` run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SignalSummary {
    pub events: usize,
    pub orders: usize,
    pub cancellations: usize,
    /// Sum of signed order quantities: the position change requested.
    pub net_quantity: i64,
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Validate { config } => run_validate(&config),
        Command::Signals {
            config,
            strategy,
            data,
        } => run_signals(config.as_ref(), strategy, &data),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, TickstratError> {
    FileConfigAdapter::from_file(path).map_err(|e| TickstratError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn run_validate(config_path: &PathBuf) -> Result<(), TickstratError> {
    info!(path = %config_path.display(), "validating config");
    let adapter = load_config(config_path)?;
    let sections = validate_config(&adapter)?;
    if sections.is_empty() {
        println!("no strategy sections found");
    } else {
        println!("valid: {}", sections.join(", "));
    }
    Ok(())
}

fn run_signals(
    config_path: Option<&PathBuf>,
    kind: StrategyKind,
    sources: &[String],
) -> Result<(), TickstratError> {
    let adapter = match config_path {
        Some(path) => {
            info!(path = %path.display(), "loading config");
            load_config(path)?
        }
        None => FileConfigAdapter::from_string("").map_err(|reason| TickstratError::ConfigParse {
            file: "<empty>".into(),
            reason,
        })?,
    };

    let mut strategy = build_strategy(kind, &adapter)?;
    info!(strategy = strategy.name(), id = %strategy.id(), "strategy ready");

    let data = sources.iter().try_fold(CsvAdapter::new(), |data, spec| {
        let (instrument, path) = CsvAdapter::parse_source(spec)?;
        Ok::<_, TickstratError>(data.with_source(&instrument, path))
    })?;
    let events = load_events(&data)?;
    info!(events = events.len(), "replaying events");

    let stdout = io::stdout();
    let summary = emit_signals(strategy.as_mut(), &events, &mut stdout.lock())?;
    info!(
        events = summary.events,
        orders = summary.orders,
        cancellations = summary.cancellations,
        net_quantity = summary.net_quantity,
        "done"
    );
    Ok(())
}

pub fn build_strategy(
    kind: StrategyKind,
    config: &dyn ConfigPort,
) -> Result<Box<dyn Strategy>, TickstratError> {
    let strategy: Box<dyn Strategy> = match kind {
        StrategyKind::Oscillator => Box::new(OscillatorStrategy::new(oscillator_params(config)?)?),
        StrategyKind::Classifier => {
            let model = NaiveBayesAdapter::from_file(classifier_model_path(config)?)?;
            Box::new(ClassifierStrategy::new(Arc::new(model)))
        }
        StrategyKind::MarketMaker => {
            Box::new(MarketMakerStrategy::new(market_maker_params(config)?)?)
        }
    };
    Ok(strategy)
}

/// Load every configured instrument and merge the bars into one event stream.
pub fn load_events(data: &dyn DataPort) -> Result<Vec<Event>, TickstratError> {
    let series = data
        .instruments()
        .into_iter()
        .map(|instrument| {
            let bars = data.fetch_bars(&instrument)?;
            info!(instrument = %instrument, bars = bars.len(), "loaded price history");
            Ok((instrument, bars))
        })
        .collect::<Result<Vec<_>, TickstratError>>()?;
    Ok(merge_by_time(&series))
}

/// Push `events` through `strategy`, writing one line per cancellation and
/// order. Cancellations raised by a push are written before its orders.
pub fn emit_signals<W: Write>(
    strategy: &mut dyn Strategy,
    events: &[Event],
    out: &mut W,
) -> Result<SignalSummary, TickstratError> {
    let mut summary = SignalSummary::default();
    for (seq, event) in events.iter().enumerate() {
        let orders = strategy.push(event);
        for cancel in strategy.take_cancellations() {
            writeln!(out, "{}\t{}\tCANCEL {}", seq, event.instrument(), cancel.order_id)?;
            summary.cancellations += 1;
        }
        for order in &orders {
            writeln!(out, "{}\t{}\t{}", seq, event.instrument(), order)?;
            summary.net_quantity += order.quantity();
        }
        summary.orders += orders.len();
        summary.events += 1;
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_signals_command() {
        let cli = Cli::try_parse_from([
            "tickstrat",
            "signals",
            "--strategy",
            "market-maker",
            "--data",
            "PETR3=a.csv",
            "--data",
            "USDBRL=b.csv",
        ])
        .unwrap();
        match cli.command {
            Command::Signals { strategy, data, config } => {
                assert_eq!(strategy, StrategyKind::MarketMaker);
                assert_eq!(data.len(), 2);
                assert!(config.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn signals_requires_data() {
        assert!(Cli::try_parse_from(["tickstrat", "signals", "--strategy", "oscillator"]).is_err());
    }

    #[test]
    fn classifier_without_model_path_fails() {
        let adapter = FileConfigAdapter::from_string("[classifier]\n").unwrap();
        assert!(matches!(
            build_strategy(StrategyKind::Classifier, &adapter),
            Err(TickstratError::ConfigMissing { .. })
        ));
    }

    #[test]
    fn classifier_with_missing_model_fails_at_construction() {
        let adapter =
            FileConfigAdapter::from_string("[classifier]\nmodel_path = /nonexistent/nb.json\n")
                .unwrap();
        assert!(matches!(
            build_strategy(StrategyKind::Classifier, &adapter),
            Err(TickstratError::ModelLoad { .. })
        ));
    }
}
