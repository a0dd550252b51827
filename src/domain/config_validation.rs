//! Strategy configuration validation and parameter building.
//!
//! Sections: `[oscillator]`, `[classifier]`, `[market_maker]`. Absent keys
//! take their defaults; present keys must parse.

use crate::domain::error::TickstratError;
use crate::domain::market_maker::{FairValueModel, MarketMakerParams};
use crate::domain::oscillator::OscillatorParams;
use crate::ports::config_port::ConfigPort;

pub const OSCILLATOR: &str = "oscillator";
pub const CLASSIFIER: &str = "classifier";
pub const MARKET_MAKER: &str = "market_maker";

/// Validate every strategy section present in `config`.
pub fn validate_config(config: &dyn ConfigPort) -> Result<Vec<&'static str>, TickstratError> {
    let mut validated = Vec::new();
    if config.has_section(OSCILLATOR) {
        oscillator_params(config)?;
        validated.push(OSCILLATOR);
    }
    if config.has_section(CLASSIFIER) {
        classifier_model_path(config)?;
        validated.push(CLASSIFIER);
    }
    if config.has_section(MARKET_MAKER) {
        market_maker_params(config)?;
        validated.push(MARKET_MAKER);
    }
    Ok(validated)
}

pub fn oscillator_params(config: &dyn ConfigPort) -> Result<OscillatorParams, TickstratError> {
    let defaults = OscillatorParams::default();
    check_int(config, OSCILLATOR, "period")?;
    check_number(config, OSCILLATOR, "overbought_limit")?;
    check_number(config, OSCILLATOR, "oversold_limit")?;

    let period = config.get_int(OSCILLATOR, "period", defaults.period as i64);
    if period < 1 {
        return Err(invalid(OSCILLATOR, "period", "period must be at least 1"));
    }
    let period = usize::try_from(period)
        .map_err(|_| invalid(OSCILLATOR, "period", "period is too large"))?;
    let params = OscillatorParams {
        period,
        overbought_limit: config.get_double(OSCILLATOR, "overbought_limit", defaults.overbought_limit),
        oversold_limit: config.get_double(OSCILLATOR, "oversold_limit", defaults.oversold_limit),
    };
    params.validate().map_err(|e| as_config_error(OSCILLATOR, e))?;
    Ok(params)
}

pub fn classifier_model_path(config: &dyn ConfigPort) -> Result<String, TickstratError> {
    config
        .get_string(CLASSIFIER, "model_path")
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| TickstratError::ConfigMissing {
            section: CLASSIFIER.into(),
            key: "model_path".into(),
        })
}

pub fn market_maker_params(config: &dyn ConfigPort) -> Result<MarketMakerParams, TickstratError> {
    let defaults = MarketMakerParams::default();
    for key in ["spread", "factor", "slope", "intercept"] {
        check_number(config, MARKET_MAKER, key)?;
    }
    let string_or = |key: &str, default: &str| {
        config
            .get_string(MARKET_MAKER, key)
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| default.to_string())
    };

    let params = MarketMakerParams {
        spread: config.get_double(MARKET_MAKER, "spread", defaults.spread),
        model: FairValueModel {
            factor: config.get_double(MARKET_MAKER, "factor", defaults.model.factor),
            slope: config.get_double(MARKET_MAKER, "slope", defaults.model.slope),
            intercept: config.get_double(MARKET_MAKER, "intercept", defaults.model.intercept),
        },
        leg_a: string_or("first_leg", &defaults.leg_a),
        leg_b: string_or("second_leg", &defaults.leg_b),
        synthetic: string_or("synthetic", &defaults.synthetic),
    };
    params.validate().map_err(|e| as_config_error(MARKET_MAKER, e))?;
    Ok(params)
}

fn check_number(config: &dyn ConfigPort, section: &str, key: &str) -> Result<(), TickstratError> {
    match config.get_string(section, key) {
        Some(raw) if raw.trim().parse::<f64>().is_err() => {
            Err(invalid(section, key, &format!("'{}' is not a number", raw)))
        }
        _ => Ok(()),
    }
}

fn check_int(config: &dyn ConfigPort, section: &str, key: &str) -> Result<(), TickstratError> {
    match config.get_string(section, key) {
        Some(raw) if raw.trim().parse::<i64>().is_err() => {
            Err(invalid(section, key, &format!("'{}' is not an integer", raw)))
        }
        _ => Ok(()),
    }
}

fn invalid(section: &str, key: &str, reason: &str) -> TickstratError {
    TickstratError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn as_config_error(section: &str, err: TickstratError) -> TickstratError {
    match err {
        TickstratError::InvalidParameter { name, reason, .. } => invalid(section, name, &reason),
        other => other,
    }
}
