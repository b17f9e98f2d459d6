//! Environment overrides for run configuration.
//!
//! A `.env` file in the working directory is loaded first (if present), then
//! the following variables override the defaults:
//!
//! - `UBENCH_MAX_ITERATIONS`
//! - `UBENCH_STABILITY_SPAN`
//! - `UBENCH_STABILITY_BOUND_PCT`
//! - `UBENCH_TIME_LIMIT_MS`
//! - `UBENCH_SCALE_LIMIT` (sweeps only)

use std::str::FromStr;
use std::time::Duration;

use crate::domain::{PressConfig, SweepConfig};
use crate::error::BenchError;

const VAR_MAX_ITERATIONS: &str = "UBENCH_MAX_ITERATIONS";
const VAR_STABILITY_SPAN: &str = "UBENCH_STABILITY_SPAN";
const VAR_STABILITY_BOUND: &str = "UBENCH_STABILITY_BOUND_PCT";
const VAR_TIME_LIMIT_MS: &str = "UBENCH_TIME_LIMIT_MS";
const VAR_SCALE_LIMIT: &str = "UBENCH_SCALE_LIMIT";

impl PressConfig {
    /// Defaults, overridden from the environment.
    pub fn from_env() -> Result<Self, BenchError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults, overridden from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BenchError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(v) = parse_var(&lookup, VAR_MAX_ITERATIONS)? {
            config.max_iterations = v;
        }
        if let Some(v) = parse_var(&lookup, VAR_STABILITY_SPAN)? {
            config.stability_span = v;
        }
        if let Some(v) = parse_var(&lookup, VAR_STABILITY_BOUND)? {
            config.stability_bound_percent = v;
        }
        if let Some(ms) = parse_var::<u64, _>(&lookup, VAR_TIME_LIMIT_MS)? {
            config.time_limit = (ms > 0).then(|| Duration::from_millis(ms));
        }
        config.validate()?;
        Ok(config)
    }
}

impl SweepConfig {
    /// Defaults, overridden from the environment.
    pub fn from_env() -> Result<Self, BenchError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, BenchError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(v) = parse_var(&lookup, VAR_MAX_ITERATIONS)? {
            config.max_iterations = v;
        }
        if let Some(ms) = parse_var(&lookup, VAR_TIME_LIMIT_MS)? {
            config.time_limit = Duration::from_millis(ms);
        }
        if let Some(v) = parse_var(&lookup, VAR_SCALE_LIMIT)? {
            config.scale_limit = v;
        }
        config.validate()?;
        Ok(config)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>, BenchError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<T>()
        .map(Some)
        .map_err(|e| BenchError::InvalidConfig(format!("{key}={raw:?}: {e}")))
}
