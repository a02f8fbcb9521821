use std::str::FromStr;

use clap::ValueEnum;
use eyre::{eyre, Context, Result};
use serde::*;
use tracing::level_filters::LevelFilter;
use tracing_log::LogTracer;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_level_filter(&self) -> LevelFilter {
        match self {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

impl FromStr for LogLevel {
    type Err = eyre::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_ref() {
            "off" => Ok(LogLevel::Off),
            "error" => Ok(LogLevel::Error),
            "warn" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(eyre!("Invalid log level: {}", s)),
        }
    }
}

fn build_env_filter(log_level: LogLevel) -> Result<EnvFilter> {
    let filter = EnvFilter::from_default_env()
        .add_directive(log_level.as_level_filter().into())
        .add_directive("h2=info".parse()?)
        .add_directive("hyper_util=info".parse()?)
        .add_directive("rustls::client::hs=info".parse()?)
        .add_directive("rustls::client::tls13=info".parse()?)
        .add_directive("reqwest::connect=info".parse()?)
        .add_directive("mio=info".parse()?)
        .add_directive("want=info".parse()?);
    Ok(filter)
}

pub fn setup_logs(log_level: LogLevel) -> Result<()> {
    color_eyre::install()?;
    LogTracer::init().context("Cannot setup_logs")?;
    let filter = build_env_filter(log_level)?;

    let subscriber = fmt().with_target(false).with_env_filter(filter).finish();

    tracing::subscriber::set_global_default(subscriber).context("Cannot setup_logs")?;
    log_panics::init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_from_str() {
        assert_eq!("warn".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("TRACE".parse::<LogLevel>().unwrap(), LogLevel::Trace);
        assert!("noisy".parse::<LogLevel>().is_err());
    }
}
