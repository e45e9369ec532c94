use clap::{Parser, ValueEnum};
use snip_telemetry::LogFormat;
use std::net::SocketAddr;

pub const LISTEN_ADDR_ENV: &str = "SNIP_LISTEN_ADDR";
pub const PUBLIC_BASE_URL_ENV: &str = "SNIP_PUBLIC_BASE_URL";
pub const DEFAULT_VALIDITY_ENV: &str = "SNIP_DEFAULT_VALIDITY_MINUTES";
pub const MAX_GENERATE_ATTEMPTS_ENV: &str = "SNIP_MAX_GENERATE_ATTEMPTS";
pub const LOG_FORMAT_ENV: &str = "SNIP_LOG_FORMAT";
pub const LOG_ENDPOINT_ENV: &str = "SNIP_LOG_ENDPOINT";
pub const LOG_TOKEN_ENV: &str = "SNIP_LOG_TOKEN";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3001";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    #[value(name = "text")]
    Text,
    #[value(name = "json")]
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Text => LogFormat::Text,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "snip", about = "In-memory URL shortener")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Prefix for generated short links. Defaults to `http://<listen-addr>`.
    #[arg(long, env = PUBLIC_BASE_URL_ENV)]
    pub public_base_url: Option<String>,

    /// Minutes a link stays valid when the request does not say.
    #[arg(
        long,
        env = DEFAULT_VALIDITY_ENV,
        default_value_t = snip_core::DEFAULT_VALIDITY_MINUTES,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub default_validity_minutes: u32,

    #[arg(
        long,
        env = MAX_GENERATE_ATTEMPTS_ENV,
        default_value_t = 5,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub max_generate_attempts: u32,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormatArg::Text)]
    pub log_format: LogFormatArg,

    /// Remote collector that receives every log event as JSON.
    #[arg(long, env = LOG_ENDPOINT_ENV)]
    pub log_endpoint: Option<String>,

    /// Bearer token sent to the remote collector.
    #[arg(long, env = LOG_TOKEN_ENV, requires = "log_endpoint")]
    pub log_token: Option<String>,
}

impl CLI {
    pub fn public_base_url(&self) -> String {
        self.public_base_url
            .clone()
            .unwrap_or_else(|| format!("http://{}", self.listen_addr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = CLI::try_parse_from(["snip"]).unwrap();
        assert_eq!(cli.listen_addr.to_string(), DEFAULT_LISTEN_ADDR);
        assert_eq!(cli.default_validity_minutes, 30);
        assert_eq!(cli.max_generate_attempts, 5);
        assert_eq!(cli.log_format, LogFormatArg::Text);
        assert_eq!(cli.public_base_url(), "http://127.0.0.1:3001");
    }

    #[test]
    fn rejects_zero_validity() {
        assert!(CLI::try_parse_from(["snip", "--default-validity-minutes", "0"]).is_err());
    }

    #[test]
    fn explicit_base_url_wins() {
        let cli =
            CLI::try_parse_from(["snip", "--public-base-url", "https://sn.ip"]).unwrap();
        assert_eq!(cli.public_base_url(), "https://sn.ip");
    }
}
