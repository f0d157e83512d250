//! Runtime configuration loaded from environment variables.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use chrono_tz::Tz;

/// Default zone matches how the first deployments entered their
/// notification times.
const DEFAULT_TIMEZONE: &str = "America/Sao_Paulo";

#[derive(Clone, Debug)]
pub struct Config {
    /// IANA timezone used to render the current minute, and the zone
    /// `notification_time` values are interpreted in (from `NUDGE_TIMEZONE`).
    pub timezone: Tz,
    /// Data directory override (from `NUDGE_DATA_DIR`).
    pub data_dir: Option<PathBuf>,
    /// Mail gateway settings; absent means reminders are only logged.
    pub mail: Option<MailGatewayConfig>,
}

/// Where outbound reminder mail gets POSTed.
#[derive(Clone, Debug)]
pub struct MailGatewayConfig {
    /// Gateway endpoint (from `NUDGE_MAIL_URL`).
    pub url: String,
    /// Bearer token for the gateway (from `NUDGE_MAIL_TOKEN`, optional).
    pub token: Option<String>,
    /// From address on outbound mail (from `NUDGE_MAIL_FROM`).
    pub from: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let zone =
            std::env::var("NUDGE_TIMEZONE").unwrap_or_else(|_| DEFAULT_TIMEZONE.to_string());
        let timezone: Tz = zone
            .parse()
            .map_err(|_| anyhow!("unknown timezone: {zone}"))?;

        let data_dir = std::env::var("NUDGE_DATA_DIR").ok().map(PathBuf::from);

        let mail = std::env::var("NUDGE_MAIL_URL")
            .ok()
            .map(|url| MailGatewayConfig {
                url,
                token: std::env::var("NUDGE_MAIL_TOKEN").ok(),
                from: std::env::var("NUDGE_MAIL_FROM")
                    .unwrap_or_else(|_| "Task Reminders <reminders@localhost>".to_string()),
            });

        Ok(Self {
            timezone,
            data_dir,
            mail,
        })
    }
}
