use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub business_rules: BusinessRules,
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BusinessRules {
    /// Hours until estimated pickup for normal-priority orders
    #[serde(default = "default_pickup_hours_normal")]
    pub pickup_hours_normal: i64,
    /// Hours until estimated pickup for express orders
    #[serde(default = "default_pickup_hours_express")]
    pub pickup_hours_express: i64,
    /// Selection policy applied when the caller names none
    #[serde(default = "default_policy")]
    pub default_policy: String,
    #[serde(default = "default_carrier_timeout_ms")]
    pub carrier_timeout_ms: u64,
    #[serde(default = "default_channel_timeout_ms")]
    pub channel_timeout_ms: u64,
    #[serde(default = "default_warehouse_sender")]
    pub warehouse_sender: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotificationsConfig {
    #[serde(default = "default_webhook_url")]
    pub webhook_url: String,
    #[serde(default = "default_sms_number")]
    pub sms_number: String,
}

fn default_pickup_hours_normal() -> i64 {
    48
}
fn default_pickup_hours_express() -> i64 {
    24
}
fn default_policy() -> String {
    "standard".to_string()
}
fn default_carrier_timeout_ms() -> u64 {
    2_000
}
fn default_channel_timeout_ms() -> u64 {
    1_000
}
fn default_warehouse_sender() -> String {
    "MercadoBarrio Warehouse".to_string()
}
fn default_webhook_url() -> String {
    "https://api.external-system.com/webhook".to_string()
}
fn default_sms_number() -> String {
    "+1234567890".to_string()
}

impl Default for BusinessRules {
    fn default() -> Self {
        Self {
            pickup_hours_normal: default_pickup_hours_normal(),
            pickup_hours_express: default_pickup_hours_express(),
            default_policy: default_policy(),
            carrier_timeout_ms: default_carrier_timeout_ms(),
            channel_timeout_ms: default_channel_timeout_ms(),
            warehouse_sender: default_warehouse_sender(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            webhook_url: default_webhook_url(),
            sms_number: default_sms_number(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            business_rules: BusinessRules::default(),
            notifications: NotificationsConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `BARRIO__BUSINESS_RULES__DEFAULT_POLICY=eco`
            .add_source(config::Environment::with_prefix("BARRIO").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable_without_files() {
        let config = Config::default();
        assert_eq!(config.business_rules.pickup_hours_express, 24);
        assert_eq!(config.business_rules.pickup_hours_normal, 48);
        assert_eq!(config.business_rules.default_policy, "standard");
    }
}
