use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_CONFIG_FILE: &str = "prometheus-fritzbox-exporter.yml";

/// Prometheus exporter for FRITZ!Box routers
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the YAML configuration file.
    #[clap(long, short, env = "FRITZBOX_EXPORTER_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Optional address for the metrics endpoint, overrides `exporter.listen_address`.
    #[clap(long, value_name = "ADDR")]
    pub listen_address: Option<String>,

    /// Optional FRITZ!Box URL, overrides `fritzbox.url`.
    #[clap(long, value_name = "URL")]
    pub url: Option<String>,

    /// Optional FRITZ!Box user, overrides `fritzbox.username`.
    #[clap(long, value_name = "USER")]
    pub username: Option<String>,

    /// Optional FRITZ!Box password, overrides `fritzbox.password`.
    #[clap(long, env = "FRITZBOX_EXPORTER_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Log at debug level unless `RUST_LOG` says otherwise.
    #[clap(long, short, action)]
    pub verbose: bool,
}

mod config_ext {
    use super::*;
    use config::{
        Map,
        Source,
        Value,
    };
    use std::collections::HashMap;

    impl Source for Args {
        fn clone_into_box(&self) -> Box<dyn Source + Send + Sync> {
            Box::new((*self).clone())
        }

        fn collect(&self) -> Result<Map<String, Value>, config::ConfigError> {
            let mut cache = HashMap::<String, Value>::new();
            if let Some(listen_address) = &self.listen_address {
                cache.insert("exporter.listen_address".to_string(), listen_address.clone().into());
            }
            if let Some(url) = &self.url {
                cache.insert("fritzbox.url".to_string(), url.clone().into());
            }
            if let Some(username) = &self.username {
                cache.insert("fritzbox.username".to_string(), username.clone().into());
            }
            if let Some(password) = &self.password {
                cache.insert("fritzbox.password".to_string(), password.clone().into());
            }
            Ok(cache)
        }
    }
}
