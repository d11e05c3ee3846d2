use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use log::debug;
use serde::Deserialize;

use crate::duration::{duration_from_str, duration_to_string};
use crate::error::{Error, Result};
use crate::tracker::PollPolicy;

pub const DEFAULT_CONFIG_PATH: &str = "/etc/policyctl/policyctl.yaml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub endpoints: Endpoints,
    pub polling: PollSettings,
}

/// Resource routes, relative to `base_path`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Endpoints {
    pub base_path: String,
    pub policies: String,
    pub sessions: String,
    pub repositories: String,
    pub restore_points: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            base_path: "/api/v6".to_string(),
            policies: "policies/virtualMachines".to_string(),
            sessions: "jobSessions".to_string(),
            repositories: "repositories".to_string(),
            restore_points: "restorePoints/virtualMachines".to_string(),
        }
    }
}

impl Endpoints {
    fn join(&self, parts: &[&str]) -> String {
        let mut path = self.base_path.trim_end_matches('/').to_string();
        for part in parts {
            path.push('/');
            path.push_str(part.trim_matches('/'));
        }
        path
    }

    pub fn policies(&self) -> String {
        self.join(&[&self.policies])
    }

    pub fn policy(&self, id: &str) -> String {
        self.join(&[&self.policies, id])
    }

    pub fn repositories(&self) -> String {
        self.join(&[&self.repositories])
    }

    pub fn session(&self, id: &str) -> String {
        self.join(&[&self.sessions, id])
    }

    pub fn restored_items(&self, session_id: &str) -> String {
        self.join(&[&self.sessions, session_id, "restoredItems"])
    }

    pub fn restore_vm(&self, restore_point_id: &str) -> String {
        self.join(&[&self.restore_points, restore_point_id, "restoreVm"])
    }
}

/// Polling knobs as written in the config file, e.g. `timeout: 30m`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PollSettings {
    pub interval: String,
    pub max_interval: String,
    pub backoff: f64,
    pub timeout: String,
    pub stall_timeout: Option<String>,
}

impl Default for PollSettings {
    fn default() -> Self {
        let policy = PollPolicy::default();
        Self {
            interval: duration_to_string(&policy.interval),
            max_interval: duration_to_string(&policy.max_interval),
            backoff: policy.backoff_multiplier,
            timeout: duration_to_string(&policy.timeout),
            stall_timeout: policy.stall_timeout.as_ref().map(duration_to_string),
        }
    }
}

impl PollSettings {
    pub fn to_policy(&self) -> Result<PollPolicy> {
        let interval = duration_from_str(&self.interval)?;
        if interval == Duration::ZERO {
            return Err(Error::Config("polling.interval must be positive".to_string()));
        }
        if !self.backoff.is_finite() || self.backoff < 1.0 {
            return Err(Error::Config(format!(
                "polling.backoff must be a finite number of at least 1.0, got {}",
                self.backoff
            )));
        }

        Ok(PollPolicy {
            interval,
            max_interval: duration_from_str(&self.max_interval)?.max(interval),
            backoff_multiplier: self.backoff,
            timeout: duration_from_str(&self.timeout)?,
            stall_timeout: self
                .stall_timeout
                .as_deref()
                .map(duration_from_str)
                .transpose()?,
        })
    }
}

impl Config {
    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: Config =
            serde_yaml::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        config.polling.to_policy()?;
        Ok(config)
    }

    /// Reads the config file; a missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(text) => Self::from_yaml(&text),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("no config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }
}
