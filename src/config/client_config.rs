use crate::domain::enums::Host;
use crate::utils::error::{Result, RsWikiError};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

pub const DEFAULT_PROJECT_NAME: &str = "RS Wiki API Rust Client";
pub const DEFAULT_CONTACT_INFO: &str = "Default";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

static ENV_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub weird_gloop: String,
    pub realtime_prices: String,
    pub mediawiki: String,
    pub mediawiki_osrs: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            weird_gloop: Host::WeirdGloop.default_base_url().to_string(),
            realtime_prices: Host::RealtimePrices.default_base_url().to_string(),
            mediawiki: Host::MediaWiki.default_base_url().to_string(),
            mediawiki_osrs: Host::MediaWikiOsrs.default_base_url().to_string(),
        }
    }
}

impl HostConfig {
    /// Points every host at the same base, mostly for tests against a mock server.
    pub fn all(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            weird_gloop: base.clone(),
            realtime_prices: base.clone(),
            mediawiki: base.clone(),
            mediawiki_osrs: base,
        }
    }

    pub fn base_url(&self, host: Host) -> &str {
        let base = match host {
            Host::WeirdGloop => &self.weird_gloop,
            Host::RealtimePrices => &self.realtime_prices,
            Host::MediaWiki => &self.mediawiki,
            Host::MediaWikiOsrs => &self.mediawiki_osrs,
        };
        base.trim_end_matches('/')
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub project_name: Option<String>,
    pub contact_info: Option<String>,
    pub timeout_seconds: u64,
    pub hosts: HostConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            project_name: None,
            contact_info: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            hosts: HostConfig::default(),
        }
    }
}

impl ClientConfig {
    pub fn new(project_name: impl Into<String>, contact_info: impl Into<String>) -> Self {
        Self {
            project_name: Some(project_name.into()),
            contact_info: Some(contact_info.into()),
            ..Self::default()
        }
    }

    pub fn with_hosts(mut self, hosts: HostConfig) -> Self {
        self.hosts = hosts;
        self
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Parses TOML after replacing `${VAR}` placeholders from the environment.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);
        Ok(toml::from_str(&processed)?)
    }

    /// Defaults overridden by `RSWIKI_PROJECT_NAME`, `RSWIKI_CONTACT_INFO`
    /// and `RSWIKI_TIMEOUT_SECONDS`.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(name) = std::env::var("RSWIKI_PROJECT_NAME") {
            config.project_name = Some(name);
        }
        if let Ok(contact) = std::env::var("RSWIKI_CONTACT_INFO") {
            config.contact_info = Some(contact);
        }
        if let Ok(timeout) = std::env::var("RSWIKI_TIMEOUT_SECONDS") {
            config.timeout_seconds =
                timeout
                    .trim()
                    .parse()
                    .map_err(|_| RsWikiError::InvalidConfigValue {
                        field: "RSWIKI_TIMEOUT_SECONDS".to_string(),
                        value: timeout.clone(),
                        reason: "Value must be a whole number of seconds".to_string(),
                    })?;
        }
        Ok(config)
    }

    fn substitute_env_vars(content: &str) -> String {
        ENV_PLACEHOLDER
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// `"<project> - <contact>"`, warning for each part that falls back to its default.
    pub fn user_agent(&self) -> String {
        let project = match self.project_name.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(name) => name,
            None => {
                tracing::warn!("Project name should be set to identify yourself with the API");
                DEFAULT_PROJECT_NAME
            }
        };
        let contact = match self.contact_info.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(contact) => contact,
            None => {
                tracing::warn!("Contact info should be set to identify yourself with the API");
                DEFAULT_CONTACT_INFO
            }
        };
        format!("{} - {}", project, contact)
    }
}

impl Validate for ClientConfig {
    fn validate(&self) -> Result<()> {
        if let Some(name) = &self.project_name {
            validate_non_empty_string("project_name", name)?;
        }
        if let Some(contact) = &self.contact_info {
            validate_non_empty_string("contact_info", contact)?;
        }
        validate_positive_number("timeout_seconds", self.timeout_seconds, 1)?;

        validate_url("hosts.weird_gloop", &self.hosts.weird_gloop)?;
        validate_url("hosts.realtime_prices", &self.hosts.realtime_prices)?;
        validate_url("hosts.mediawiki", &self.hosts.mediawiki)?;
        validate_url("hosts.mediawiki_osrs", &self.hosts.mediawiki_osrs)?;
        Ok(())
    }
}
