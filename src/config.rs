use crate::dosing::normalize_drug_name;
use crate::error::{PKError, PKResult};
use crate::models::ParameterSet;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

pub const PARSER_API_KEY_ENV: &str = "XAI_API_KEY";
pub const LOOKUP_API_KEY_ENV: &str = "DRUGBANK_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub simulation: SimulationConfig,
    pub parser_service: ParserServiceConfig,
    pub lookup_service: LookupServiceConfig,
    /// Extra or overriding entries for the built-in parameter table.
    pub drugs: HashMap<String, ParameterSet>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub horizon_hours: f64,
    pub samples: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            horizon_hours: 24.0,
            samples: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserServiceConfig {
    pub enabled: bool,
    pub base_url: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for ParserServiceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://api.x.ai/v1".to_string(),
            model: "grok-beta".to_string(),
            temperature: 0.1,
            max_tokens: 100,
            timeout_secs: 30,
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupServiceConfig {
    pub enabled: bool,
    pub base_url: String,
    pub timeout_secs: u64,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for LookupServiceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://api.drugbank.com/v1".to_string(),
            timeout_secs: 10,
            api_key: None,
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> PKResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> PKResult<Self> {
        let mut config: Config = serde_json::from_str(content)?;

        let mut drugs = HashMap::with_capacity(config.drugs.len());
        for (name, params) in config.drugs {
            let key = normalize_drug_name(&name);
            if drugs.insert(key.clone(), params).is_some() {
                return Err(PKError::InvalidConfig(format!(
                    "Drug table has more than one entry for '{}'",
                    key
                )));
            }
        }
        config.drugs = drugs;

        config.validate()?;
        Ok(config)
    }

    /// Fill missing API keys from the environment. Called once at startup;
    /// collaborators only ever see the resulting value.
    pub fn with_env_overrides(self) -> Self {
        self.with_keys(
            std::env::var(PARSER_API_KEY_ENV).ok(),
            std::env::var(LOOKUP_API_KEY_ENV).ok(),
        )
    }

    fn with_keys(mut self, parser_key: Option<String>, lookup_key: Option<String>) -> Self {
        let non_empty = |key: Option<String>| key.filter(|k| !k.trim().is_empty());

        if self.parser_service.api_key.is_none() {
            self.parser_service.api_key = non_empty(parser_key);
        }
        if self.lookup_service.api_key.is_none() {
            self.lookup_service.api_key = non_empty(lookup_key);
        }
        self
    }

    /// Disable both remote collaborators.
    pub fn offline(mut self) -> Self {
        self.parser_service.enabled = false;
        self.lookup_service.enabled = false;
        self
    }

    pub fn parser_service_active(&self) -> bool {
        self.parser_service.enabled && self.parser_service.api_key.is_some()
    }

    pub fn lookup_service_active(&self) -> bool {
        self.lookup_service.enabled && self.lookup_service.api_key.is_some()
    }

    pub fn validate(&self) -> PKResult<()> {
        self.simulation.validate()?;

        if self.parser_service.timeout_secs == 0 || self.lookup_service.timeout_secs == 0 {
            return Err(PKError::InvalidConfig(
                "Service timeouts must be at least one second".to_string(),
            ));
        }

        if let Some(name) = self.drugs.keys().find(|name| name.is_empty()) {
            return Err(PKError::InvalidConfig(format!(
                "Drug table entry has an empty name: '{}'",
                name
            )));
        }

        Ok(())
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> PKResult<()> {
        if !(self.horizon_hours.is_finite() && self.horizon_hours > 0.0) {
            return Err(PKError::InvalidConfig(
                "Time horizon must be a positive number of hours".to_string(),
            ));
        }

        if self.samples < 2 {
            return Err(PKError::InvalidConfig(
                "At least two time samples must be simulated".to_string(),
            ));
        }

        Ok(())
    }
}
