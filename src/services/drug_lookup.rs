use super::{DrugLookupService, LookupRecord};
use crate::config::LookupServiceConfig;
use crate::error::{PKError, PKResult};
use log::debug;
use reqwest::blocking::Client;
use reqwest::Url;
use serde_json::Value;
use std::time::Duration;

/// Drug-information REST lookup (`GET {base_url}/drugs?name=...`).
pub struct HttpDrugLookup {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpDrugLookup {
    pub fn new(config: &LookupServiceConfig) -> PKResult<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            PKError::InvalidConfig("drug lookup requires an API key".to_string())
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PKError::InvalidConfig(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

impl DrugLookupService for HttpDrugLookup {
    fn lookup(&self, drug_name: &str) -> PKResult<LookupRecord> {
        let url = Url::parse_with_params(
            &format!("{}/drugs", self.base_url),
            &[("name", drug_name.to_lowercase())],
        )
        .map_err(|e| PKError::LookupUnavailable(format!("bad lookup URL: {}", e)))?;

        let body: Value = self
            .client
            .get(url)
            .bearer_auth(&self.api_key)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.json())
            .map_err(|e| PKError::LookupUnavailable(format!("{}: {}", drug_name, e)))?;

        debug!("Lookup response for '{}': {}", drug_name, body);
        Ok(parse_lookup_body(&body))
    }
}

fn parse_lookup_body(body: &Value) -> LookupRecord {
    let number = |key: &str| body.get(key).and_then(Value::as_f64);

    LookupRecord {
        volume_of_distribution: number("volume_of_distribution"),
        absorption_rate_constant: number("absorption_rate_constant"),
        elimination_rate_constant: number("elimination_rate_constant"),
    }
}
