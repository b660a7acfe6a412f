use super::CommandParsingService;
use crate::config::ParserServiceConfig;
use crate::error::{PKError, PKResult};
use log::debug;
use reqwest::blocking::Client;
use serde_json::{json, Value};
use std::time::Duration;

const SYSTEM_PROMPT: &str = "You are a highly precise assistant designed to parse drug and dosage \
commands. When given an input like 'show me [drug] at [dose] mg', extract the drug name and dosage, \
and return ONLY a JSON object with the fields 'drug', 'dosage', and 'unit'. Do not include any \
additional text, explanations, or formatting. Example output for 'show me metformin at 500 mg': \
{\"drug\": \"metformin\", \"dosage\": 500, \"unit\": \"mg\"}.";

/// OpenAI-compatible chat completion endpoint used as the command parser.
pub struct ChatCompletionParser {
    client: Client,
    config: ParserServiceConfig,
    api_key: String,
}

impl ChatCompletionParser {
    pub fn new(config: ParserServiceConfig) -> PKResult<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            PKError::InvalidConfig("parser service requires an API key".to_string())
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PKError::InvalidConfig(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    fn request_body(&self, command: &str) -> Value {
        json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": command }
            ],
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
        })
    }
}

impl CommandParsingService for ChatCompletionParser {
    fn complete(&self, command: &str) -> PKResult<String> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(command))
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| PKError::ServiceUnavailable(format!("request failed: {}", e)))?;

        let body: Value = response
            .json()
            .map_err(|e| PKError::ServiceUnavailable(format!("unreadable response: {}", e)))?;

        let content = message_content(&body)?;
        debug!("Raw parser response: {}", content);
        Ok(content)
    }
}

fn message_content(body: &Value) -> PKResult<String> {
    body.pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            PKError::ServiceUnavailable("response has no message content".to_string())
        })
}
