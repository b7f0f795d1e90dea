//! Natural-language task intake via the Anthropic Messages API.
//!
//! The adapter boundary never leaks failures: any problem (network, HTTP
//! status, malformed or non-conforming JSON, unparseable due date) is logged
//! and collapsed into `None`, and the caller leaves its draft untouched.

use chrono::{DateTime, Local};
use serde::Deserialize;

use crate::core::task::parse_instant;

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const MODEL: &str = "claude-haiku-4-5-20251001";

/// Structured task fields extracted from a free-text description.
#[derive(Debug, Clone, Deserialize)]
pub struct ParsedTask {
    pub title: String,
    pub description: String,
    /// ISO 8601 instant, already checked to parse via
    /// [`crate::core::task::parse_instant`].
    #[serde(rename = "dueDate")]
    pub due_date: String,
}

/// Interpret a free-text task description against `now`.
pub async fn parse_task(api_key: &str, input: &str, now: DateTime<Local>) -> Option<ParsedTask> {
    match request_parse(api_key, input, now).await {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            log::warn!("smart task parse failed: {}", e);
            None
        }
    }
}

async fn request_parse(
    api_key: &str,
    input: &str,
    now: DateTime<Local>,
) -> Result<ParsedTask, String> {
    let body = serde_json::json!({
        "model": MODEL,
        "max_tokens": 300,
        "system": build_system_prompt(now),
        "messages": [
            { "role": "user", "content": input }
        ]
    });

    let client = reqwest::Client::new();
    let resp = client
        .post(API_URL)
        .header("x-api-key", api_key)
        .header("anthropic-version", "2023-06-01")
        .header("content-type", "application/json")
        .json(&body)
        .send()
        .await
        .map_err(|e| format!("API request failed: {}", e))?;

    if !resp.status().is_success() {
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        return Err(format!("API error {}: {}", status, text));
    }

    let api_resp: serde_json::Value = resp
        .json()
        .await
        .map_err(|e| format!("Failed to parse API response: {}", e))?;

    // Extract text from the first content block
    let text = api_resp["content"]
        .as_array()
        .and_then(|arr| arr.first())
        .and_then(|block| block["text"].as_str())
        .ok_or_else(|| "No text in API response".to_string())?;

    parse_model_output(text)
}

/// Validate the model's reply against the expected shape.
fn parse_model_output(text: &str) -> Result<ParsedTask, String> {
    // Strip markdown code fences if present
    let json_str = text
        .trim()
        .strip_prefix("```json")
        .or_else(|| text.trim().strip_prefix("```"))
        .unwrap_or(text.trim());
    let json_str = json_str.strip_suffix("```").unwrap_or(json_str).trim();

    let parsed: ParsedTask = serde_json::from_str(json_str)
        .map_err(|e| format!("Failed to parse extracted data: {} (raw: {})", e, text))?;

    if parsed.title.trim().is_empty() {
        return Err("model returned an empty title".to_string());
    }
    if parse_instant(&parsed.due_date).is_none() {
        return Err(format!(
            "model returned an unparseable dueDate: {}",
            parsed.due_date
        ));
    }

    Ok(parsed)
}

fn build_system_prompt(now: DateTime<Local>) -> String {
    let mut prompt = String::from(
        "You turn a free-text household task description into structured data. \
         Return ONLY a JSON object, no explanation.\n\n\
         Fields:\n\
         - \"title\": short task title\n\
         - \"description\": fuller description of the task, may be empty\n\
         - \"dueDate\": due date and time as an ISO 8601 string\n\n\
         Interpret relative dates (\"tomorrow\", \"next Friday\") against the \
         current date and time below. If the user gives no year, assume the \
         current year. If no time of day, assume 12:00.\n\n",
    );
    prompt.push_str(&format!("Current date and time: {}\n", now.to_rfc3339()));
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_json_object() {
        let parsed = parse_model_output(
            r#"{"title":"Buy milk","description":"2 liters","dueDate":"2026-09-15T17:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(parsed.title, "Buy milk");
        assert_eq!(parsed.description, "2 liters");
    }

    #[test]
    fn strips_code_fences() {
        let text = "```json\n{\"title\":\"Buy milk\",\"description\":\"\",\"dueDate\":\"2026-09-15T17:00:00Z\"}\n```";
        assert!(parse_model_output(text).is_ok());
    }

    #[test]
    fn rejects_missing_fields() {
        assert!(parse_model_output(r#"{"title":"Buy milk"}"#).is_err());
    }

    #[test]
    fn rejects_unparseable_due_date() {
        let text = r#"{"title":"Buy milk","description":"","dueDate":"whenever"}"#;
        assert!(parse_model_output(text).is_err());
    }

    #[test]
    fn rejects_prose_replies() {
        assert!(parse_model_output("Sure! Here is your task: buy milk.").is_err());
    }

    #[test]
    fn prompt_pins_the_reference_instant() {
        let now = Local::now();
        let prompt = build_system_prompt(now);
        assert!(prompt.contains(&now.to_rfc3339()));
        assert!(prompt.contains("assume 12:00"));
    }
}
