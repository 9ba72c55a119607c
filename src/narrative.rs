// src/narrative.rs - external narrative enrichment
//
// Optionally asks a chat-completion service to write the report from
// the numeric scorecard. The model output is an untrusted boundary:
// the outermost JSON object is extracted from the reply text and
// validated field-by-field against the report schema. Any failure, be
// it transport, status, parsing or schema, falls back to the local
// deterministic report.

use std::time::Duration;

use anyhow::{anyhow, Context};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::engine::CompleteAnalysisResult;
use crate::report::{self, AiReport, TrainingPlan};

#[derive(Debug, Clone)]
pub struct NarrativeConfig {
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

impl NarrativeConfig {
    /// Reads SHOTFORM_LLM_URL, SHOTFORM_LLM_KEY and SHOTFORM_LLM_MODEL.
    /// Returns None when the endpoint is not configured, which disables
    /// enrichment entirely.
    pub fn from_env() -> Option<Self> {
        let endpoint = std::env::var("SHOTFORM_LLM_URL").ok()?;
        Some(Self {
            endpoint,
            api_key: std::env::var("SHOTFORM_LLM_KEY").unwrap_or_default(),
            model: std::env::var("SHOTFORM_LLM_MODEL")
                .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            timeout: Duration::from_secs(30),
        })
    }
}

pub struct NarrativeClient {
    http: reqwest::Client,
    config: NarrativeConfig,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

/// Mirror of [`AiReport`] with the one field the model may omit.
#[derive(Deserialize)]
struct RawAiReport {
    summary: String,
    problems: Vec<String>,
    recommendations: Vec<String>,
    training_plan: TrainingPlan,
    disclaimer: Option<String>,
}

impl NarrativeClient {
    pub fn new(config: NarrativeConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .context("building narrative http client")?;
        Ok(Self { http, config })
    }

    pub async fn enrich(&self, result: &CompleteAnalysisResult) -> anyhow::Result<AiReport> {
        let body = json!({
            "model": self.config.model,
            "messages": [
                {
                    "role": "system",
                    "content": "You are a basketball shooting coach. Reply with a single JSON object \
                                with fields: summary (string), problems (string array), \
                                recommendations (string array), training_plan (object with title, \
                                description, exercises, duration_weeks), disclaimer (string)."
                },
                {
                    "role": "user",
                    "content": scorecard_prompt(result),
                }
            ],
            "temperature": 0.4,
        });

        let response = self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .context("narrative request failed")?
            .error_for_status()
            .context("narrative service returned an error status")?;

        let chat: ChatResponse =
            response.json().await.context("narrative response was not valid JSON")?;
        let content = chat
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| anyhow!("narrative response had no choices"))?;

        parse_report(content)
    }
}

/// Runs enrichment when a client is configured, falling back to the
/// local deterministic report on any failure. The fallback is required
/// behavior, never an error.
pub async fn generate_or_fallback(
    client: Option<&NarrativeClient>,
    result: &CompleteAnalysisResult,
) -> AiReport {
    if let Some(client) = client {
        match client.enrich(result).await {
            Ok(report) => return report,
            Err(error) => {
                warn!(%error, "narrative enrichment failed, using local report");
            }
        }
    }
    report::generate_report(&result.dimensions, result.overall_score)
}

fn scorecard_prompt(result: &CompleteAnalysisResult) -> String {
    let d = &result.dimensions;
    format!(
        "Write a shooting-form report for this scorecard.\n\
         Overall: {} (confidence interval {:.0}-{:.0})\n\
         Consistency: {}\nJoint angles: {}\nSymmetry: {}\nShooting style: {:?} ({})\n\
         Timing: {}\nStability: {}\nCoordination: {}\nKinetic chain: {}\n\
         Detection confidence: {}",
        result.overall_score,
        result.confidence_interval.0,
        result.confidence_interval.1,
        d.consistency.score,
        d.joint_angles.score,
        d.symmetry.score,
        d.shooting_style.style,
        d.shooting_style.score,
        d.timing.score,
        d.stability.score,
        d.coordination.score,
        d.kinetic_chain.score,
        result.detection_confidence,
    )
}

/// Pulls the outermost `{...}` from free-form model output and
/// validates it against the report schema. A missing disclaimer is
/// replaced with the fixed local one; any other gap is an error.
fn parse_report(content: &str) -> anyhow::Result<AiReport> {
    let start = content.find('{').ok_or_else(|| anyhow!("no JSON object in reply"))?;
    let end = content.rfind('}').ok_or_else(|| anyhow!("no JSON object in reply"))?;
    if end < start {
        return Err(anyhow!("malformed JSON object in reply"));
    }

    let raw: RawAiReport = serde_json::from_str(&content[start..=end])
        .context("reply did not match the report schema")?;

    Ok(AiReport {
        summary: raw.summary,
        problems: raw.problems,
        recommendations: raw.recommendations,
        training_plan: raw.training_plan,
        disclaimer: raw.disclaimer.unwrap_or_else(|| report::DISCLAIMER.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::AnalysisEngine;
    use crate::pose::{synthetic_shot_sequence, CameraAngle};

    const VALID_BODY: &str = r#"{
        "summary": "Solid form overall.",
        "problems": ["Rhythm is uneven"],
        "recommendations": ["Shoot in continuous sets"],
        "training_plan": {
            "title": "Plan",
            "description": "Two drills",
            "exercises": [],
            "duration_weeks": 4
        },
        "disclaimer": "Informational only."
    }"#;

    #[test]
    fn parses_json_wrapped_in_prose() {
        let content = format!("Here is your report:\n```json\n{VALID_BODY}\n```\nGood luck!");
        let report = parse_report(&content).unwrap();
        assert_eq!(report.summary, "Solid form overall.");
        assert_eq!(report.training_plan.duration_weeks, 4);
        assert_eq!(report.disclaimer, "Informational only.");
    }

    #[test]
    fn missing_disclaimer_is_filled_locally() {
        let content =
            VALID_BODY.replace(r#""disclaimer": "Informational only.""#, r#""extra": true"#);
        let report = parse_report(&content).unwrap();
        assert_eq!(report.disclaimer, report::DISCLAIMER);
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let content = r#"{"summary": "only a summary"}"#;
        assert!(parse_report(content).is_err());
        assert!(parse_report("no json here at all").is_err());
    }

    #[tokio::test]
    async fn fallback_without_client_is_the_local_report() {
        let sequence = synthetic_shot_sequence(1000.0, 30.0);
        let result = AnalysisEngine::default().analyze(&sequence, CameraAngle::Side).unwrap();
        let report = generate_or_fallback(None, &result).await;
        assert_eq!(
            report,
            report::generate_report(&result.dimensions, result.overall_score)
        );
    }

    #[tokio::test]
    async fn unreachable_service_falls_back() {
        let client = NarrativeClient::new(NarrativeConfig {
            endpoint: "http://127.0.0.1:1/v1/chat/completions".to_string(),
            api_key: String::new(),
            model: "test".to_string(),
            timeout: Duration::from_millis(200),
        })
        .unwrap();
        let sequence = synthetic_shot_sequence(1000.0, 30.0);
        let result = AnalysisEngine::default().analyze(&sequence, CameraAngle::Side).unwrap();
        let report = generate_or_fallback(Some(&client), &result).await;
        assert_eq!(
            report,
            report::generate_report(&result.dimensions, result.overall_score)
        );
    }
}
