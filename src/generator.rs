use crate::config::{Config, Template};
use crate::constants::{API_BASE_URL, MAX_RETRIES, REQUEST_TIMEOUT_SECS, TEMPERATURE};
use crate::error::GenerateError;
use crate::prompt;
use crate::retry::retry_with_backoff;
use crate::ui::Spinner;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// a remote model that turns a prompt into text
pub trait TextModel {
    fn complete(&self, prompt: &str) -> Result<String, GenerateError>;
}

/// Gemini `generateContent` over blocking http
pub struct GeminiClient {
    agent: ureq::Agent,
    api_key: String,
    model: String,
    debug_response: bool,
}

impl GeminiClient {
    pub fn new(config: &Config, debug_response: bool) -> Self {
        let agent_config = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(REQUEST_TIMEOUT_SECS)))
            .http_status_as_error(false)
            .build();

        Self {
            agent: ureq::Agent::new_with_config(agent_config),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            debug_response,
        }
    }
}

impl TextModel for GeminiClient {
    fn complete(&self, prompt: &str) -> Result<String, GenerateError> {
        let url = format!("{API_BASE_URL}/{}:generateContent", self.model);
        let body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": { "temperature": TEMPERATURE },
        });

        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "sending request");
        let mut response = self
            .agent
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .send_json(&body)?;

        let status = response.status();
        let text = response.body_mut().read_to_string()?;
        tracing::debug!(%status, body_len = text.len(), "received response");

        if self.debug_response {
            use colored::Colorize;
            crate::info!("\n{}", text.dimmed());
        }

        if !status.is_success() {
            return Err(api_error(status.as_u16(), &text));
        }
        parse_response(&text)
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// text of the first candidate, all parts joined
fn parse_response(body: &str) -> Result<String, GenerateError> {
    let response: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| GenerateError::InvalidResponse(e.to_string()))?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(GenerateError::EmptyResponse);
    }
    Ok(text)
}

fn api_error(status: u16, body: &str) -> GenerateError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|response| response.error.message)
        .unwrap_or_else(|_| body.trim().to_string());
    GenerateError::Api { status, message }
}

/// builds the prompt and drives the model through the retry policy
pub struct Generator<M> {
    model: M,
    templates: Vec<Template>,
    sleep: Box<dyn Fn(Duration)>,
    show_prompt: bool,
}

impl<M: TextModel> Generator<M> {
    pub fn new(model: M, templates: Vec<Template>) -> Self {
        Self {
            model,
            templates,
            sleep: Box::new(std::thread::sleep),
            show_prompt: false,
        }
    }

    /// replace the backoff sleep
    #[cfg(test)]
    pub fn with_sleep(mut self, sleep: impl Fn(Duration) + 'static) -> Self {
        self.sleep = Box::new(sleep);
        self
    }

    /// print the prompt before it is sent
    pub fn with_show_prompt(mut self, show_prompt: bool) -> Self {
        self.show_prompt = show_prompt;
        self
    }

    #[cfg(test)]
    pub fn model(&self) -> &M {
        &self.model
    }

    /// generate a commit message for `diff`, using `history` as style context
    pub fn generate(&self, diff: &str, history: &[String]) -> Result<String, GenerateError> {
        let prompt = prompt::build(diff, history, &self.templates);
        if self.show_prompt {
            use colored::Colorize;
            crate::info!("\n{}", prompt.dimmed());
        }

        let spinner = Spinner::start("Generating commit message...");
        let result = retry_with_backoff(
            MAX_RETRIES,
            |retry| {
                let attempt = self.attempt(&prompt);
                if let Err(e) = &attempt {
                    tracing::debug!(
                        retry,
                        error = e as &dyn std::error::Error,
                        "generation attempt failed"
                    );
                }
                attempt
            },
            &self.sleep,
            |last| GenerateError::RetriesExhausted {
                retries: MAX_RETRIES,
                source: Box::new(last),
            },
        );

        if result.is_ok() {
            spinner.finish();
        }
        result
    }

    fn attempt(&self, prompt: &str) -> Result<String, GenerateError> {
        let message = prompt::extract_message(&self.model.complete(prompt)?);
        if message.is_empty() {
            return Err(GenerateError::EmptyResponse);
        }
        Ok(message)
    }
}
