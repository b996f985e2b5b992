//! LLM-backed relationship judge

use super::{parse, prompt, InferenceError, InferenceResult, PairDescriptor, PairJudgment, RelationshipJudge};
use crate::config::{InferenceConfig, LLMProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_OUTPUT_TOKENS: u32 = 4096;

/// `RelationshipJudge` that prompts a chat-completion API
pub struct LlmJudge {
    client: Client,
    config: InferenceConfig,
    api_base_url: String,
}

impl LlmJudge {
    /// Build a judge, failing with `MissingCredentials` when the configured
    /// provider cannot be called
    pub fn new(config: &InferenceConfig) -> InferenceResult<Self> {
        if let Some(missing) = config.missing_credentials() {
            return Err(InferenceError::MissingCredentials(missing));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| InferenceError::ConfigError(e.to_string()))?;

        let api_base_url = config
            .api_base_url
            .clone()
            .or_else(|| config.provider.default_base_url().map(str::to_string))
            .unwrap_or_default()
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            client,
            config: config.clone(),
            api_base_url,
        })
    }

    fn system_prompt(&self) -> &str {
        self.config
            .system_prompt
            .as_deref()
            .unwrap_or(prompt::SYSTEM_PROMPT)
    }

    fn api_key(&self) -> &str {
        self.config.api_key.as_deref().unwrap_or_default()
    }

    /// Send one prompt and return the model's text
    pub async fn complete(&self, prompt: &str) -> InferenceResult<String> {
        match self.config.provider {
            LLMProvider::OpenAI => {
                let url = format!("{}/chat/completions", self.api_base_url);
                self.openai_chat(&url, prompt).await
            }
            LLMProvider::AzureOpenAI => {
                let url = format!(
                    "{}/openai/deployments/{}/chat/completions?api-version={}",
                    self.api_base_url, self.config.model, self.config.api_version
                );
                self.openai_chat(&url, prompt).await
            }
            LLMProvider::Anthropic => self.anthropic_chat(prompt).await,
            LLMProvider::Gemini => self.gemini_chat(prompt).await,
            LLMProvider::Ollama => self.ollama_chat(prompt).await,
        }
    }

    async fn send<T: Serialize + ?Sized>(
        &self,
        request: reqwest::RequestBuilder,
        body: &T,
    ) -> InferenceResult<reqwest::Response> {
        let resp = request
            .json(body)
            .send()
            .await
            .map_err(|e| InferenceError::NetworkError(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(InferenceError::ApiError(format!(
                "{} returned {}: {}",
                self.config.provider, status, text
            )));
        }
        Ok(resp)
    }

    /// OpenAI-compatible chat completion (OpenAI and Azure OpenAI)
    async fn openai_chat(&self, url: &str, prompt: &str) -> InferenceResult<String> {
        #[derive(Serialize)]
        struct Message<'a> {
            role: &'a str,
            content: &'a str,
        }

        #[derive(Serialize)]
        struct Request<'a> {
            #[serde(skip_serializing_if = "Option::is_none")]
            model: Option<&'a str>,
            messages: Vec<Message<'a>>,
            temperature: f32,
        }

        #[derive(Deserialize)]
        struct Response {
            choices: Vec<Choice>,
        }

        #[derive(Deserialize)]
        struct Choice {
            message: MessageContent,
        }

        #[derive(Deserialize)]
        struct MessageContent {
            content: Option<String>,
        }

        let azure = self.config.provider == LLMProvider::AzureOpenAI;
        let request = if azure {
            self.client.post(url).header("api-key", self.api_key())
        } else {
            self.client
                .post(url)
                .header("Authorization", format!("Bearer {}", self.api_key()))
        };

        let body = Request {
            // Azure addresses the model through the deployment in the URL
            model: (!azure).then_some(self.config.model.as_str()),
            messages: vec![
                Message { role: "system", content: self.system_prompt() },
                Message { role: "user", content: prompt },
            ],
            temperature: self.config.temperature,
        };

        let resp = self.send(request, &body).await?;
        let result: Response = resp
            .json()
            .await
            .map_err(|e| InferenceError::ParseError(e.to_string()))?;
        Ok(result
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default())
    }

    async fn anthropic_chat(&self, prompt: &str) -> InferenceResult<String> {
        #[derive(Serialize)]
        struct Message<'a> {
            role: &'a str,
            content: &'a str,
        }

        #[derive(Serialize)]
        struct Request<'a> {
            model: &'a str,
            max_tokens: u32,
            system: &'a str,
            messages: Vec<Message<'a>>,
            temperature: f32,
        }

        #[derive(Deserialize)]
        struct Response {
            content: Vec<ContentBlock>,
        }

        #[derive(Deserialize)]
        struct ContentBlock {
            #[serde(default)]
            text: Option<String>,
        }

        let url = format!("{}/messages", self.api_base_url);
        let request = self
            .client
            .post(&url)
            .header("x-api-key", self.api_key())
            .header("anthropic-version", ANTHROPIC_VERSION);

        let body = Request {
            model: &self.config.model,
            max_tokens: MAX_OUTPUT_TOKENS,
            system: self.system_prompt(),
            messages: vec![Message { role: "user", content: prompt }],
            temperature: self.config.temperature,
        };

        let resp = self.send(request, &body).await?;
        let result: Response = resp
            .json()
            .await
            .map_err(|e| InferenceError::ParseError(e.to_string()))?;
        Ok(result
            .content
            .into_iter()
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join(""))
    }

    async fn gemini_chat(&self, prompt: &str) -> InferenceResult<String> {
        #[derive(Serialize)]
        struct Request {
            contents: Vec<Content>,
            #[serde(rename = "generationConfig")]
            generation_config: GenerationConfig,
        }

        #[derive(Serialize, Deserialize)]
        struct Content {
            role: Option<String>,
            parts: Vec<Part>,
        }

        #[derive(Serialize, Deserialize)]
        struct Part {
            text: String,
        }

        #[derive(Serialize)]
        struct GenerationConfig {
            temperature: f32,
        }

        #[derive(Deserialize)]
        struct Response {
            candidates: Option<Vec<Candidate>>,
        }

        #[derive(Deserialize)]
        struct Candidate {
            content: Content,
        }

        // No separate system role on this endpoint; prepend the instruction
        let full_prompt = format!("{}\n\n{}", self.system_prompt(), prompt);
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.api_base_url,
            self.config.model,
            self.api_key()
        );

        let body = Request {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part { text: full_prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
            },
        };

        let resp = self.send(self.client.post(&url), &body).await?;
        let result: Response = resp
            .json()
            .await
            .map_err(|e| InferenceError::ParseError(e.to_string()))?;

        Ok(result
            .candidates
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .unwrap_or_default())
    }

    async fn ollama_chat(&self, prompt: &str) -> InferenceResult<String> {
        #[derive(Serialize)]
        struct Request<'a> {
            model: &'a str,
            prompt: &'a str,
            system: &'a str,
            stream: bool,
        }

        #[derive(Deserialize)]
        struct Response {
            response: String,
        }

        let url = format!("{}/api/generate", self.api_base_url);
        let body = Request {
            model: &self.config.model,
            prompt,
            system: self.system_prompt(),
            stream: false,
        };

        let resp = self.send(self.client.post(&url), &body).await?;
        let result: Response = resp
            .json()
            .await
            .map_err(|e| InferenceError::ParseError(e.to_string()))?;
        Ok(result.response)
    }
}

#[async_trait]
impl RelationshipJudge for LlmJudge {
    async fn evaluate(&self, batch: &[PairDescriptor<'_>]) -> InferenceResult<Vec<PairJudgment>> {
        let prompt = prompt::render_batch(batch);
        debug!("Requesting judgments for {} pairs from {}", batch.len(), self.config.provider);
        let text = self.complete(&prompt).await?;
        parse::parse_judgments(&text, batch.len())
    }
}
