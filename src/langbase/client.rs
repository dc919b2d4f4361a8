use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

use super::types::{CreatePipeRequest, CreatePipeResponse, Message, PipeRequest, PipeResponse};
use crate::config::{LangbaseConfig, ModelConfig, RequestConfig};
use crate::error::{CapabilityError, CapabilityResult};

/// Client for interacting with Langbase Pipes API
#[derive(Clone)]
pub struct LangbaseClient {
    client: Client,
    base_url: String,
    api_key: String,
    request_config: RequestConfig,
}

impl LangbaseClient {
    /// Create a new Langbase client
    pub fn new(config: &LangbaseConfig, request_config: RequestConfig) -> CapabilityResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(request_config.timeout_ms))
            .build()
            .map_err(CapabilityError::Http)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            request_config,
        })
    }

    /// Call a Langbase pipe once. Any failure is reported as
    /// [`CapabilityError::Unavailable`]; the caller decides whether to retry.
    pub async fn call_pipe(&self, request: PipeRequest) -> CapabilityResult<PipeResponse> {
        let url = format!("{}/v1/pipes/run", self.base_url);
        let start = Instant::now();

        match self.execute_request(&url, &request).await {
            Ok(response) => {
                info!(
                    pipe = %request.name,
                    latency_ms = start.elapsed().as_millis(),
                    total_tokens = response.total_tokens(),
                    "Langbase pipe call succeeded"
                );
                Ok(response)
            }
            Err(e) => {
                error!(
                    pipe = %request.name,
                    error = %e,
                    latency_ms = start.elapsed().as_millis(),
                    "Langbase pipe call failed"
                );
                Err(CapabilityError::Unavailable {
                    message: e.to_string(),
                })
            }
        }
    }

    async fn execute_request(
        &self,
        url: &str,
        request: &PipeRequest,
    ) -> CapabilityResult<PipeResponse> {
        debug!(
            pipe = %request.name,
            messages = request.messages.len(),
            "Calling Langbase pipe"
        );

        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CapabilityError::Timeout {
                        timeout_ms: self.request_config.timeout_ms,
                    }
                } else {
                    CapabilityError::Http(e)
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(CapabilityError::Api {
                status: status.as_u16(),
                message: error_body,
            });
        }

        response
            .json::<PipeResponse>()
            .await
            .map_err(|e| CapabilityError::InvalidResponse {
                message: format!("Failed to parse response: {}", e),
            })
    }

    /// Get the base URL (for testing)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create a new pipe
    pub async fn create_pipe(
        &self,
        request: CreatePipeRequest,
    ) -> CapabilityResult<CreatePipeResponse> {
        let url = format!("{}/v1/pipes", self.base_url);

        info!(pipe = %request.name, "Creating Langbase pipe");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(CapabilityError::Http)?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(CapabilityError::Api {
                status: status.as_u16(),
                message: error_body,
            });
        }

        let pipe_response: CreatePipeResponse =
            response
                .json()
                .await
                .map_err(|e| CapabilityError::InvalidResponse {
                    message: format!("Failed to parse create pipe response: {}", e),
                })?;

        info!(
            pipe = %pipe_response.name,
            url = %pipe_response.url,
            "Pipe created successfully"
        );

        Ok(pipe_response)
    }

    /// Ensure a JSON-output pipe named `pipe_name` exists with the given
    /// system prompt, creating or updating it as needed.
    pub async fn ensure_pipe(
        &self,
        pipe_name: &str,
        description: &str,
        system_prompt: &str,
        model: &ModelConfig,
    ) -> CapabilityResult<()> {
        let request = CreatePipeRequest::new(pipe_name)
            .with_description(description)
            .with_model(&model.model)
            .with_upsert(true)
            .with_json_output(true)
            .with_temperature(model.temperature)
            .with_max_tokens(model.max_tokens)
            .with_messages(vec![Message::system(system_prompt)]);

        match self.create_pipe(request).await {
            Ok(_) => {
                info!(pipe = %pipe_name, "Pipe ready");
                Ok(())
            }
            Err(CapabilityError::Api { status: 409, .. }) => {
                info!(pipe = %pipe_name, "Pipe already exists");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
