// src/services/openrouter.rs
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use tracing::{debug, error, info};

/// Model used when OR_MODEL is not set.
pub const DEFAULT_MODEL: &str = "google/gemini-2.0-flash-exp:free";

const DEFAULT_BASE_URL: &str = "https://openrouter.ai";

/// System instruction demanding the extraction JSON schema. The model is
/// told not to fence the output, but responses are sanitized anyway before
/// parsing.
const EXTRACTION_SYSTEM_PROMPT: &str = concat!(
    "You are a helpful assistant that extracts information from resumes/CVs. ",
    "Your task is to verify if the document is a resume/CV, and if so, extract ",
    "the candidate's full profile. Return the result strictly as a valid JSON ",
    "object with the following structure:\n",
    "{\n",
    "  \"isResume\": boolean,\n",
    "  \"validityReason\": string | null,\n",
    "  \"firstName\": string | null,\n",
    "  \"lastName\": string | null,\n",
    "  \"email\": string | null,\n",
    "  \"phone\": string | null,\n",
    "  \"linkedin\": string | null,\n",
    "  \"summary\": string | null,\n",
    "  \"experiences\": [\n",
    "    {\n",
    "      \"company\": string,\n",
    "      \"role\": string,\n",
    "      \"startDate\": string,\n",
    "      \"endDate\": string,\n",
    "      \"description\": string[] (array of bullet points),\n",
    "      \"summary\": string | null\n",
    "    }\n",
    "  ],\n",
    "  \"education\": [\n",
    "    {\n",
    "      \"institution\": string,\n",
    "      \"degree\": string,\n",
    "      \"startDate\": string,\n",
    "      \"endDate\": string\n",
    "    }\n",
    "  ],\n",
    "  \"skills\": string[],\n",
    "  \"languages\": string[]\n",
    "}\n",
    "Do not include markdown formatting or code blocks in the response, just the raw JSON."
);

const EXTRACTION_USER_PROMPT: &str = "Extract the full candidate profile from this resume.";

#[derive(Debug, thiserror::Error)]
pub enum OpenRouterError {
    #[error("OR_KEY not configured")]
    MissingApiKey,

    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("API returned HTTP {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("Empty response from LLM")]
    EmptyResponse,
}

/// Explicit extraction configuration, built once at startup.
/// Absence of the credential is a typed construction error, not a runtime
/// surprise on the first request.
#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl OpenRouterConfig {
    /// Read OR_KEY / OR_MODEL / OR_BASE_URL from the environment.
    pub fn from_env() -> Result<Self, OpenRouterError> {
        let api_key = env::var("OR_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or(OpenRouterError::MissingApiKey)?;
        let model = env::var("OR_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let base_url = env::var("OR_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Ok(Self {
            api_key,
            base_url,
            model,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    plugins: Vec<Plugin>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: MessageContent,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ContentPart {
    Text { text: String },
    File { file: FileAttachment },
}

#[derive(Debug, Serialize)]
struct FileAttachment {
    file_data: String,
    mime_type: String,
}

/// Document-parsing capability flag so the provider extracts PDF text
/// before reasoning over it.
#[derive(Debug, Serialize)]
struct Plugin {
    id: String,
    pdf: PdfEngine,
}

#[derive(Debug, Serialize)]
struct PdfEngine {
    engine: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug)]
pub struct OpenRouterService {
    config: OpenRouterConfig,
    client: Client,
}

impl OpenRouterService {
    pub fn new(config: OpenRouterConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(180))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { config, client }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// One chat-completion call carrying the PDF as a Base64 data URL.
    /// Returns the raw (possibly fenced) text of the first choice.
    /// Transient upstream failures are reported straight to the caller;
    /// there is no retry.
    pub async fn extract_profile_text(
        &self,
        base64_pdf: &str,
    ) -> Result<String, OpenRouterError> {
        let data_url = format!("data:application/pdf;base64,{}", base64_pdf);
        let request = build_extraction_request(&self.config.model, data_url);

        debug!(model = %self.config.model, "Sending extraction request to OpenRouter");

        let url = format!(
            "{}/api/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| OpenRouterError::RequestFailed(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(status = %status, body = %body, "OpenRouter API request failed");
            return Err(OpenRouterError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        let completion = response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| OpenRouterError::RequestFailed(e.to_string()))?;

        let content = completion
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(OpenRouterError::EmptyResponse)?;

        info!(
            model = %self.config.model,
            content_len = content.len(),
            "OpenRouter extraction completed"
        );

        Ok(content.to_string())
    }
}

fn build_extraction_request(model: &str, data_url: String) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage {
                role: "system".to_string(),
                content: MessageContent::Text(EXTRACTION_SYSTEM_PROMPT.to_string()),
            },
            ChatMessage {
                role: "user".to_string(),
                content: MessageContent::Parts(vec![
                    ContentPart::Text {
                        text: EXTRACTION_USER_PROMPT.to_string(),
                    },
                    ContentPart::File {
                        file: FileAttachment {
                            file_data: data_url,
                            mime_type: "application/pdf".to_string(),
                        },
                    },
                ]),
            },
        ],
        plugins: vec![Plugin {
            id: "file-parser".to_string(),
            pdf: PdfEngine {
                engine: "pdf-text".to_string(),
            },
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_request_wire_shape() {
        let request = build_extraction_request(
            DEFAULT_MODEL,
            "data:application/pdf;base64,AAAA".to_string(),
        );
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["model"], DEFAULT_MODEL);
        assert_eq!(value["messages"][0]["role"], "system");
        assert!(value["messages"][0]["content"].is_string());

        let user_parts = &value["messages"][1]["content"];
        assert_eq!(user_parts[0]["type"], "text");
        assert_eq!(user_parts[1]["type"], "file");
        assert_eq!(
            user_parts[1]["file"]["file_data"],
            "data:application/pdf;base64,AAAA"
        );
        assert_eq!(user_parts[1]["file"]["mime_type"], "application/pdf");

        assert_eq!(value["plugins"][0]["id"], "file-parser");
        assert_eq!(value["plugins"][0]["pdf"]["engine"], "pdf-text");
    }

    #[test]
    fn test_response_with_no_choices_decodes() {
        let response: ChatCompletionResponse = serde_json::from_str("{}").unwrap();
        assert!(response.choices.is_empty());
    }

    #[test]
    fn test_response_content_decodes() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"{\"isResume\":true}"}}]}"#,
        )
        .unwrap();
        assert_eq!(
            response.choices[0].message.content.as_deref(),
            Some("{\"isResume\":true}")
        );
    }
}
