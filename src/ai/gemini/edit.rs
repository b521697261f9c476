use super::client::GeminiHttpClient;
use super::types::{Content, GenerateContentResponse, InlineData, Part};
use crate::ai::{mime, ImageEditService};
use crate::models::Logo;
use crate::{prompts, Error, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Serialize)]
struct EditRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: EditGenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EditGenerationConfig {
    response_modalities: Vec<String>,
}

pub struct GeminiImageEditClient {
    http: GeminiHttpClient,
}

impl GeminiImageEditClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(
                api_key,
                model,
                Duration::from_secs(120),
                client,
            ),
        }
    }

    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }

    fn build_instruction(title: &str, logo: Option<&Logo>) -> String {
        let mut instruction = prompts::render(prompts::EDIT_TITLE, &[("title", title)]);
        if logo.is_some() {
            instruction.push_str("\n\n");
            instruction.push_str(prompts::EDIT_LOGO_CLAUSE.trim_end());
        }
        instruction
    }
}

#[async_trait]
impl ImageEditService for GeminiImageEditClient {
    async fn edit_image(
        &self,
        image: &[u8],
        title: &str,
        logo: Option<&Logo>,
    ) -> Result<Vec<u8>> {
        tracing::debug!(
            "Requesting thumbnail edit from Gemini ({} byte image, logo: {})",
            image.len(),
            logo.is_some()
        );

        use base64::Engine as _;
        let engine = base64::engine::general_purpose::STANDARD;

        let mut parts = vec![Part::InlineData {
            inline_data: InlineData {
                mime_type: mime::detect_image_mime(image).to_string(),
                data: engine.encode(image),
            },
        }];

        if let Some(logo) = logo {
            parts.push(Part::InlineData {
                inline_data: InlineData {
                    mime_type: logo.mime_type.clone(),
                    data: engine.encode(&logo.data),
                },
            });
        }

        parts.push(Part::Text {
            text: Self::build_instruction(title, logo),
        });

        let request = EditRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts,
            }],
            generation_config: EditGenerationConfig {
                response_modalities: vec!["IMAGE".to_string()],
            },
        };

        let gemini_response: GenerateContentResponse = self
            .http
            .generate_content(&request)
            .await
            .map_err(Error::into_edit)?;

        let Some(image_data) = gemini_response.first_inline_data() else {
            // A text-only candidate means the model declined to perform the
            // edit. The user can re-trigger; we never retry automatically.
            return Err(match gemini_response.first_text() {
                Some(text) => Error::Edit(format!("Gemini declined to edit the image: {}", text)),
                None => Error::Edit("No image data in Gemini edit response".to_string()),
            });
        };

        tracing::debug!(
            "Gemini returned edited image with mime_type: {}",
            image_data.mime_type
        );

        engine
            .decode(&image_data.data)
            .map_err(|e| Error::Edit(format!("Failed to decode Gemini base64 image: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::gemini::test_support;
    use wiremock::matchers::body_string_contains;
    use wiremock::{MockServer, ResponseTemplate};

    const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";

    fn make_client(server: &MockServer) -> GeminiImageEditClient {
        GeminiImageEditClient::new("key".to_string(), DEFAULT_MODEL.to_string())
            .with_base_url(server.uri())
    }

    fn edited_image_response(bytes: &[u8]) -> ResponseTemplate {
        use base64::Engine as _;
        let b64 = base64::engine::general_purpose::STANDARD.encode(bytes);
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [{
                        "inlineData": { "mimeType": "image/png", "data": b64 }
                    }]
                }
            }]
        }))
    }

    #[tokio::test]
    async fn test_edit_image_returns_edited_bytes() {
        let server = MockServer::start().await;
        let edited = vec![0xFF, 0xD8, 0xFF, 0xE0];

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .and(body_string_contains("My Video"))
            .respond_with(edited_image_response(&edited))
            .mount(&server)
            .await;

        let client = make_client(&server);

        let result = client
            .edit_image(&[0x89, 0x50, 0x4E, 0x47], "My Video", None)
            .await
            .unwrap();
        assert_eq!(result, edited);
    }

    #[tokio::test]
    async fn test_edit_request_sniffs_source_image_mime() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .and(body_string_contains("\"mimeType\":\"image/jpeg\""))
            .respond_with(edited_image_response(&[0x01]))
            .expect(1)
            .mount(&server)
            .await;

        let client = make_client(&server);

        client
            .edit_image(&[0xFF, 0xD8, 0xFF, 0xE0], "Title", None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_edit_request_includes_logo_part() {
        let server = MockServer::start().await;

        use base64::Engine as _;
        let logo_bytes = vec![0x11, 0x22, 0x33];
        let logo_b64 = base64::engine::general_purpose::STANDARD.encode(&logo_bytes);

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .and(body_string_contains(logo_b64.as_str()))
            .and(body_string_contains("\"mimeType\":\"image/webp\""))
            .and(body_string_contains("channel logo"))
            .respond_with(edited_image_response(&[0x01]))
            .expect(1)
            .mount(&server)
            .await;

        let client = make_client(&server);
        let logo = Logo::new(logo_bytes, "logo.webp".to_string(), "image/webp".to_string());

        client
            .edit_image(&[0x89, 0x50, 0x4E, 0x47], "Title", Some(&logo))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_text_only_response_is_a_declined_edit() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": {
                        "parts": [{ "text": "I cannot edit this image." }]
                    }
                }]
            })))
            .mount(&server)
            .await;

        let client = make_client(&server);

        let err = client
            .edit_image(&[0x89, 0x50], "Title", None)
            .await
            .unwrap_err();
        match err {
            Error::Edit(msg) => assert!(msg.contains("declined")),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_api_error_returns_edit_error() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
            .mount(&server)
            .await;

        let client = make_client(&server);

        let err = client
            .edit_image(&[0x89, 0x50], "Title", None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Edit(_)));
    }

    #[tokio::test]
    async fn test_empty_candidates_return_edit_error() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "candidates": [] })),
            )
            .mount(&server)
            .await;

        let client = make_client(&server);

        let err = client
            .edit_image(&[0x89, 0x50], "Title", None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Edit(_)));
    }
}
