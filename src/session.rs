//! Session orchestration for thumbnail generation and enhancement.

use crate::ai::{
    GeminiImageClient, GeminiImageEditClient, ImageEditService, ImageGenerationService,
};
use crate::models::{Config, Logo};
use crate::{Error, Result};
use tracing::{error, info};

/// User-facing messages, kept identical across surfaces.
pub const ERR_EMPTY_DESCRIPTION: &str = "Please enter a video description.";
pub const ERR_NO_IMAGE: &str = "Generate an image before enhancing.";
pub const ERR_EMPTY_TITLE: &str = "Please enter a title to add to the thumbnail.";
pub const ERR_GENERATION_FAILED: &str =
    "Failed to generate thumbnail. Please check your API key and try again.";
pub const ERR_ENHANCE_FAILED: &str =
    "Failed to enhance thumbnail. The model may not be suitable for image editing. Please try again.";

/// Mutable session record owned by [`Session`].
///
/// Invariants: at most one of `generating`/`enhancing` is true at a time, and
/// `last_error` is cleared whenever a new request is accepted.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub description: String,
    pub title: String,
    pub logo: Option<Logo>,
    pub image: Option<Vec<u8>>,
    pub generating: bool,
    pub enhancing: bool,
    pub last_error: Option<String>,
}

/// Coordinates the generate and enhance request cycles against the AI facade.
pub struct Session {
    generator: Box<dyn ImageGenerationService>,
    editor: Box<dyn ImageEditService>,
    state: SessionState,
}

impl Session {
    /// Build a session from concrete service dependencies.
    ///
    /// This is primarily useful for tests and harnesses that need to inject
    /// mocks.
    pub fn new(
        generator: Box<dyn ImageGenerationService>,
        editor: Box<dyn ImageEditService>,
    ) -> Self {
        Self {
            generator,
            editor,
            state: SessionState::default(),
        }
    }

    /// Construct a session backed by Gemini clients from configuration.
    pub fn from_config(config: &Config) -> Self {
        // Reuse one HTTP connection pool across both Gemini clients.
        let http_client = reqwest::Client::new();

        let generator = Box::new(GeminiImageClient::new_with_client(
            config.gemini_api_key.clone(),
            config.image_model.clone(),
            http_client.clone(),
        ));
        let editor = Box::new(GeminiImageEditClient::new_with_client(
            config.gemini_api_key.clone(),
            config.edit_model.clone(),
            http_client,
        ));

        Self::new(generator, editor)
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.state.description = description.into();
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.state.title = title.into();
    }

    pub fn attach_logo(&mut self, logo: Logo) {
        self.state.logo = Some(logo);
    }

    /// Generate a thumbnail from the current description.
    ///
    /// Rejects the request while a generation is already in flight, and fails
    /// fast on an empty description without touching the facade. Any prior
    /// image, title, and logo are discarded before the remote call so a
    /// failed generation never carries stale enhancement context.
    pub async fn generate(&mut self) -> Result<()> {
        if self.state.generating {
            // Rejected before becoming a new request; state stays untouched.
            return Err(Error::Validation(
                "A generation request is already in flight".to_string(),
            ));
        }
        if self.state.description.trim().is_empty() {
            self.state.last_error = Some(ERR_EMPTY_DESCRIPTION.to_string());
            return Err(Error::Validation(ERR_EMPTY_DESCRIPTION.to_string()));
        }

        self.state.generating = true;
        self.state.last_error = None;
        self.state.image = None;
        self.state.title.clear();
        self.state.logo = None;

        info!(
            "Generating thumbnail from description ({} chars)",
            self.state.description.len()
        );

        let result = self.generator.generate_image(&self.state.description).await;
        self.state.generating = false;

        match result {
            Ok(bytes) => {
                info!("Generated thumbnail ({} bytes)", bytes.len());
                self.state.title = first_line(&self.state.description);
                self.state.image = Some(bytes);
                Ok(())
            }
            Err(e) => {
                error!("Thumbnail generation failed: {}", e);
                self.state.last_error = Some(ERR_GENERATION_FAILED.to_string());
                Err(e)
            }
        }
    }

    /// Overlay the current title (and logo, when attached) onto the image.
    ///
    /// Requires a generated image and a non-blank title. On success the
    /// stored image is replaced with the edited result; the pre-enhancement
    /// image is not retained.
    pub async fn enhance(&mut self) -> Result<()> {
        if self.state.enhancing {
            return Err(Error::Validation(
                "An enhance request is already in flight".to_string(),
            ));
        }
        let Some(image) = self.state.image.clone() else {
            self.state.last_error = Some(ERR_NO_IMAGE.to_string());
            return Err(Error::Validation(ERR_NO_IMAGE.to_string()));
        };
        if self.state.title.trim().is_empty() {
            self.state.last_error = Some(ERR_EMPTY_TITLE.to_string());
            return Err(Error::Validation(ERR_EMPTY_TITLE.to_string()));
        }

        self.state.enhancing = true;
        self.state.last_error = None;

        info!(
            "Enhancing thumbnail with title {:?} (logo: {})",
            self.state.title,
            self.state.logo.is_some()
        );

        let result = self
            .editor
            .edit_image(&image, &self.state.title, self.state.logo.as_ref())
            .await;
        self.state.enhancing = false;

        match result {
            Ok(bytes) => {
                info!("Enhanced thumbnail ({} bytes)", bytes.len());
                self.state.image = Some(bytes);
                Ok(())
            }
            Err(e) => {
                error!("Thumbnail enhancement failed: {}", e);
                self.state.last_error = Some(ERR_ENHANCE_FAILED.to_string());
                Err(e)
            }
        }
    }

    #[cfg(test)]
    fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }
}

/// First line of the description, trimmed, used as the default title.
fn first_line(description: &str) -> String {
    description.lines().next().unwrap_or("").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{MockImageEditClient, MockImageGenerationClient};

    fn build_session(
        generator: MockImageGenerationClient,
        editor: MockImageEditClient,
    ) -> Session {
        Session::new(Box::new(generator), Box::new(editor))
    }

    #[tokio::test]
    async fn test_generate_stores_image_and_derives_title() {
        let generator = MockImageGenerationClient::new().with_image_response(vec![1, 2, 3]);
        let probe = generator.clone();
        let mut session = build_session(generator, MockImageEditClient::new());

        session.set_description("How to bake bread\nStep by step guide");
        session.generate().await.unwrap();

        let state = session.state();
        assert_eq!(state.image.as_deref(), Some(&[1, 2, 3][..]));
        assert_eq!(state.title, "How to bake bread");
        assert!(state.last_error.is_none());
        assert!(!state.generating);
        // The facade receives the full description, not just the first line.
        assert_eq!(
            probe.last_description().unwrap(),
            "How to bake bread\nStep by step guide"
        );
    }

    #[tokio::test]
    async fn test_generate_rejects_blank_description_without_calling_facade() {
        let generator = MockImageGenerationClient::new();
        let probe = generator.clone();
        let mut session = build_session(generator, MockImageEditClient::new());

        session.set_description("   \n  ");
        let err = session.generate().await.unwrap_err();

        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(probe.get_call_count(), 0);
        assert_eq!(
            session.state().last_error.as_deref(),
            Some(ERR_EMPTY_DESCRIPTION)
        );
    }

    #[tokio::test]
    async fn test_generate_clears_previous_session_context() {
        let generator = MockImageGenerationClient::new().with_image_response(vec![7]);
        let mut session = build_session(generator, MockImageEditClient::new());

        session.set_description("First video");
        session.generate().await.unwrap();
        session.set_title("Edited title");
        session.attach_logo(Logo::new(
            vec![1],
            "logo.png".to_string(),
            "image/png".to_string(),
        ));

        session.set_description("Second video");
        session.generate().await.unwrap();

        let state = session.state();
        assert_eq!(state.title, "Second video");
        assert!(state.logo.is_none());
        assert!(state.last_error.is_none());
    }

    #[tokio::test]
    async fn test_generate_failure_sets_generic_message_and_clears_flag() {
        let generator = MockImageGenerationClient::new().with_failure(true);
        let mut session = build_session(generator, MockImageEditClient::new());

        session.set_description("A video");
        let err = session.generate().await.unwrap_err();

        assert!(matches!(err, Error::Generation(_)));
        let state = session.state();
        assert_eq!(state.last_error.as_deref(), Some(ERR_GENERATION_FAILED));
        assert!(!state.generating);
        assert!(state.image.is_none());
    }

    #[tokio::test]
    async fn test_generate_guard_rejects_in_flight_request_without_state_changes() {
        let mut session = build_session(
            MockImageGenerationClient::new(),
            MockImageEditClient::new(),
        );

        session.set_description("A video");
        session.state_mut().generating = true;
        session.state_mut().last_error = Some("previous error".to_string());

        let err = session.generate().await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        // A rejected request never became a new one; the error stays.
        assert_eq!(
            session.state().last_error.as_deref(),
            Some("previous error")
        );
    }

    #[tokio::test]
    async fn test_enhance_requires_image() {
        let editor = MockImageEditClient::new();
        let probe = editor.clone();
        let mut session = build_session(MockImageGenerationClient::new(), editor);

        session.set_title("My Video");
        let err = session.enhance().await.unwrap_err();

        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(probe.get_call_count(), 0);
        assert_eq!(session.state().last_error.as_deref(), Some(ERR_NO_IMAGE));
    }

    #[tokio::test]
    async fn test_enhance_requires_title() {
        let generator = MockImageGenerationClient::new();
        let editor = MockImageEditClient::new();
        let probe = editor.clone();
        let mut session = build_session(generator, editor);

        session.set_description("A video");
        session.generate().await.unwrap();
        session.set_title("   ");

        let err = session.enhance().await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(probe.get_call_count(), 0);
        assert_eq!(session.state().last_error.as_deref(), Some(ERR_EMPTY_TITLE));
    }

    #[tokio::test]
    async fn test_enhance_replaces_image_destructively() {
        let generator = MockImageGenerationClient::new().with_image_response(vec![1, 1, 1]);
        let editor = MockImageEditClient::new().with_edit_response(vec![2, 2, 2]);
        let probe = editor.clone();
        let mut session = build_session(generator, editor);

        session.set_description("A video");
        session.generate().await.unwrap();
        session.set_title("My Video");
        session.enhance().await.unwrap();

        assert_eq!(session.state().image.as_deref(), Some(&[2, 2, 2][..]));

        let call = probe.last_call().unwrap();
        assert_eq!(call.image, vec![1, 1, 1]);
        assert_eq!(call.title, "My Video");
        assert!(call.logo.is_none());
    }

    #[tokio::test]
    async fn test_enhance_failure_keeps_unedited_image() {
        let generator = MockImageGenerationClient::new().with_image_response(vec![1, 1, 1]);
        let editor = MockImageEditClient::new().with_failure(true);
        let mut session = build_session(generator, editor);

        session.set_description("A video");
        session.generate().await.unwrap();
        session.set_title("My Video");

        let err = session.enhance().await.unwrap_err();
        assert!(matches!(err, Error::Edit(_)));

        let state = session.state();
        assert_eq!(state.image.as_deref(), Some(&[1, 1, 1][..]));
        assert_eq!(state.last_error.as_deref(), Some(ERR_ENHANCE_FAILED));
        assert!(!state.enhancing);
    }

    #[test]
    fn test_first_line_trims_and_defaults_empty() {
        assert_eq!(first_line("  My Title  \nrest"), "My Title");
        assert_eq!(first_line(""), "");
    }
}
