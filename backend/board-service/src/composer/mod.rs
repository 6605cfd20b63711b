//! Composer: title plus rich-text buffer, submitted through the feed.

mod image;

pub use image::{encode_image, EncodedImage, DEFAULT_IMAGE_WARN_BYTES, IMAGE_ALT};

use rich_text::{BufferError, FormatCommand, Position, RichTextBuffer};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::feed::FeedStore;
use crate::i18n::Text;
use crate::store::StoreError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComposerError {
    #[error("title and content are required")]
    EmptySubmission,

    #[error("sign in before posting")]
    LoginRequired,

    #[error("store denied the write")]
    PermissionDenied,

    #[error("post exceeds the store's document size limit")]
    PayloadTooLarge,

    #[error("saving the post failed: {0}")]
    SaveFailed(String),

    #[error("not an image: {0}")]
    UnsupportedImage(String),

    #[error(transparent)]
    Buffer(#[from] BufferError),
}

impl ComposerError {
    pub fn text(&self) -> Text {
        match self {
            ComposerError::EmptySubmission | ComposerError::Buffer(_) => Text::EmptySubmission,
            ComposerError::LoginRequired => Text::LoginRequired,
            ComposerError::PermissionDenied => Text::AccessRulesTitle,
            ComposerError::PayloadTooLarge => Text::PayloadTooLarge,
            ComposerError::SaveFailed(_) => Text::SaveFailed,
            ComposerError::UnsupportedImage(_) => Text::UnsupportedImage,
        }
    }
}

impl From<StoreError> for ComposerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::PermissionDenied => ComposerError::PermissionDenied,
            StoreError::PayloadTooLarge { .. } => ComposerError::PayloadTooLarge,
            other => ComposerError::SaveFailed(other.to_string()),
        }
    }
}

pub struct Composer {
    title: String,
    buffer: RichTextBuffer,
    image_warn_bytes: usize,
    notice: Option<Text>,
}

impl Default for Composer {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_WARN_BYTES)
    }
}

impl Composer {
    pub fn new(image_warn_bytes: usize) -> Self {
        Self {
            title: String::new(),
            buffer: RichTextBuffer::new(),
            image_warn_bytes,
            notice: None,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn buffer(&self) -> &RichTextBuffer {
        &self.buffer
    }

    /// Serialized editor content
    pub fn content_html(&self) -> String {
        self.buffer.to_html()
    }

    /// Non-blocking warning from the last image insert
    pub fn notice(&self) -> Option<Text> {
        self.notice
    }

    pub fn insert_text(&mut self, text: &str) {
        self.buffer.insert_text(text);
    }

    pub fn delete_backward(&mut self) {
        self.buffer.delete_backward();
    }

    pub fn set_caret(&mut self, at: Position) -> Result<(), ComposerError> {
        Ok(self.buffer.set_caret(at)?)
    }

    pub fn select(&mut self, anchor: Position, focus: Position) -> Result<(), ComposerError> {
        Ok(self.buffer.select(anchor, focus)?)
    }

    pub fn format(&mut self, command: FormatCommand) {
        self.buffer.apply(command);
    }

    /// Splice an image at the caret; returns the size warning, if any
    pub fn insert_image(
        &mut self,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<Option<Text>, ComposerError> {
        let encoded = encode_image(content_type, bytes, self.image_warn_bytes)?;
        self.notice = if encoded.oversized {
            warn!(
                size = encoded.size,
                threshold = self.image_warn_bytes,
                "large image inserted"
            );
            Some(Text::ImageTooLarge)
        } else {
            None
        };
        self.buffer.insert_image(encoded.image);
        Ok(self.notice)
    }

    /// Validation applied before anything reaches the store. The editor
    /// hint is refused in every locale.
    fn validated(&self) -> Result<(String, String), ComposerError> {
        let title = self.title.trim();
        if title.is_empty()
            || self.buffer.is_blank()
            || Text::ContentPlaceholder.matches_any_locale(self.buffer.plain_text().trim())
        {
            return Err(ComposerError::EmptySubmission);
        }
        Ok((title.to_string(), self.buffer.to_html()))
    }

    /// Post the title and content through the feed.
    ///
    /// On success title and buffer are cleared. On failure both are kept
    /// so the user can retry.
    pub async fn submit(&mut self, feed: &FeedStore) -> Result<Uuid, ComposerError> {
        let (title, content) = self.validated()?;
        if feed.current_identity().is_none() {
            return Err(ComposerError::LoginRequired);
        }

        let id = feed.append(&title, &content).await?;
        self.title.clear();
        self.buffer.clear();
        self.notice = None;
        info!(post_id = %id, "composer submitted");
        Ok(id)
    }
}
