//! The story document produced by the generation pipeline.

use serde::{Deserialize, Serialize};

/// One page of a story.
///
/// Text generation creates the page without assets; the pipeline fills
/// `image_url` and `audio_base64` exactly once each.
///
/// # Examples
///
/// ```
/// use masal_core::StoryPage;
///
/// let json = r#"{"pageNumber": 1, "text": "Bir varmış...", "imagePrompt": "a rocket"}"#;
/// let page: StoryPage = serde_json::from_str(json).unwrap();
/// assert_eq!(page.page_number, 1);
/// assert!(page.image_url.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryPage {
    /// 1-based position of the page in the book
    pub page_number: u32,
    /// Story text shown and narrated on this page
    pub text: String,
    /// English prompt used to illustrate this page
    pub image_prompt: String,
    /// Illustration, populated after generation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Narration as base64 PCM, populated after generation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_base64: Option<String>,
}

/// A complete story: title, cover and ordered pages.
///
/// The number of pages is fixed once text generation returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryData {
    /// Story title
    pub title: String,
    /// Two-sentence summary
    pub summary: String,
    /// English prompt used to illustrate the cover
    pub cover_image_prompt: String,
    /// Cover illustration, populated after generation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
    /// Pages in reading order
    pub pages: Vec<StoryPage>,
}

impl StoryData {
    /// Number of pages in the story.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Number of asset tasks needed to illustrate and narrate the story.
    ///
    /// One illustration and one narration per page, plus the cover.
    ///
    /// # Examples
    ///
    /// ```
    /// use masal_core::StoryData;
    ///
    /// let story = StoryData {
    ///     title: "t".into(),
    ///     summary: "s".into(),
    ///     cover_image_prompt: "c".into(),
    ///     cover_image_url: None,
    ///     pages: vec![],
    /// };
    /// assert_eq!(story.asset_task_count(), 1);
    /// ```
    pub fn asset_task_count(&self) -> usize {
        self.pages.len() * 2 + 1
    }

    /// Returns true once the cover and every page carry an illustration.
    pub fn is_illustrated(&self) -> bool {
        self.cover_image_url.is_some() && self.pages.iter().all(|p| p.image_url.is_some())
    }
}
