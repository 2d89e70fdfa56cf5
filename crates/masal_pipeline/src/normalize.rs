//! Checks applied to a freshly written story before any quota is spent.

use masal_core::StoryData;
use masal_error::{MasalResult, PipelineError, PipelineErrorKind};
use tracing::debug;

/// Put the pages of a generated story in reading order and check them.
///
/// Pages are sorted by page number and renumbered from 1 if the model left
/// gaps, so the returned pages are numbered `1..=n` in reading order. This is
/// the only place numbers change; the asset phase merges by position and
/// keeps them. Zero or repeated page numbers, blank page text and stories
/// without pages are rejected.
///
/// # Errors
///
/// Returns a pipeline error describing the first problem found.
///
/// # Examples
///
/// ```
/// use masal_core::{StoryData, StoryPage};
/// use masal_pipeline::normalize_story;
///
/// let page = |n: u32| StoryPage {
///     page_number: n,
///     text: format!("Sayfa {}", n),
///     image_prompt: String::new(),
///     image_url: None,
///     audio_base64: None,
/// };
/// let story = StoryData {
///     title: "t".into(),
///     summary: "s".into(),
///     cover_image_prompt: "c".into(),
///     cover_image_url: None,
///     pages: vec![page(2), page(1)],
/// };
///
/// let story = normalize_story(story).unwrap();
/// assert_eq!(story.pages[0].text, "Sayfa 1");
/// ```
pub fn normalize_story(mut story: StoryData) -> MasalResult<StoryData> {
    if story.pages.is_empty() {
        return Err(PipelineError::new(PipelineErrorKind::EmptyStory).into());
    }

    story.pages.sort_by_key(|page| page.page_number);

    let mut previous = 0;
    for page in &story.pages {
        if page.page_number == 0 || page.page_number == previous {
            return Err(
                PipelineError::new(PipelineErrorKind::InvalidPageNumber(page.page_number)).into(),
            );
        }
        if page.text.trim().is_empty() {
            return Err(PipelineError::new(PipelineErrorKind::EmptyPage(page.page_number)).into());
        }
        previous = page.page_number;
    }

    for (index, page) in story.pages.iter_mut().enumerate() {
        let expected = index as u32 + 1;
        if page.page_number != expected {
            debug!(from = page.page_number, to = expected, "Renumbering page");
            page.page_number = expected;
        }
    }

    Ok(story)
}
