//! The asset phase: cover, page illustrations and narration, all at once.

use crate::{AppState, PipelineOptions, Progress};
use futures::future::join_all;
use masal_core::{AudioPayload, StoryData};
use masal_interface::{Illustrator, Narrator};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::watch;
use tracing::{debug, instrument};

/// Counts finished asset tasks and publishes each step.
pub(crate) struct ProgressTracker<'a> {
    completed: AtomicUsize,
    total: usize,
    state: &'a watch::Sender<AppState>,
}

impl<'a> ProgressTracker<'a> {
    /// Publishes `0 / total`.
    pub(crate) fn start(total: usize, state: &'a watch::Sender<AppState>) -> Self {
        state.send_replace(AppState::GeneratingImages {
            progress: Progress::new(0, total),
        });
        Self {
            completed: AtomicUsize::new(0),
            total,
            state,
        }
    }

    /// Records one finished task, successful or not.
    pub(crate) fn finish_one(&self) -> Progress {
        let completed = self.completed.fetch_add(1, Ordering::SeqCst) + 1;
        let progress = Progress::new(completed, self.total);
        self.state.send_replace(AppState::GeneratingImages { progress });
        debug!(completed, total = self.total, "Asset task finished");
        progress
    }

    pub(crate) fn progress(&self) -> Progress {
        Progress::new(self.completed.load(Ordering::SeqCst), self.total)
    }
}

/// Fill in the cover, every page illustration and every narration.
///
/// All `2 × pages + 1` tasks run concurrently on the calling task. Failed
/// tasks yield their fallback value and still count as finished. Results
/// are merged by page position, never by completion order.
///
/// Returns the final progress, `total / total` once every task has finished.
#[instrument(skip_all, fields(title = %story.title, pages = story.page_count()))]
pub(crate) async fn illustrate_and_narrate(
    story: &mut StoryData,
    illustrator: &dyn Illustrator,
    narrator: &dyn Narrator,
    options: &PipelineOptions,
    state: &watch::Sender<AppState>,
) -> Progress {
    let tracker = ProgressTracker::start(story.asset_task_count(), state);
    let tracker = &tracker;

    let cover = async {
        let image = illustrator
            .illustrate_or_placeholder(&options.cover_prompt(&story.cover_image_prompt))
            .await;
        tracker.finish_one();
        image
    };

    let pages = join_all(story.pages.iter().map(|page| async move {
        let image = async {
            let image = illustrator
                .illustrate_or_placeholder(&options.page_prompt(&page.image_prompt))
                .await;
            tracker.finish_one();
            image
        };
        let audio = async {
            let audio = narrator.narrate_or_silence(&page.text).await;
            tracker.finish_one();
            audio
        };
        tokio::join!(image, audio)
    }));

    let (cover, pages) = tokio::join!(cover, pages);

    story.cover_image_url = Some(cover.into_string());
    for (page, (image, audio)) in story.pages.iter_mut().zip(pages) {
        page.image_url = Some(image.into_string());
        page.audio_base64 = audio.map(AudioPayload::into_base64);
    }

    let progress = tracker.progress();
    debug!(completed = progress.completed(), "Asset phase finished");
    progress
}

#[cfg(test)]
mod tests {
    use super::*;
    use masal_core::{ImageRef, StoryPage};
    use masal_error::{MasalResult, PipelineError, PipelineErrorKind};

    #[test]
    fn tracker_publishes_every_step_up_to_total() {
        let (tx, rx) = watch::channel(AppState::GeneratingStory);
        let tracker = ProgressTracker::start(3, &tx);
        assert_eq!(
            *rx.borrow(),
            AppState::GeneratingImages {
                progress: Progress::new(0, 3)
            }
        );

        let percents: Vec<u8> = (0..3).map(|_| tracker.finish_one().percent()).collect();
        assert_eq!(percents, vec![33, 66, 100]);
        assert_eq!(
            *rx.borrow(),
            AppState::GeneratingImages {
                progress: Progress::new(3, 3)
            }
        );
    }

    struct Broken;

    #[async_trait::async_trait]
    impl Illustrator for Broken {
        async fn illustrate(&self, prompt: &str) -> MasalResult<ImageRef> {
            Err(PipelineError::new(PipelineErrorKind::MissingImage(prompt.to_string())).into())
        }
    }

    #[async_trait::async_trait]
    impl Narrator for Broken {
        async fn narrate(&self, text: &str) -> MasalResult<AudioPayload> {
            Err(PipelineError::new(PipelineErrorKind::MissingAudio(text.to_string())).into())
        }
    }

    fn three_page_story() -> StoryData {
        StoryData {
            title: "Deniz Feneri".to_string(),
            summary: "Bir fener bekçisi.".to_string(),
            cover_image_prompt: "lighthouse".to_string(),
            cover_image_url: None,
            pages: (1..=3)
                .map(|n| StoryPage {
                    page_number: n,
                    text: format!("Sayfa {}", n),
                    image_prompt: format!("wave {}", n),
                    image_url: None,
                    audio_base64: None,
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn failed_tasks_still_complete_the_progress() {
        let mut story = three_page_story();
        let (tx, rx) = watch::channel(AppState::GeneratingStory);

        let progress = illustrate_and_narrate(
            &mut story,
            &Broken,
            &Broken,
            &PipelineOptions::default(),
            &tx,
        )
        .await;

        assert_eq!(progress, Progress::new(7, 7));
        assert_eq!(progress.percent(), 100);
        assert_eq!(*rx.borrow(), AppState::GeneratingImages { progress });
        assert!(story.cover_image_url.is_some());
        assert!(story.pages.iter().all(|p| p.image_url.is_some()));
        assert!(story.pages.iter().all(|p| p.audio_base64.is_none()));
    }

    #[test]
    fn tracker_never_reports_past_total() {
        let (tx, _rx) = watch::channel(AppState::GeneratingStory);
        let tracker = ProgressTracker::start(1, &tx);
        tracker.finish_one();
        assert!(tracker.finish_one().is_complete());
        assert_eq!(tracker.finish_one().percent(), 100);
    }
}
