//! States published to the presentation layer.

use masal_core::StoryData;
use masal_quota::QuotaStatus;

/// Message shown for any fatal pipeline failure. Details go to the log only.
pub const GENERIC_FAILURE_MESSAGE: &str =
    "Something went wrong while creating your story. Please try again.";

/// Completed asset tasks out of the total.
///
/// # Examples
///
/// ```
/// use masal_pipeline::Progress;
///
/// assert_eq!(Progress::new(3, 11).percent(), 27);
/// assert_eq!(Progress::new(0, 0).percent(), 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_getters::Getters)]
pub struct Progress {
    completed: usize,
    total: usize,
}

impl Progress {
    /// Creates a progress report. `completed` is capped at `total`.
    pub fn new(completed: usize, total: usize) -> Self {
        Self {
            completed: completed.min(total),
            total,
        }
    }

    /// Completion in whole percent, 0 to 100.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        (self.completed * 100 / self.total) as u8
    }

    /// Returns true once every task has finished.
    pub fn is_complete(&self) -> bool {
        self.completed == self.total
    }
}

/// Where a story session currently is.
///
/// Each variant carries only the data valid in that state.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum AppState {
    /// Waiting for a story request.
    #[display("Ready ({} stories left)", quota.remaining())]
    Input {
        /// Quota at the time the state was entered
        quota: QuotaStatus,
    },
    /// Writing the story text.
    #[display("Writing the story")]
    GeneratingStory,
    /// Illustrating and narrating the pages.
    #[display("Illustrating ({}%)", progress.percent())]
    GeneratingImages {
        /// Asset tasks finished so far
        progress: Progress,
    },
    /// The finished story.
    #[display("Reading \"{}\"", story.title)]
    Reading {
        /// Story with every asset filled in
        story: StoryData,
    },
    /// Waiting for the post-generation cooldown.
    #[display("Next story in {}s", seconds_left)]
    Cooldown {
        /// Whole seconds until the cooldown ends
        seconds_left: u64,
    },
    /// Generation failed.
    #[display("{}", message)]
    Error {
        /// User-facing message
        message: String,
    },
}

impl AppState {
    /// Returns true while a story is being generated.
    pub fn is_generating(&self) -> bool {
        matches!(
            self,
            AppState::GeneratingStory | AppState::GeneratingImages { .. }
        )
    }

    /// The finished story, if this is the reading state.
    pub fn story(&self) -> Option<&StoryData> {
        match self {
            AppState::Reading { story } => Some(story),
            _ => None,
        }
    }
}
