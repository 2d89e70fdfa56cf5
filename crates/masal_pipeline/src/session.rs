//! The story session state machine.

use crate::assets::illustrate_and_narrate;
use crate::{AppState, GENERIC_FAILURE_MESSAGE, PipelineOptions, Progress, normalize_story};
use masal_core::{StoryData, UserInput};
use masal_error::{MasalError, MasalResult};
use masal_interface::{Illustrator, Narrator, StoryWriter};
use masal_quota::{
    Clock, CooldownGate, PromoRejection, QuotaLedger, QuotaRejection, QuotaStatus, SystemClock,
};
use masal_storage::KeyValueStore;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tracing::{error, info, instrument, warn};

/// The three generation backends a session drives.
#[derive(Clone)]
pub struct Generators {
    writer: Arc<dyn StoryWriter>,
    illustrator: Arc<dyn Illustrator>,
    narrator: Arc<dyn Narrator>,
}

impl std::fmt::Debug for Generators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generators")
            .field("writer", &self.writer.provider_name())
            .finish_non_exhaustive()
    }
}

impl Generators {
    /// Separate backends for each role.
    pub fn new(
        writer: Arc<dyn StoryWriter>,
        illustrator: Arc<dyn Illustrator>,
        narrator: Arc<dyn Narrator>,
    ) -> Self {
        Self {
            writer,
            illustrator,
            narrator,
        }
    }

    /// One backend serving all three roles.
    pub fn from_provider<P>(provider: Arc<P>) -> Self
    where
        P: StoryWriter + Illustrator + Narrator + 'static,
    {
        Self {
            writer: provider.clone(),
            illustrator: provider.clone(),
            narrator: provider,
        }
    }
}

/// Drives story requests from input to the finished book.
///
/// Every state change is published on a watch channel; see
/// [`subscribe`](Self::subscribe).
pub struct StorySession<S, C = SystemClock> {
    ledger: QuotaLedger<S, C>,
    cooldown: CooldownGate<C>,
    generators: Generators,
    options: PipelineOptions,
    state: watch::Sender<AppState>,
    asset_progress: Mutex<Option<Progress>>,
}

impl<S, C> std::fmt::Debug for StorySession<S, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorySession")
            .field("state", &*self.state.borrow())
            .field("generators", &self.generators)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<S: KeyValueStore, C: Clock> StorySession<S, C> {
    /// Starts a session in the input state.
    ///
    /// # Errors
    ///
    /// Returns an error if the quota cannot be read.
    pub fn new(
        ledger: QuotaLedger<S, C>,
        cooldown: CooldownGate<C>,
        generators: Generators,
        options: PipelineOptions,
    ) -> MasalResult<Self> {
        let quota = ledger.check_quota()?;
        let (state, _) = watch::channel(AppState::Input { quota });
        Ok(Self {
            ledger,
            cooldown,
            generators,
            options,
            state,
            asset_progress: Mutex::new(None),
        })
    }

    /// The current state.
    pub fn state(&self) -> AppState {
        self.state.borrow().clone()
    }

    /// Final progress of the most recent asset phase, if one has run.
    ///
    /// Observers of [`subscribe`](Self::subscribe) may miss intermediate
    /// steps; this is the count the phase actually ended on.
    pub fn asset_progress(&self) -> Option<Progress> {
        *self
            .asset_progress
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Receive every subsequent state change.
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.state.subscribe()
    }

    /// The quota ledger.
    pub fn ledger(&self) -> &QuotaLedger<S, C> {
        &self.ledger
    }

    /// The cooldown gate.
    pub fn cooldown(&self) -> &CooldownGate<C> {
        &self.cooldown
    }

    /// Options in force.
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Current quota.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn quota(&self) -> MasalResult<QuotaStatus> {
        self.ledger.check_quota()
    }

    fn publish(&self, state: AppState) {
        self.state.send_replace(state);
    }

    fn fail(&self, err: MasalError) -> AppState {
        error!(error = %err, "Story generation failed");
        let state = AppState::Error {
            message: GENERIC_FAILURE_MESSAGE.to_string(),
        };
        self.publish(state.clone());
        state
    }

    fn input_state(&self) -> AppState {
        match self.ledger.check_quota() {
            Ok(quota) => AppState::Input { quota },
            Err(e) => {
                error!(error = %e, "Could not read quota");
                AppState::Error {
                    message: GENERIC_FAILURE_MESSAGE.to_string(),
                }
            }
        }
    }

    /// Create a story for `input`.
    ///
    /// Refuses without any state change when the quota is exhausted.
    /// Otherwise returns the final state: [`AppState::Reading`] with the
    /// finished story, or [`AppState::Error`] with a generic message when
    /// the story text could not be produced. Quota is consumed only once the
    /// story text is in hand.
    #[instrument(skip(self, input), fields(age_group = %input.age_group(), theme = %input.theme()))]
    pub async fn submit(&self, input: &UserInput) -> Result<AppState, QuotaRejection> {
        let quota = match self.ledger.check_quota() {
            Ok(quota) => quota,
            Err(e) => return Ok(self.fail(e)),
        };
        if quota.is_exhausted() {
            info!(reset_time = ?quota.reset_time(), "Story request refused, quota exhausted");
            return Err(QuotaRejection::QuotaExhausted {
                reset_time: *quota.reset_time(),
            });
        }

        self.publish(AppState::GeneratingStory);
        match self.generate(input).await {
            Ok(story) => {
                info!(title = %story.title, pages = story.page_count(), "Story ready");
                let state = AppState::Reading { story };
                self.publish(state.clone());
                Ok(state)
            }
            Err(e) => Ok(self.fail(e)),
        }
    }

    async fn generate(&self, input: &UserInput) -> MasalResult<StoryData> {
        let story = self.generators.writer.write_story(input).await?;
        let mut story = normalize_story(story)?;

        let quota = self.ledger.decrement_quota()?;
        info!(remaining = quota.remaining(), "Story credit consumed");
        self.cooldown.arm(self.options.cooldown().duration());

        let progress = illustrate_and_narrate(
            &mut story,
            self.generators.illustrator.as_ref(),
            self.generators.narrator.as_ref(),
            &self.options,
            &self.state,
        )
        .await;
        *self
            .asset_progress
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(progress);

        Ok(story)
    }

    /// Leave the current story.
    ///
    /// Goes to [`AppState::Cooldown`] while the gate is locked, otherwise to
    /// [`AppState::Input`] with freshly checked quota.
    pub fn return_home(&self) -> AppState {
        let seconds_left = self.cooldown.seconds_left();
        let state = if seconds_left > 0 {
            AppState::Cooldown { seconds_left }
        } else {
            self.input_state()
        };
        self.publish(state.clone());
        state
    }

    /// Count the cooldown down, then return to the input state.
    #[instrument(skip(self))]
    pub async fn wait_out_cooldown(&self) -> AppState {
        self.cooldown
            .countdown(self.options.cooldown().tick(), |seconds_left| {
                self.publish(AppState::Cooldown { seconds_left })
            })
            .await;

        let state = self.input_state();
        self.publish(state.clone());
        state
    }

    /// Redeem a promo code.
    ///
    /// A successful redemption while waiting for input republishes the input
    /// state with the new quota.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    #[instrument(skip(self, code))]
    pub fn apply_promo(&self, code: &str) -> MasalResult<Result<QuotaStatus, PromoRejection>> {
        let outcome = self.ledger.apply_promo(code)?;
        match &outcome {
            Ok(quota) => {
                let waiting = matches!(*self.state.borrow(), AppState::Input { .. });
                if waiting {
                    self.publish(AppState::Input { quota: *quota });
                }
            }
            Err(rejection) => warn!(%rejection, "Promo code refused"),
        }
        Ok(outcome)
    }
}
