//! Story generation command handler.

use super::GenerateArgs;
use masal::{
    AppState, CooldownGate, GeminiClient, Generators, JsonFileStore, MasalConfig, MasalResult,
    PipelineError, PipelineErrorKind, PipelineOptions, QuotaLedger, StorySession,
    UserInputBuilder, export_story,
};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Run one story request end to end and write the result to disk.
pub async fn generate_story(
    args: GenerateArgs,
    config: &MasalConfig,
    ledger: QuotaLedger<JsonFileStore>,
) -> MasalResult<()> {
    let mut input = UserInputBuilder::default();
    input
        .child_name(args.name)
        .age_group(args.age)
        .gender(args.gender)
        .theme(args.theme)
        .advice(args.advice);
    if let Some(hair) = args.hair {
        input.hair_color(hair);
    }
    if let Some(eye) = args.eye {
        input.eye_color(eye);
    }
    let input = input.build()?;

    let client = Arc::new(GeminiClient::from_config(config, args.tier.as_deref())?);
    let session = StorySession::new(
        ledger,
        CooldownGate::new(),
        Generators::from_provider(client),
        PipelineOptions::with_cooldown(config.cooldown.clone()),
    )?;

    let mut updates = session.subscribe();
    let reporter = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let state = updates.borrow_and_update().clone();
            if state.is_generating() {
                println!("{}", state);
            }
        }
    });

    let outcome = session.submit(&input).await;
    let next = session.return_home();
    drop(session);
    join_reporter(reporter).await;

    let story = match outcome {
        Ok(AppState::Reading { story }) => story,
        Ok(AppState::Error { message }) => {
            return Err(PipelineError::new(PipelineErrorKind::GenerationFailed(message)).into());
        }
        Ok(other) => {
            return Err(PipelineError::new(PipelineErrorKind::GenerationFailed(format!(
                "unexpected final state: {}",
                other
            )))
            .into());
        }
        Err(rejection) => {
            println!("{}", rejection);
            return Ok(());
        }
    };

    let summary = export_story(&story, &args.out)?;
    info!(dir = %args.out.display(), "Story written");

    println!("\"{}\" ({} pages)", story.title, story.page_count());
    println!("  {}", summary.story_file.display());
    for path in summary.images.iter().chain(&summary.audio) {
        println!("  {}", path.display());
    }
    if summary.linked_images > 0 {
        println!(
            "  {} illustration(s) unavailable, links in images.txt",
            summary.linked_images
        );
    }
    if let AppState::Cooldown { seconds_left } = next {
        println!("Next story can be started in {}s.", seconds_left);
    }

    Ok(())
}

/// Wait for the progress printer; returns false if it panicked or was cancelled.
async fn join_reporter(reporter: JoinHandle<()>) -> bool {
    match reporter.await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Progress reporter stopped abnormally");
            false
        }
    }
}
