//! Writing a finished story to disk.

use base64::{Engine, engine::general_purpose::STANDARD};
use masal_core::{AudioPayload, ImageRef, StoryData};
use masal_error::{
    JsonError, MasalResult, PipelineError, PipelineErrorKind, StorageError, StorageErrorKind,
};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, warn};

/// Files written by [`export_story`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// The story document as JSON
    pub story_file: PathBuf,
    /// Decoded illustrations, cover first
    pub images: Vec<PathBuf>,
    /// Narrations as WAV files, in page order
    pub audio: Vec<PathBuf>,
    /// Illustrations that are links rather than inline data, listed in `images.txt`
    pub linked_images: usize,
}

fn extension_for(mime: &str) -> &'static str {
    match mime {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "bin",
    }
}

fn write_file(path: &Path, contents: &[u8]) -> MasalResult<()> {
    std::fs::write(path, contents).map_err(|e| {
        StorageError::new(StorageErrorKind::FileWrite(format!(
            "{}: {}",
            path.display(),
            e
        )))
        .into()
    })
}

/// Write `story` into `dir`.
///
/// Produces `story.json`, one image file per inline illustration
/// (`cover.png`, `page_1.png`, ...), `images.txt` listing illustrations that
/// are links, and `page_N.wav` for every narrated page. Narration that cannot
/// be decoded is skipped with a warning.
///
/// # Errors
///
/// Returns an error if the directory or a file cannot be written, or an
/// inline illustration is not valid base64.
#[instrument(skip(story), fields(title = %story.title))]
pub fn export_story(story: &StoryData, dir: &Path) -> MasalResult<ExportSummary> {
    std::fs::create_dir_all(dir).map_err(|e| {
        StorageError::new(StorageErrorKind::DirectoryCreation(format!(
            "{}: {}",
            dir.display(),
            e
        )))
    })?;

    let mut summary = ExportSummary {
        story_file: dir.join("story.json"),
        ..ExportSummary::default()
    };

    let json = serde_json::to_string_pretty(story).map_err(|e| JsonError::new("story document", e.to_string()))?;
    write_file(&summary.story_file, json.as_bytes())?;

    let illustrations = std::iter::once(("cover".to_string(), story.cover_image_url.as_deref()))
        .chain(
            story
                .pages
                .iter()
                .map(|page| (format!("page_{}", page.page_number), page.image_url.as_deref())),
        );

    let mut links = Vec::new();
    for (name, url) in illustrations {
        let Some(url) = url else { continue };
        let image = ImageRef::remote(url);
        match image.inline_data() {
            Some((mime, data)) => {
                let bytes = STANDARD.decode(data.trim()).map_err(|e| {
                    PipelineError::new(PipelineErrorKind::InvalidMedia(format!(
                        "{} is not valid base64: {}",
                        name, e
                    )))
                })?;
                let path = dir.join(format!("{}.{}", name, extension_for(mime)));
                write_file(&path, &bytes)?;
                summary.images.push(path);
            }
            None => links.push(format!("{}: {}", name, url)),
        }
    }
    if !links.is_empty() {
        summary.linked_images = links.len();
        write_file(&dir.join("images.txt"), (links.join("\n") + "\n").as_bytes())?;
    }

    for page in &story.pages {
        let Some(audio) = &page.audio_base64 else {
            continue;
        };
        match AudioPayload::from_base64(audio.as_str()).to_wav() {
            Ok(wav) => {
                let path = dir.join(format!("page_{}.wav", page.page_number));
                write_file(&path, &wav)?;
                summary.audio.push(path);
            }
            Err(e) => warn!(page = page.page_number, error = %e, "Skipping narration"),
        }
    }

    debug!(
        images = summary.images.len(),
        audio = summary.audio.len(),
        linked = summary.linked_images,
        "Story exported"
    );
    Ok(summary)
}
