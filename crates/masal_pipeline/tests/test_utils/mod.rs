//! Scripted generation backends for session tests.

#![allow(dead_code)]

use async_trait::async_trait;
use masal_core::{AudioPayload, ImageRef, StoryData, StoryPage, UserInput};
use masal_error::{GeminiError, GeminiErrorKind, MasalResult, PipelineError, PipelineErrorKind};
use masal_interface::{Illustrator, Narrator, StoryWriter};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub fn page(number: u32) -> StoryPage {
    StoryPage {
        page_number: number,
        text: format!("Sayfa {} metni.", number),
        image_prompt: format!("image {}", number),
        image_url: None,
        audio_base64: None,
    }
}

/// A story with the given page numbers, in the given order.
pub fn story_with_pages(numbers: &[u32]) -> StoryData {
    StoryData {
        title: "Ayşe ve Yıldız Tozu".to_string(),
        summary: "Ayşe uzaya gider. Yıldızlarla arkadaş olur.".to_string(),
        cover_image_prompt: "cover".to_string(),
        cover_image_url: None,
        pages: numbers.iter().copied().map(page).collect(),
    }
}

fn overloaded() -> GeminiError {
    GeminiError::new(GeminiErrorKind::HttpError {
        status_code: 503,
        message: "overloaded".to_string(),
    })
}

/// Backend serving all three roles from a script.
#[derive(Debug)]
pub struct ScriptedGenerator {
    story: Option<StoryData>,
    fail_images: bool,
    fail_audio: bool,
    delays: Vec<(String, Duration)>,
    story_calls: AtomicUsize,
    image_calls: AtomicUsize,
    audio_calls: AtomicUsize,
    image_prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new(story: StoryData) -> Self {
        Self {
            story: Some(story),
            fail_images: false,
            fail_audio: false,
            delays: Vec::new(),
            story_calls: AtomicUsize::new(0),
            image_calls: AtomicUsize::new(0),
            audio_calls: AtomicUsize::new(0),
            image_prompts: Mutex::new(Vec::new()),
        }
    }

    /// Story text generation always fails.
    pub fn failing_story() -> Self {
        let mut generator = Self::new(story_with_pages(&[1]));
        generator.story = None;
        generator
    }

    pub fn failing_images(mut self) -> Self {
        self.fail_images = true;
        self
    }

    pub fn failing_audio(mut self) -> Self {
        self.fail_audio = true;
        self
    }

    /// Delay image requests whose prompt contains `needle`.
    pub fn delay_images(mut self, needle: &str, delay: Duration) -> Self {
        self.delays.push((needle.to_string(), delay));
        self
    }

    pub fn story_calls(&self) -> usize {
        self.story_calls.load(Ordering::SeqCst)
    }

    pub fn image_calls(&self) -> usize {
        self.image_calls.load(Ordering::SeqCst)
    }

    pub fn audio_calls(&self) -> usize {
        self.audio_calls.load(Ordering::SeqCst)
    }

    pub fn image_prompts(&self) -> Vec<String> {
        self.image_prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl StoryWriter for ScriptedGenerator {
    async fn write_story(&self, _input: &UserInput) -> MasalResult<StoryData> {
        self.story_calls.fetch_add(1, Ordering::SeqCst);
        match &self.story {
            Some(story) => Ok(story.clone()),
            None => Err(PipelineError::new(PipelineErrorKind::GenerationFailed(
                "malformed JSON".to_string(),
            ))
            .into()),
        }
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }
}

#[async_trait]
impl Illustrator for ScriptedGenerator {
    async fn illustrate(&self, prompt: &str) -> MasalResult<ImageRef> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        self.image_prompts.lock().unwrap().push(prompt.to_string());

        if let Some((_, delay)) = self.delays.iter().find(|(needle, _)| prompt.contains(needle)) {
            tokio::time::sleep(*delay).await;
        }
        if self.fail_images {
            Err(overloaded())?
        }
        let subject = prompt.split(" . ").next().unwrap_or_default();
        Ok(ImageRef::remote(format!("https://img.test/{}", subject.replace(' ', "-"))))
    }
}

#[async_trait]
impl Narrator for ScriptedGenerator {
    async fn narrate(&self, text: &str) -> MasalResult<AudioPayload> {
        self.audio_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_audio {
            Err(overloaded())?
        }
        Ok(AudioPayload::from_base64(format!("pcm:{}", text)))
    }
}
