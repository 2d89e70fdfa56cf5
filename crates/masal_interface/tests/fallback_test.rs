use async_trait::async_trait;
use masal_core::{AudioPayload, ImageRef};
use masal_error::{GeminiError, GeminiErrorKind, MasalResult};
use masal_interface::{Illustrator, Narrator};

struct Flaky {
    fail: bool,
}

fn unavailable() -> GeminiError {
    GeminiError::new(GeminiErrorKind::HttpError {
        status_code: 503,
        message: "overloaded".to_string(),
    })
}

#[async_trait]
impl Illustrator for Flaky {
    async fn illustrate(&self, prompt: &str) -> MasalResult<ImageRef> {
        if self.fail {
            Err(unavailable())?
        }
        Ok(ImageRef::inline("image/png", prompt))
    }
}

#[async_trait]
impl Narrator for Flaky {
    async fn narrate(&self, _text: &str) -> MasalResult<AudioPayload> {
        if self.fail {
            Err(unavailable())?
        }
        Ok(AudioPayload::from_base64("AAAA"))
    }
}

#[tokio::test]
async fn illustration_falls_back_to_placeholder() {
    let failing = Flaky { fail: true };
    let image = failing.illustrate_or_placeholder("a cat").await;
    assert!(image.is_placeholder());

    let working = Flaky { fail: false };
    let image = working.illustrate_or_placeholder("Y2F0").await;
    assert_eq!(image.as_str(), "data:image/png;base64,Y2F0");
}

#[tokio::test]
async fn narration_falls_back_to_silence() {
    let failing = Flaky { fail: true };
    assert!(failing.narrate_or_silence("merhaba").await.is_none());

    let working = Flaky { fail: false };
    let audio = working.narrate_or_silence("merhaba").await;
    assert_eq!(audio.map(|a| a.into_base64()), Some("AAAA".to_string()));
}

#[tokio::test]
async fn traits_are_object_safe() {
    let illustrator: Box<dyn Illustrator> = Box::new(Flaky { fail: true });
    assert!(illustrator.illustrate("x").await.is_err());

    let narrator: Box<dyn Narrator> = Box::new(Flaky { fail: false });
    assert!(narrator.narrate("x").await.is_ok());
}
