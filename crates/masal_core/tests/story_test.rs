use masal_core::{AudioPayload, ImageRef, PLACEHOLDER_IMAGE_BASE, StoryData};

const STORY_JSON: &str = r#"{
    "title": "Ayşe ve Yıldızlar",
    "summary": "Ayşe uzaya gider. Yeni arkadaşlar edinir.",
    "coverImagePrompt": "A girl in a rocket",
    "pages": [
        {"pageNumber": 1, "text": "Bir varmış bir yokmuş.", "imagePrompt": "A rocket"},
        {"pageNumber": 2, "text": "Ayşe yıldızlara uçmuş.", "imagePrompt": "Stars"}
    ]
}"#;

#[test]
fn story_parses_camel_case_fields() -> anyhow::Result<()> {
    let story: StoryData = serde_json::from_str(STORY_JSON)?;

    assert_eq!(story.title, "Ayşe ve Yıldızlar");
    assert_eq!(story.page_count(), 2);
    assert_eq!(story.asset_task_count(), 5);
    assert!(story.cover_image_url.is_none());
    assert!(!story.is_illustrated());
    Ok(())
}

#[test]
fn filled_assets_serialize_camel_case() -> anyhow::Result<()> {
    let mut story: StoryData = serde_json::from_str(STORY_JSON)?;
    story.cover_image_url = Some("cover".into());
    for page in &mut story.pages {
        page.image_url = Some("img".into());
        page.audio_base64 = Some("AAAA".into());
    }

    let json = serde_json::to_string(&story)?;
    assert!(json.contains("\"coverImageUrl\":\"cover\""));
    assert!(json.contains("\"audioBase64\":\"AAAA\""));
    assert!(story.is_illustrated());
    Ok(())
}

#[test]
fn placeholders_are_unique_and_recognizable() {
    let a = ImageRef::placeholder();
    let b = ImageRef::placeholder();

    assert!(a.as_str().starts_with(PLACEHOLDER_IMAGE_BASE));
    assert!(a.is_placeholder());
    assert_ne!(a, b);
    assert!(a.inline_data().is_none());
}

#[test]
fn inline_images_are_data_uris() {
    let image = ImageRef::inline("image/png", "QUJD");
    assert!(!image.is_placeholder());
    assert_eq!(image.inline_data(), Some(("image/png", "QUJD")));
    assert_eq!(image.to_string(), "data:image/png;base64,QUJD");
}

#[test]
fn audio_decodes_to_pcm_and_wav() -> anyhow::Result<()> {
    // "AQIDBA==" is [1, 2, 3, 4]
    let audio = AudioPayload::from_base64("AQIDBA==");
    assert_eq!(audio.decode_pcm()?, vec![1, 2, 3, 4]);

    let wav = audio.to_wav()?;
    assert_eq!(wav.len(), 48);
    assert_eq!(&wav[0..4], b"RIFF");
    assert_eq!(&wav[36..40], b"data");
    assert_eq!(&wav[44..], &[1, 2, 3, 4]);
    Ok(())
}
