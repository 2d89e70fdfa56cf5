//! Tests for writing a finished story to disk.

use masal::{ImageRef, StoryData, StoryPage, export_story};

fn story() -> StoryData {
    let page = |number: u32, image: ImageRef, audio: Option<&str>| StoryPage {
        page_number: number,
        text: format!("Sayfa {}", number),
        image_prompt: format!("image {}", number),
        image_url: Some(image.into_string()),
        audio_base64: audio.map(str::to_string),
    };

    StoryData {
        title: "Ayşe ve Yıldız Tozu".to_string(),
        summary: "Ayşe uzaya gider.".to_string(),
        cover_image_prompt: "cover".to_string(),
        cover_image_url: Some(ImageRef::inline("image/jpeg", "aW1hZ2U=").into_string()),
        pages: vec![
            page(1, ImageRef::inline("image/png", "cG5n"), Some("AAAAAA==")),
            page(2, ImageRef::placeholder(), None),
            page(3, ImageRef::inline("image/png", "cG5n"), Some("not base64!")),
        ],
    }
}

#[test]
fn writes_story_images_and_narration() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let out = dir.path().join("book");

    let story = story();
    let summary = export_story(&story, &out)?;

    assert_eq!(summary.story_file, out.join("story.json"));
    let saved: StoryData = serde_json::from_str(&std::fs::read_to_string(&summary.story_file)?)?;
    assert_eq!(saved, story);

    assert_eq!(
        summary.images,
        vec![out.join("cover.jpg"), out.join("page_1.png"), out.join("page_3.png")]
    );
    assert_eq!(std::fs::read(out.join("cover.jpg"))?, b"image");
    assert_eq!(std::fs::read(out.join("page_1.png"))?, b"png");

    assert_eq!(summary.linked_images, 1);
    let links = std::fs::read_to_string(out.join("images.txt"))?;
    assert!(links.starts_with("page_2: https://picsum.photos/"));

    assert_eq!(summary.audio, vec![out.join("page_1.wav")]);
    let wav = std::fs::read(out.join("page_1.wav"))?;
    assert_eq!(&wav[0..4], b"RIFF");
    assert_eq!(wav.len(), 44 + 4);
    assert!(!out.join("page_3.wav").exists());
    Ok(())
}

#[test]
fn story_without_links_writes_no_image_list() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let mut story = story();
    story.pages.truncate(1);

    let summary = export_story(&story, dir.path())?;

    assert_eq!(summary.linked_images, 0);
    assert!(!dir.path().join("images.txt").exists());
    Ok(())
}

#[test]
fn corrupt_inline_image_is_an_error() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let mut story = story();
    story.cover_image_url = Some("data:image/png;base64,%%%".to_string());

    assert!(export_story(&story, dir.path()).is_err());
    Ok(())
}
