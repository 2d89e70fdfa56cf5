//! Story prompt construction.

use masal_core::{Gender, UserInput};
use serde_json::{Value, json};

/// Visual style every illustration prompt must carry.
const ILLUSTRATION_STYLE: &str = "Whimsical digital illustration, soft colors, Pixar style 3D render";

/// Build the story-writing prompt for `input`.
///
/// The story is written in Turkish; image prompts are requested in English
/// with the hero's appearance repeated in each one.
///
/// # Examples
///
/// ```
/// use masal_core::{AgeGroup, UserInputBuilder};
/// use masal_models::build_story_prompt;
///
/// let input = UserInputBuilder::default()
///     .child_name("Ayşe")
///     .age_group(AgeGroup::Toddler)
///     .theme("Uzay Macerası")
///     .build()
///     .unwrap();
///
/// let prompt = build_story_prompt(&input, 5);
/// assert!(prompt.contains("Ayşe"));
/// assert!(prompt.contains("tam olarak 5 sayfa"));
/// ```
pub fn build_story_prompt(input: &UserInput, page_count: u32) -> String {
    let appearance = input
        .appearance()
        .unwrap_or_else(|| default_appearance(input));

    let traits = [
        input.hair_color().as_ref().map(|h| format!("Saç: {}", h)),
        input.eye_color().as_ref().map(|e| format!("Göz: {}", e)),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(", ");

    let advice = if input.advice().trim().is_empty() {
        "-"
    } else {
        input.advice().trim()
    };

    format!(
        "Sen profesyonel bir çocuk kitabı yazarı ve sanat yönetmenisin.\n\
         Aşağıdaki bilgilerle bir çocuk masalı yaz:\n\
         \n\
         - Kahramanın adı: {name}\n\
         - Yaş grubu: {age}\n\
         - Cinsiyet: {gender}\n\
         - Tema: {theme}\n\
         - Öğüt: {advice}\n\
         - Fiziksel özellikler: {traits}\n\
         \n\
         KURALLAR:\n\
         1. Masal TÜRKÇE yazılmalı.\n\
         2. Dil ve anlatım bu yaş grubuna uygun olmalı: {guidelines}\n\
         3. Korku, şiddet veya kötü örnek içermemeli.\n\
         4. Masal tam olarak {pages} sayfa olmalı.\n\
         5. Her sayfa için bir \"imagePrompt\" yaz.\n\
         6. Kitap kapağı için bir \"coverImagePrompt\" yaz.\n\
         7. Görsel istemleri İNGİLİZCE olmalı, sahneyi ayrıntılı betimlemeli ve \"{style}\" stilini belirtmeli.\n\
         8. ÖNEMLİ: Her görsel isteminde karakterin görünüşünü ({appearance}) aynı şekilde tekrar et.\n\
         \n\
         Yanıtı JSON olarak ver.",
        name = input.child_name().trim(),
        age = input.age_group(),
        gender = gender_label(*input.gender()),
        theme = input.theme().trim(),
        advice = advice,
        traits = if traits.is_empty() { "-" } else { traits.as_str() },
        guidelines = input.age_group().writing_guidelines(),
        pages = page_count,
        style = ILLUSTRATION_STYLE,
        appearance = appearance,
    )
}

fn gender_label(gender: Gender) -> &'static str {
    match gender {
        Gender::Girl => "Kız",
        Gender::Boy => "Erkek",
        Gender::Unspecified => "Belirtilmedi",
    }
}

/// English description used when no hair or eye color was given.
fn default_appearance(input: &UserInput) -> String {
    let who = match input.gender() {
        Gender::Girl => "girl",
        Gender::Boy => "boy",
        Gender::Unspecified => "child",
    };
    format!("a {} year old {}", input.age_group(), who)
}

/// JSON response schema for the story model.
///
/// Every field is required so a conforming response always deserializes
/// into a [`StoryData`](masal_core::StoryData).
pub fn story_response_schema(page_count: u32) -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING", "description": "Masalın başlığı" },
            "summary": { "type": "STRING", "description": "Masalın iki cümlelik özeti" },
            "coverImagePrompt": {
                "type": "STRING",
                "description": "Kitap kapağı için İngilizce görsel istemi"
            },
            "pages": {
                "type": "ARRAY",
                "description": format!("Masalın sayfaları (toplam {} adet)", page_count),
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "pageNumber": { "type": "INTEGER" },
                        "text": { "type": "STRING", "description": "Sayfanın Türkçe metni" },
                        "imagePrompt": {
                            "type": "STRING",
                            "description": "Sayfanın İngilizce görsel istemi"
                        }
                    },
                    "required": ["pageNumber", "text", "imagePrompt"]
                }
            }
        },
        "required": ["title", "summary", "coverImagePrompt", "pages"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use masal_core::{AgeGroup, UserInputBuilder};

    fn input() -> UserInput {
        UserInputBuilder::default()
            .child_name("Can")
            .age_group(AgeGroup::Child)
            .gender(Gender::Boy)
            .theme("Orman")
            .advice("Paylaşmak güzeldir")
            .hair_color("black")
            .build()
            .unwrap()
    }

    #[test]
    fn prompt_carries_request_and_rules() {
        let prompt = build_story_prompt(&input(), 4);

        assert!(prompt.contains("Kahramanın adı: Can"));
        assert!(prompt.contains("Yaş grubu: 6-8"));
        assert!(prompt.contains("Cinsiyet: Erkek"));
        assert!(prompt.contains("Öğüt: Paylaşmak güzeldir"));
        assert!(prompt.contains("80-100"));
        assert!(prompt.contains("tam olarak 4 sayfa"));
        assert!(prompt.contains(ILLUSTRATION_STYLE));
        assert!(prompt.contains("(black hair)"));
    }

    #[test]
    fn prompt_falls_back_to_age_and_gender_for_appearance() {
        let input = UserInputBuilder::default()
            .child_name("Deniz")
            .age_group(AgeGroup::PreTeen)
            .theme("Deniz altı")
            .build()
            .unwrap();

        let prompt = build_story_prompt(&input, 5);
        assert!(prompt.contains("(a 9+ year old child)"));
        assert!(prompt.contains("Fiziksel özellikler: -"));
    }

    #[test]
    fn schema_requires_all_story_fields() {
        let schema = story_response_schema(5);
        assert_eq!(
            schema["required"],
            json!(["title", "summary", "coverImagePrompt", "pages"])
        );
        assert_eq!(
            schema["properties"]["pages"]["items"]["required"],
            json!(["pageNumber", "text", "imagePrompt"])
        );
    }
}
