//! Chat message types and the fixed few-shot prompt layout.

use serde::Serialize;

use crate::encoder::EncodedImage;

pub const DEFAULT_SYSTEM_MESSAGE: &str = "You are an assistant specialized in analyzing cleanliness in industrial engineering images. Use the provided examples to determine whether a scene is clean or not. Provide reasons if the image is not clean.";

pub const DEFAULT_USER_MESSAGE: &str = r#"Analyze the provided image for cleanliness in an industrial engineering setting.
Determine whether the scene is clean or not based on visible stains, dirt, debris, rust, or other contamination.
If the scene is not clean, provide reasons describing the observed issues in detail.
- Clean Image Example: The image is free of visible stains, dirt, debris, rust, or contamination. The surface appears uniform and smooth.
- Dirty Image Example: The image contains visible stains, debris, rust, or contamination. These might appear as discoloration, spots, or accumulations.

Return the results in the following JSON format:
{
    'is_clean': true/false,
    'description': '<reason why the scene is not clean>'
}
Ensure to mark 'is_clean' as true only if the image is entirely free of dirt, stains, or contamination.
Provide clear reasons in 'issues_detected' when 'is_clean' is false, avoiding technical jargon."#;

pub const CLEAN_EXAMPLE_LABEL: &str = "This is a clean image example:";
pub const DIRTY_EXAMPLE_LABEL: &str = "This is a dirty image example:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// URL wrapper used by `image_url` parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

/// One typed part of a message's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }

    pub fn image(image: &EncodedImage) -> Self {
        ContentPart::ImageUrl {
            image_url: ImageUrl {
                url: image.to_data_url(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub role: Role,
    pub content: Vec<ContentPart>,
}

/// Ordered chat messages sent in a single completion request.
///
/// The model keeps no state between calls, so the exemplars only mean
/// something through their position ahead of the subject image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PromptRequest {
    pub messages: Vec<Message>,
}

/// Build the four-message few-shot prompt.
///
/// Order: system instructions, clean exemplar, dirty exemplar, then the
/// user instructions with the subject image.
pub fn build_prompt(
    subject: &EncodedImage,
    clean_example: &EncodedImage,
    dirty_example: &EncodedImage,
    system_message: &str,
    user_message: &str,
) -> PromptRequest {
    let messages = vec![
        Message {
            role: Role::System,
            content: vec![ContentPart::text(system_message)],
        },
        Message {
            role: Role::User,
            content: vec![
                ContentPart::text(CLEAN_EXAMPLE_LABEL),
                ContentPart::image(clean_example),
            ],
        },
        Message {
            role: Role::User,
            content: vec![
                ContentPart::text(DIRTY_EXAMPLE_LABEL),
                ContentPart::image(dirty_example),
            ],
        },
        Message {
            role: Role::User,
            content: vec![
                ContentPart::text(user_message),
                ContentPart::image(subject),
            ],
        },
    ];
    PromptRequest { messages }
}
