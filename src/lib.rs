//! # purecheck
//!
//! Industrial cleanliness checks for images using an Azure OpenAI vision
//! deployment.
//!
//! ## How it works
//!
//! - **Encode** the subject image and two reference images (one clean, one
//!   dirty) as inline `data:` URLs
//! - **Prompt** the model with a fixed few-shot layout: instructions, clean
//!   example, dirty example, subject
//! - **Call** the chat-completions endpoint once (no retries)
//! - **Extract** the JSON verdict from the reply, tolerating markdown fences
//!   and single-quoted JSON
//! - **Parse** it strictly into a [`CleanlinessVerdict`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use purecheck::{AzureConfig, CheckConfig, InferenceClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let azure = AzureConfig::new(
//!         "https://my-resource.openai.azure.com/openai/deployments/gpt-4o",
//!         "api-key",
//!         "2024-02-15-preview",
//!     );
//!     let config = CheckConfig::new(azure.clone()).image_path("part.jpg");
//!     let client = InferenceClient::new(&azure);
//!
//!     let report = purecheck::check_image(&client, &config).await?;
//!     println!("{}", report);
//!     Ok(())
//! }
//! ```
//!
//! ## Extraction
//!
//! ```rust
//! use purecheck::{extract_code, parse_verdict};
//!
//! let reply = "```json\n{'is_clean': false, 'description': 'stain'}\n```";
//! let text = extract_code(reply);
//! assert_eq!(text, r#"{"is_clean": false, "description": "stain"}"#);
//! assert!(!parse_verdict(&text).unwrap().is_clean);
//! ```

pub mod check;
pub mod client;
pub mod config;
pub mod encoder;
pub mod error;
pub mod extract;
pub mod prompt;
pub mod verdict;

// Re-export main types at crate root
pub use check::{check_image, CheckReport};
pub use client::{InferenceClient, InferenceError, InferenceResponse};
pub use config::{AzureConfig, CheckConfig, ConfigError, InferenceOptions};
pub use encoder::{encode_image, EncodeError, EncodedImage};
pub use error::{CheckError, Result};
pub use extract::{extract_code, normalize_quotes};
pub use prompt::{build_prompt, ContentPart, Message, PromptRequest, Role};
pub use verdict::{parse_verdict, CleanlinessVerdict, VerdictParseError};
