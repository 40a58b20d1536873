use std::fmt;
use std::path::PathBuf;

use crate::client::InferenceClient;
use crate::config::CheckConfig;
use crate::encoder::encode_image;
use crate::error::Result;
use crate::extract::extract_code;
use crate::prompt::build_prompt;
use crate::verdict::{parse_verdict, CleanlinessVerdict, VerdictParseError};

/// Result of one check that reached the model.
#[derive(Debug)]
pub struct CheckReport {
    pub image_path: PathBuf,
    /// First choice's text as returned by the model
    pub raw_response: String,
    /// Parsed verdict, or the parse failure with the offending text
    pub outcome: std::result::Result<CleanlinessVerdict, VerdictParseError>,
}

impl CheckReport {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn verdict(&self) -> Option<&CleanlinessVerdict> {
        self.outcome.as_ref().ok()
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Ok(verdict) => {
                let json = verdict.to_pretty_json().map_err(|_| fmt::Error)?;
                write!(f, "API Response: {} {}", self.image_path.display(), json)
            }
            Err(err) => {
                writeln!(f, "JSON parsing error: {}", err)?;
                write!(f, "Original content: {}", err.raw)
            }
        }
    }
}

/// Run one cleanliness check: encode, prompt, call, extract, parse.
///
/// # Errors
///
/// Image read and inference failures abort the check. A reply that is not
/// a valid verdict still yields `Ok`, with the failure in
/// [`CheckReport::outcome`].
pub async fn check_image(client: &InferenceClient, config: &CheckConfig) -> Result<CheckReport> {
    log::info!("Checking {}", config.image_path.display());

    let subject = encode_image(&config.image_path)?;
    let clean = encode_image(&config.clean_example)?;
    let dirty = encode_image(&config.dirty_example)?;

    let prompt = build_prompt(
        &subject,
        &clean,
        &dirty,
        &config.system_message,
        &config.user_message,
    );

    let response = client.complete(&prompt, &config.options).await?;
    let raw_response = response.first_text().unwrap_or_default().to_string();

    let outcome = parse_verdict(&extract_code(&raw_response));
    match &outcome {
        Ok(verdict) => log::info!(
            "{}: is_clean={}",
            config.image_path.display(),
            verdict.is_clean
        ),
        Err(err) => log::warn!("Could not parse verdict: {}", err),
    }

    Ok(CheckReport {
        image_path: config.image_path.clone(),
        raw_response,
        outcome,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(outcome: std::result::Result<CleanlinessVerdict, VerdictParseError>) -> CheckReport {
        CheckReport {
            image_path: PathBuf::from("dirty_images/img1.JPEG"),
            raw_response: String::new(),
            outcome,
        }
    }

    #[test]
    fn display_success() {
        let verdict = parse_verdict(r#"{"is_clean": false, "description": "oil film"}"#).unwrap();
        let r = report(Ok(verdict));
        assert!(r.is_success());
        assert_eq!(
            r.to_string(),
            "API Response: dirty_images/img1.JPEG {\n    \"is_clean\": false,\n    \"description\": \"oil film\"\n}"
        );
    }

    #[test]
    fn display_failure_echoes_raw_text() {
        let err = parse_verdict("not json at all").unwrap_err();
        let r = report(Err(err));
        assert!(!r.is_success());
        assert!(r.verdict().is_none());
        let text = r.to_string();
        assert!(text.starts_with("JSON parsing error: "));
        assert!(text.ends_with("Original content: not json at all"));
    }
}
