//! Inbound submission types.
//!
//! The form arrives URL-encoded with bracketed keys (`fields[goal]`), which
//! are aliased here. Every field is optional on the wire; [`SubmissionRequest`]
//! is the sanitized view the rest of the pipeline consumes.

use serde::Deserialize;
use url::form_urlencoded;

use crate::util::sanitize_text;

/// Raw form payload as posted by the calculator front end.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmissionForm {
    #[serde(default, rename = "_wpnonce")]
    pub nonce: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default, rename = "fields[metric_system]")]
    pub metric_system: Option<String>,
    #[serde(default, rename = "fields[goal]")]
    pub goal: Option<String>,
    #[serde(default, rename = "fields[gender]")]
    pub gender: Option<String>,
    #[serde(default, rename = "fields[age]")]
    pub age: Option<String>,
    #[serde(default, rename = "fields[height]")]
    pub height: Option<String>,
    #[serde(default, rename = "fields[height2]")]
    pub height2: Option<String>,
    #[serde(default, rename = "fields[weight]")]
    pub weight: Option<String>,
    #[serde(default, rename = "fields[activity]")]
    pub activity: Option<String>,
}

impl SubmissionForm {
    /// Parse a URL-encoded body leniently.
    ///
    /// Unknown keys are ignored and a repeated key keeps its last value. A body
    /// that is not URL-encoded yields no recognised fields, so it reaches the
    /// token check as a submission without a token.
    pub fn from_urlencoded(body: &[u8]) -> Self {
        let mut form = Self::default();

        for (key, value) in form_urlencoded::parse(body) {
            let slot = match key.as_ref() {
                "_wpnonce" => &mut form.nonce,
                "user_email" => &mut form.user_email,
                "result" => &mut form.result,
                "fields[metric_system]" => &mut form.metric_system,
                "fields[goal]" => &mut form.goal,
                "fields[gender]" => &mut form.gender,
                "fields[age]" => &mut form.age,
                "fields[height]" => &mut form.height,
                "fields[height2]" => &mut form.height2,
                "fields[weight]" => &mut form.weight,
                "fields[activity]" => &mut form.activity,
                _ => continue,
            };
            *slot = Some(value.into_owned());
        }

        form
    }
}

/// Sanitized profile fields. Absent fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileFields {
    pub metric_system: String,
    pub goal: String,
    pub gender: String,
    pub age: String,
    pub height: String,
    pub height2: String,
    pub weight: String,
    pub activity: String,
}

/// A sanitized submission, minus the authenticity token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionRequest {
    pub user_email: String,
    pub result: String,
    pub fields: ProfileFields,
}

fn clean(value: &Option<String>) -> String {
    value.as_deref().map(sanitize_text).unwrap_or_default()
}

impl From<&SubmissionForm> for SubmissionRequest {
    fn from(form: &SubmissionForm) -> Self {
        Self {
            user_email: clean(&form.user_email),
            result: clean(&form.result),
            fields: ProfileFields {
                metric_system: clean(&form.metric_system),
                goal: clean(&form.goal),
                gender: clean(&form.gender),
                age: clean(&form.age),
                height: clean(&form.height),
                height2: clean(&form.height2),
                weight: clean(&form.weight),
                activity: clean(&form.activity),
            },
        }
    }
}
