// src/extraction/models.rs
//! Candidate profile data model, serialized with the camelCase keys the
//! extraction prompt demands from the model.

use serde::{Deserialize, Serialize};

/// One work-history entry, in resume order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CvExperience {
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    /// Bullet points; empty lines entered in the editor are preserved as
    /// empty strings.
    #[serde(default)]
    pub description: Vec<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CvEducation {
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub degree: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

/// The single entity of consequence: structured resume data.
///
/// Scalar fields may be null when the source document omits them; list
/// fields are always present (possibly empty) thanks to serde defaults.
/// Duplicate skills/languages are kept in extraction order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfile {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub experiences: Vec<CvExperience>,
    #[serde(default)]
    pub education: Vec<CvEducation>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    /// Key of the archived original PDF, set only if the S3 upload succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

/// What the model actually returns: the profile fields plus the validity
/// verdict. The gateway strips the verdict before responding.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionEnvelope {
    /// Only an explicit false rejects the document; a missing flag is
    /// treated as a resume, matching the strict-prompt contract.
    #[serde(default)]
    pub is_resume: Option<bool>,
    #[serde(default)]
    pub validity_reason: Option<String>,
    #[serde(flatten)]
    pub profile: CandidateProfile,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_envelope_has_all_list_fields() {
        let envelope: ExtractionEnvelope =
            serde_json::from_str(r#"{"isResume": true, "firstName": "Jane"}"#).unwrap();

        assert_eq!(envelope.is_resume, Some(true));
        assert_eq!(envelope.profile.first_name.as_deref(), Some("Jane"));
        assert!(envelope.profile.experiences.is_empty());
        assert!(envelope.profile.education.is_empty());
        assert!(envelope.profile.skills.is_empty());
        assert!(envelope.profile.languages.is_empty());
    }

    #[test]
    fn test_rejection_envelope() {
        let envelope: ExtractionEnvelope = serde_json::from_str(
            r#"{"isResume": false, "validityReason": "This is an invoice."}"#,
        )
        .unwrap();

        assert_eq!(envelope.is_resume, Some(false));
        assert_eq!(
            envelope.validity_reason.as_deref(),
            Some("This is an invoice.")
        );
    }

    #[test]
    fn test_full_profile_round_trip_uses_camel_case() {
        let profile = CandidateProfile {
            first_name: Some("Jane".to_string()),
            last_name: Some("Doe".to_string()),
            email: Some("jane@x.com".to_string()),
            phone: None,
            linkedin: None,
            summary: None,
            experiences: vec![CvExperience {
                company: Some("Acme".to_string()),
                role: Some("Engineer".to_string()),
                start_date: Some("2020-01".to_string()),
                end_date: Some("2022-12".to_string()),
                description: vec!["Built things".to_string(), "".to_string()],
                summary: None,
            }],
            education: vec![],
            skills: vec!["Rust".to_string(), "Rust".to_string()],
            languages: vec!["English".to_string()],
            file_path: None,
        };

        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(value["firstName"], "Jane");
        assert_eq!(value["experiences"][0]["startDate"], "2020-01");
        // Duplicates are not de-duplicated
        assert_eq!(value["skills"].as_array().unwrap().len(), 2);
        // filePath omitted until an upload succeeds
        assert!(value.get("filePath").is_none());

        let decoded: CandidateProfile = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, profile);
    }
}
