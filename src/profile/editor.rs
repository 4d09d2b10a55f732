// src/profile/editor.rs
//! Region-edit logic: each save commits one region's draft and produces a
//! new whole-object replacement. No partial-field transactions, no
//! versioning; cancel on the client side simply never calls these.

use thiserror::Error;

use super::models::{BioEditRequest, EducationEditRequest, ExperienceEditRequest};
use crate::extraction::models::{CvEducation, CvExperience};
use crate::extraction::CandidateProfile;

#[derive(Debug, Error)]
pub enum EditError {
    #[error("no entry at index {0}")]
    IndexOutOfRange(usize),
}

/// Split line-delimited editor text back into bullet points.
/// No validation of line count or emptiness: empty lines come back as
/// empty strings.
pub fn split_description_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}

/// Commit a bio-block draft. Experiences, education, skills, languages and
/// filePath are untouched.
pub fn apply_bio_edit(mut profile: CandidateProfile, edit: BioEditRequest) -> CandidateProfile {
    profile.first_name = edit.first_name;
    profile.last_name = edit.last_name;
    profile.email = edit.email;
    profile.phone = edit.phone;
    profile.linkedin = edit.linkedin;
    profile.summary = edit.summary;
    profile
}

/// Commit the draft of the experience entry at `index`, leaving every
/// other entry untouched.
pub fn apply_experience_edit(
    mut profile: CandidateProfile,
    index: usize,
    edit: ExperienceEditRequest,
) -> Result<CandidateProfile, EditError> {
    let entry = profile
        .experiences
        .get_mut(index)
        .ok_or(EditError::IndexOutOfRange(index))?;

    *entry = CvExperience {
        company: edit.company,
        role: edit.role,
        start_date: edit.start_date,
        end_date: edit.end_date,
        description: split_description_lines(&edit.description),
        summary: edit.summary,
    };

    Ok(profile)
}

/// Commit the draft of the education entry at `index`.
pub fn apply_education_edit(
    mut profile: CandidateProfile,
    index: usize,
    edit: EducationEditRequest,
) -> Result<CandidateProfile, EditError> {
    let entry = profile
        .education
        .get_mut(index)
        .ok_or(EditError::IndexOutOfRange(index))?;

    *entry = CvEducation {
        institution: edit.institution,
        degree: edit.degree,
        start_date: edit.start_date,
        end_date: edit.end_date,
    };

    Ok(profile)
}
