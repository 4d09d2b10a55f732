// src/accounts/models.rs
//! Account and submission data models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

use crate::extraction::CandidateProfile;

/// JWT claims structure; `sub` is the external auth identity id.
#[derive(Serialize, Deserialize, Debug)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub exp: usize,
}

/// User database model, keyed by the external auth identity
#[derive(FromRow, Serialize, Deserialize, Debug)]
pub struct UserRecord {
    pub id: String,
    pub auth_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
    pub cv_file_path: Option<String>,
    pub profile_data: Option<String>,
    pub created_at: Option<String>,
}

/// Job submission database model
#[derive(FromRow, Serialize, Deserialize, Debug)]
pub struct Submission {
    pub id: String,
    pub user_id: String,
    pub company_name: String,
    pub job_title: String,
    pub link: String,
    pub phase: String,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub created_at: Option<String>,
}

/// Pipeline phase: the fixed closed set of submission statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Draft,
    Submitted,
    IntroCall,
    Assessment,
    Interview,
    Onsite,
    Offered,
    Rejected,
}

impl Phase {
    pub const ALL: [Phase; 8] = [
        Phase::Draft,
        Phase::Submitted,
        Phase::IntroCall,
        Phase::Assessment,
        Phase::Interview,
        Phase::Onsite,
        Phase::Offered,
        Phase::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Draft => "draft",
            Phase::Submitted => "submitted",
            Phase::IntroCall => "intro_call",
            Phase::Assessment => "assessment",
            Phase::Interview => "interview",
            Phase::Onsite => "onsite",
            Phase::Offered => "offered",
            Phase::Rejected => "rejected",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// POST /api/register request body
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub profile: CandidateProfile,
}

/// POST /api/login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/submissions request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubmissionRequest {
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub link: String,
    pub phase: Phase,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}
