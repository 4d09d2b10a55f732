// src/accounts/validators.rs

use super::models::*;
use crate::common::{ValidationResult, Validator};

// ============================================================================
// Submission Validators
// ============================================================================

pub struct SubmissionValidator;

impl Validator<CreateSubmissionRequest> for SubmissionValidator {
    fn validate(&self, data: &CreateSubmissionRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        // Validate company name
        if data.company_name.trim().is_empty() {
            result.add_error("companyName", "Company name is required");
        } else if data.company_name.len() > 255 {
            result.add_error("companyName", "Company name must be less than 255 characters");
        }

        // Validate job title
        if data.job_title.trim().is_empty() {
            result.add_error("jobTitle", "Job title is required");
        } else if data.job_title.len() > 255 {
            result.add_error("jobTitle", "Job title must be less than 255 characters");
        }

        // Validate link: mandatory and must parse as a well-formed URL
        if data.link.trim().is_empty() {
            result.add_error("link", "Job link is required");
        } else if reqwest::Url::parse(&data.link).is_err() {
            result.add_error("link", "Job link must be a valid URL");
        }

        // Description is mandatory only for the draft phase
        if data.phase == Phase::Draft
            && data
                .description
                .as_deref()
                .map(|d| d.trim().is_empty())
                .unwrap_or(true)
        {
            result.add_error("description", "Job description is required for draft phase");
        }

        // Validate description length if provided
        if let Some(description) = &data.description {
            if description.len() > 10000 {
                result.add_error(
                    "description",
                    "Description must be less than 10000 characters",
                );
            }
        }

        result
    }
}

// ============================================================================
// Registration Validators
// ============================================================================

pub struct RegisterValidator;

impl Validator<RegisterRequest> for RegisterValidator {
    fn validate(&self, data: &RegisterRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        // Validate email
        let email = data.email.trim();
        if email.is_empty() {
            result.add_error("email", "Email is required");
        } else if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
            result.add_error("email", "Email must be a valid address");
        }

        // Validate password
        if data.password.len() < 6 {
            result.add_error("password", "Password must be at least 6 characters");
        }

        result
    }
}

pub struct LoginValidator;

impl Validator<LoginRequest> for LoginValidator {
    fn validate(&self, data: &LoginRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        let email = data.email.trim();
        if email.is_empty() {
            result.add_error("email", "Email is required");
        } else if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
            result.add_error("email", "Email must be a valid address");
        }

        if data.password.is_empty() {
            result.add_error("password", "Password is required");
        }

        result
    }
}
