//! API DTOs (Data Transfer Objects)
//!
//! Request bodies validate into typed use-case inputs; every failed
//! field is reported, not just the first one.

use chrono::{DateTime, Utc};
use kernel::actor::UserRole;
use kernel::error::app_error::FieldError;
use kernel::id::DepartmentId;
use platform::password::RawPassword;
use serde::{Deserialize, Serialize};

use crate::application::sign_up::SignUpInput;
use crate::domain::entity::{EducatorOnboarding, ProfileUpdate, StudentOnboarding, User};
use crate::domain::value_object::{email::Email, person_name::PersonName};

// ============================================================================
// Sign Up
// ============================================================================

/// Sign up request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    /// "STUDENT" or "EDUCATOR"; admins are created out of band
    pub role: String,
}

impl SignUpRequest {
    pub fn validate(self) -> Result<SignUpInput, Vec<FieldError>> {
        let mut errors = Vec::new();

        let email = Email::new(&self.email)
            .map_err(|e| errors.push(FieldError::new("email", e.message())))
            .ok();
        let password = RawPassword::new(self.password)
            .map_err(|e| errors.push(FieldError::new("password", e.to_string())))
            .ok();
        let first_name = PersonName::new(&self.first_name)
            .map_err(|e| errors.push(FieldError::new("firstName", e.message())))
            .ok();
        let last_name = PersonName::new(&self.last_name)
            .map_err(|e| errors.push(FieldError::new("lastName", e.message())))
            .ok();

        let role = match UserRole::try_from_code(&self.role.to_uppercase()) {
            Some(UserRole::Admin) | None => {
                errors.push(FieldError::new("role", "Role must be STUDENT or EDUCATOR"));
                None
            }
            role => role,
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        // All fields are Some when errors is empty
        Ok(SignUpInput {
            email: email.unwrap(),
            password: password.unwrap(),
            first_name: first_name.unwrap(),
            last_name: last_name.unwrap(),
            role: role.unwrap(),
        })
    }
}

// ============================================================================
// Sign In
// ============================================================================

/// Sign in request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

// ============================================================================
// Onboarding
// ============================================================================

/// Student onboarding request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentOnboardingRequest {
    pub department_id: String,
    pub year: String,
    pub branch: String,
    pub enrollment_number: Option<String>,
}

impl StudentOnboardingRequest {
    pub fn validate(self) -> Result<StudentOnboarding, Vec<FieldError>> {
        let mut errors = Vec::new();

        let department_id = DepartmentId::parse(&self.department_id)
            .map_err(|_| errors.push(FieldError::new("departmentId", "Invalid department id")))
            .ok();

        let year = require(&mut errors, "year", self.year);
        let branch = require(&mut errors, "branch", self.branch);

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(StudentOnboarding {
            department_id: department_id.unwrap(),
            year: year.unwrap(),
            branch: branch.unwrap(),
            enrollment_number: normalize_opt(self.enrollment_number),
        })
    }
}

/// Educator onboarding request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducatorOnboardingRequest {
    pub department_id: String,
    pub designation: String,
    pub specialization: Option<String>,
    pub faculty_id: Option<String>,
    pub bio: Option<String>,
}

impl EducatorOnboardingRequest {
    pub fn validate(self) -> Result<EducatorOnboarding, Vec<FieldError>> {
        let mut errors = Vec::new();

        let department_id = DepartmentId::parse(&self.department_id)
            .map_err(|_| errors.push(FieldError::new("departmentId", "Invalid department id")))
            .ok();

        let designation = require(&mut errors, "designation", self.designation);

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(EducatorOnboarding {
            department_id: department_id.unwrap(),
            designation: designation.unwrap(),
            specialization: normalize_opt(self.specialization),
            faculty_id: normalize_opt(self.faculty_id),
            bio: normalize_opt(self.bio),
        })
    }
}

// ============================================================================
// Profile
// ============================================================================

/// Partial profile update request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub image_url: Option<String>,
    pub bio: Option<String>,
}

impl UpdateProfileRequest {
    pub fn validate(self) -> Result<ProfileUpdate, Vec<FieldError>> {
        let mut errors = Vec::new();

        let first_name = self.first_name.and_then(|name| {
            PersonName::new(name)
                .map_err(|e| errors.push(FieldError::new("firstName", e.message())))
                .ok()
        });
        let last_name = self.last_name.and_then(|name| {
            PersonName::new(name)
                .map_err(|e| errors.push(FieldError::new("lastName", e.message())))
                .ok()
        });

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ProfileUpdate {
            first_name,
            last_name,
            image_url: normalize_opt(self.image_url),
            bio: normalize_opt(self.bio),
        })
    }
}

/// Password change request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

impl ChangePasswordRequest {
    pub fn validate(self) -> Result<(RawPassword, RawPassword), Vec<FieldError>> {
        let mut errors = Vec::new();

        let current = RawPassword::new(self.current_password)
            .map_err(|e| errors.push(FieldError::new("currentPassword", e.to_string())))
            .ok();
        let new = RawPassword::new(self.new_password)
            .map_err(|e| errors.push(FieldError::new("newPassword", e.to_string())))
            .ok();

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok((current.unwrap(), new.unwrap()))
    }
}

/// Role change request (admin only)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetRoleRequest {
    pub role: String,
}

impl SetRoleRequest {
    pub fn validate(&self) -> Result<UserRole, Vec<FieldError>> {
        UserRole::try_from_code(&self.role.to_uppercase()).ok_or_else(|| {
            vec![FieldError::new(
                "role",
                "Role must be STUDENT, EDUCATOR or ADMIN",
            )]
        })
    }
}

// ============================================================================
// Responses
// ============================================================================

/// Public view of a user account
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrollment_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faculty_id: Option<String>,
    pub onboarded: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.user_id.to_string(),
            email: user.email.as_str().to_string(),
            first_name: user.first_name.as_str().to_string(),
            last_name: user.last_name.as_str().to_string(),
            full_name: user.full_name(),
            role: user.role,
            image_url: user.image_url.clone(),
            department_id: user.department_id.map(|id| id.to_string()),
            bio: user.bio.clone(),
            year: user.year.clone(),
            branch: user.branch.clone(),
            enrollment_number: user.enrollment_number.clone(),
            designation: user.designation.clone(),
            specialization: user.specialization.clone(),
            faculty_id: user.faculty_id.clone(),
            onboarded: user.onboarded,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

fn require(errors: &mut Vec<FieldError>, field: &str, value: String) -> Option<String> {
    let value = value.trim().to_string();
    if value.is_empty() {
        errors.push(FieldError::new(field, "This field is required"));
        None
    } else {
        Some(value)
    }
}

fn normalize_opt(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(role: &str, email: &str, password: &str) -> SignUpRequest {
        SignUpRequest {
            email: email.to_string(),
            password: password.to_string(),
            first_name: "Asha".to_string(),
            last_name: "Verma".to_string(),
            role: role.to_string(),
        }
    }

    #[test]
    fn signup_valid() {
        let input = signup("student", "asha@college.edu", "plover gravel oak")
            .validate()
            .unwrap();
        assert_eq!(input.role, UserRole::Student);
        assert_eq!(input.email.as_str(), "asha@college.edu");
    }

    #[test]
    fn signup_collects_all_field_errors() {
        let errors = signup("wizard", "not-an-email", "short")
            .validate()
            .unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"email"));
        assert!(fields.contains(&"password"));
        assert!(fields.contains(&"role"));
    }

    #[test]
    fn signup_rejects_admin_role() {
        let errors = signup("ADMIN", "asha@college.edu", "plover gravel oak")
            .validate()
            .unwrap_err();
        assert_eq!(errors[0].field, "role");
    }

    #[test]
    fn student_onboarding_requires_year_and_branch() {
        let req = StudentOnboardingRequest {
            department_id: DepartmentId::new().to_string(),
            year: "  ".to_string(),
            branch: String::new(),
            enrollment_number: None,
        };
        let errors = req.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn profile_update_allows_partial_body() {
        let req = UpdateProfileRequest {
            first_name: None,
            last_name: None,
            image_url: Some("https://cdn.example.com/a.png".to_string()),
            bio: Some("   ".to_string()),
        };
        let update = req.validate().unwrap();
        assert!(update.first_name.is_none());
        assert!(update.image_url.is_some());
        // Whitespace-only bio is treated as absent
        assert!(update.bio.is_none());
    }

    #[test]
    fn user_response_hides_empty_optionals() {
        use crate::domain::value_object::{email::Email, person_name::PersonName};
        use platform::password::RawPassword;

        let user = User::new(
            Email::new("asha@college.edu").unwrap(),
            RawPassword::new("plover gravel oak".to_string())
                .unwrap()
                .hash(None)
                .unwrap(),
            PersonName::new("Asha").unwrap(),
            PersonName::new("Verma").unwrap(),
            UserRole::Student,
        );

        let json = serde_json::to_value(UserResponse::from(&user)).unwrap();
        assert_eq!(json["fullName"], "Asha Verma");
        assert_eq!(json["role"], "STUDENT");
        assert!(json.get("departmentId").is_none());
    }
}
