//! User Entity
//!
//! A single account covering all three roles. Role-specific profile
//! fields are optional and populated during onboarding.

use chrono::{DateTime, Utc};
use kernel::actor::UserRole;
use kernel::id::{DepartmentId, UserId};
use platform::password::StoredPassword;

use crate::domain::value_object::{email::Email, person_name::PersonName};

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    pub email: Email,
    /// Argon2id PHC hash, never the raw password
    pub password: StoredPassword,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub role: UserRole,
    pub image_url: Option<String>,
    pub department_id: Option<DepartmentId>,
    pub bio: Option<String>,
    /// Student onboarding fields
    pub year: Option<String>,
    pub branch: Option<String>,
    pub enrollment_number: Option<String>,
    /// Educator onboarding fields
    pub designation: Option<String>,
    pub specialization: Option<String>,
    pub faculty_id: Option<String>,
    /// Whether onboarding has been completed
    pub onboarded: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Student-specific onboarding data
#[derive(Debug, Clone)]
pub struct StudentOnboarding {
    pub department_id: DepartmentId,
    pub year: String,
    pub branch: String,
    pub enrollment_number: Option<String>,
}

/// Educator-specific onboarding data
#[derive(Debug, Clone)]
pub struct EducatorOnboarding {
    pub department_id: DepartmentId,
    pub designation: String,
    pub specialization: Option<String>,
    pub faculty_id: Option<String>,
    pub bio: Option<String>,
}

/// Profile fields updatable after onboarding
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub first_name: Option<PersonName>,
    pub last_name: Option<PersonName>,
    pub image_url: Option<String>,
    pub bio: Option<String>,
}

impl User {
    /// Create a new account with the default profile
    pub fn new(
        email: Email,
        password: StoredPassword,
        first_name: PersonName,
        last_name: PersonName,
        role: UserRole,
    ) -> Self {
        let now = Utc::now();
        Self {
            user_id: UserId::new(),
            email,
            password,
            first_name,
            last_name,
            role,
            image_url: None,
            department_id: None,
            bio: None,
            year: None,
            branch: None,
            enrollment_number: None,
            designation: None,
            specialization: None,
            faculty_id: None,
            onboarded: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Full display name
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Complete onboarding as a student
    pub fn onboard_student(&mut self, data: StudentOnboarding) {
        self.department_id = Some(data.department_id);
        self.year = Some(data.year);
        self.branch = Some(data.branch);
        self.enrollment_number = data.enrollment_number;
        self.onboarded = true;
        self.updated_at = Utc::now();
    }

    /// Complete onboarding as an educator
    pub fn onboard_educator(&mut self, data: EducatorOnboarding) {
        self.department_id = Some(data.department_id);
        self.designation = Some(data.designation);
        self.specialization = data.specialization;
        self.faculty_id = data.faculty_id;
        self.bio = data.bio;
        self.onboarded = true;
        self.updated_at = Utc::now();
    }

    /// Apply a partial profile update
    pub fn apply_profile(&mut self, update: ProfileUpdate) {
        if let Some(first) = update.first_name {
            self.first_name = first;
        }
        if let Some(last) = update.last_name {
            self.last_name = last;
        }
        if let Some(image_url) = update.image_url {
            self.image_url = Some(image_url);
        }
        if let Some(bio) = update.bio {
            self.bio = Some(bio);
        }
        self.updated_at = Utc::now();
    }

    /// Replace the stored password hash
    pub fn set_password(&mut self, password: StoredPassword) {
        self.password = password;
        self.updated_at = Utc::now();
    }

    /// Update user role (admin-only operation at the API layer)
    pub fn set_role(&mut self, role: UserRole) {
        self.role = role;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::password::RawPassword;

    fn sample_user(role: UserRole) -> User {
        let password = RawPassword::new("correct horse battery".to_string())
            .unwrap()
            .hash(None)
            .unwrap();
        User::new(
            Email::new("test@example.com").unwrap(),
            password,
            PersonName::new("Asha").unwrap(),
            PersonName::new("Verma").unwrap(),
            role,
        )
    }

    #[test]
    fn new_user_is_not_onboarded() {
        let user = sample_user(UserRole::Student);
        assert!(!user.onboarded);
        assert!(user.department_id.is_none());
        assert_eq!(user.full_name(), "Asha Verma");
    }

    #[test]
    fn student_onboarding_sets_fields_and_flag() {
        let mut user = sample_user(UserRole::Student);
        user.onboard_student(StudentOnboarding {
            department_id: DepartmentId::new(),
            year: "2".into(),
            branch: "Computer Science".into(),
            enrollment_number: Some("CS-2024-117".into()),
        });
        assert!(user.onboarded);
        assert_eq!(user.year.as_deref(), Some("2"));
        assert_eq!(user.enrollment_number.as_deref(), Some("CS-2024-117"));
    }

    #[test]
    fn educator_onboarding_sets_fields_and_flag() {
        let mut user = sample_user(UserRole::Educator);
        user.onboard_educator(EducatorOnboarding {
            department_id: DepartmentId::new(),
            designation: "Assistant Professor".into(),
            specialization: Some("Databases".into()),
            faculty_id: None,
            bio: None,
        });
        assert!(user.onboarded);
        assert_eq!(user.designation.as_deref(), Some("Assistant Professor"));
        assert!(user.faculty_id.is_none());
    }

    #[test]
    fn profile_update_is_partial() {
        let mut user = sample_user(UserRole::Student);
        user.apply_profile(ProfileUpdate {
            bio: Some("Second-year CS student".into()),
            ..Default::default()
        });
        assert_eq!(user.first_name.as_str(), "Asha");
        assert_eq!(user.bio.as_deref(), Some("Second-year CS student"));
    }
}
