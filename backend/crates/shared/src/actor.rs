//! Request actor - roles and the authenticated user
//!
//! Every bounded context checks roles and ownership, so the vocabulary
//! lives in the kernel. The auth crate's middleware resolves the token
//! into a [`CurrentUser`] and stores it in request extensions; handlers
//! extract it from there.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::UserId;

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(i16)]
pub enum UserRole {
    #[default]
    Student = 0,
    Educator = 1,
    Admin = 2,
}

impl UserRole {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        use UserRole::*;
        match self {
            Student => "STUDENT",
            Educator => "EDUCATOR",
            Admin => "ADMIN",
        }
    }

    /// Educators and admins may author and manage courses
    #[inline]
    pub const fn is_educator_or_admin(&self) -> bool {
        use UserRole::*;
        matches!(self, Educator | Admin)
    }

    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    #[inline]
    pub fn try_from_id(id: i16) -> Option<Self> {
        use UserRole::*;
        match id {
            0 => Some(Student),
            1 => Some(Educator),
            2 => Some(Admin),
            _ => None,
        }
    }

    #[inline]
    pub fn try_from_code(code: &str) -> Option<Self> {
        use UserRole::*;
        match code {
            "STUDENT" => Some(Student),
            "EDUCATOR" => Some(Educator),
            "ADMIN" => Some(Admin),
            _ => None,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The authenticated user attached to a request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: UserId,
    pub email: String,
    pub role: UserRole,
    pub onboarded: bool,
}

impl CurrentUser {
    /// Ownership check: the owner of a resource, or an admin
    pub fn owns_or_admin(&self, owner_id: UserId) -> bool {
        self.role.is_admin() || self.id == owner_id
    }
}

/// Optional authentication result for public endpoints
#[derive(Debug, Clone, Default)]
pub struct MaybeUser(pub Option<CurrentUser>);

impl MaybeUser {
    pub fn as_ref(&self) -> Option<&CurrentUser> {
        self.0.as_ref()
    }

    /// True when the caller is signed in as an educator or admin
    pub fn is_staff(&self) -> bool {
        self.0
            .as_ref()
            .map(|u| u.role.is_educator_or_admin())
            .unwrap_or(false)
    }
}

#[cfg(feature = "axum")]
mod axum_impls {
    use super::*;
    use crate::error::app_error::AppError;
    use axum::extract::FromRequestParts;
    use axum::http::request::Parts;

    impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
        type Rejection = AppError;

        async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
            parts
                .extensions
                .get::<CurrentUser>()
                .cloned()
                .ok_or_else(|| AppError::unauthorized("Authentication required"))
        }
    }

    impl<S: Send + Sync> FromRequestParts<S> for MaybeUser {
        type Rejection = std::convert::Infallible;

        async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
            Ok(parts
                .extensions
                .get::<MaybeUser>()
                .cloned()
                .unwrap_or_default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: UserRole) -> CurrentUser {
        CurrentUser {
            id: UserId::new(),
            email: "test@example.edu".to_string(),
            role,
            onboarded: true,
        }
    }

    #[test]
    fn test_role_codes_roundtrip() {
        for role in [UserRole::Student, UserRole::Educator, UserRole::Admin] {
            assert_eq!(UserRole::try_from_code(role.code()), Some(role));
            assert_eq!(UserRole::try_from_id(role.id()), Some(role));
        }
        assert_eq!(UserRole::try_from_code("SUPERUSER"), None);
        assert_eq!(UserRole::try_from_id(9), None);
    }

    #[test]
    fn test_role_checks() {
        assert!(!UserRole::Student.is_educator_or_admin());
        assert!(UserRole::Educator.is_educator_or_admin());
        assert!(UserRole::Admin.is_educator_or_admin());
        assert!(!UserRole::Educator.is_admin());
        assert!(UserRole::Admin.is_admin());
    }

    #[test]
    fn test_owns_or_admin() {
        let owner = user(UserRole::Educator);
        assert!(owner.owns_or_admin(owner.id));

        let other = user(UserRole::Educator);
        assert!(!other.owns_or_admin(owner.id));

        let admin = user(UserRole::Admin);
        assert!(admin.owns_or_admin(owner.id));
    }

    #[test]
    fn test_maybe_user_staff() {
        assert!(!MaybeUser(None).is_staff());
        assert!(!MaybeUser(Some(user(UserRole::Student))).is_staff());
        assert!(MaybeUser(Some(user(UserRole::Educator))).is_staff());
    }
}
