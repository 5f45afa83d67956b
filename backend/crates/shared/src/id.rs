//! Common ID Types
//!
//! Type-safe ID wrappers for domain entities.

use std::fmt;
use std::marker::PhantomData;
use uuid::Uuid;

/// Generic typed ID wrapper
///
/// Usage:
/// ```
/// use kernel::id::{Id, markers};
/// type CourseId = Id<markers::Course>;
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id<T> {
    value: uuid::Uuid,
    _marker: PhantomData<T>,
}

impl<T> Id<T> {
    /// Create a new random ID (UUID v4)
    pub fn new() -> Self {
        Self {
            value: Uuid::new_v4(),
            _marker: PhantomData,
        }
    }

    /// Create from an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self {
            value: uuid,
            _marker: PhantomData,
        }
    }

    /// Parse from a string representation
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self::from_uuid(s.parse()?))
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.value
    }

    /// Convert to UUID
    pub fn into_uuid(self) -> Uuid {
        self.value
    }
}

impl<T> Default for Id<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> From<Uuid> for Id<T> {
    fn from(uuid: Uuid) -> Self {
        Self::from_uuid(uuid)
    }
}

impl<T> From<Id<T>> for Uuid {
    fn from(id: Id<T>) -> Self {
        id.value
    }
}

impl<T> serde::Serialize for Id<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl<'de, T> serde::Deserialize<'de> for Id<T> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::from_uuid(Uuid::deserialize(deserializer)?))
    }
}

/// Marker types for different entity IDs
pub mod markers {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct User;
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Department;
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Category;
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Course;
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Section;
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SubCategory;
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SectionResource;
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Enrollment;
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Certificate;
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Quiz;
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct QuizAttempt;
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Assignment;
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Submission;
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Discussion;
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Comment;
}

/// Commonly used ID aliases
pub type UserId = Id<markers::User>;
pub type DepartmentId = Id<markers::Department>;
pub type CategoryId = Id<markers::Category>;
pub type SubCategoryId = Id<markers::SubCategory>;
pub type SectionResourceId = Id<markers::SectionResource>;
pub type CourseId = Id<markers::Course>;
pub type SectionId = Id<markers::Section>;
pub type EnrollmentId = Id<markers::Enrollment>;
pub type CertificateId = Id<markers::Certificate>;
pub type QuizId = Id<markers::Quiz>;
pub type QuizAttemptId = Id<markers::QuizAttempt>;
pub type AssignmentId = Id<markers::Assignment>;
pub type SubmissionId = Id<markers::Submission>;
pub type DiscussionId = Id<markers::Discussion>;
pub type CommentId = Id<markers::Comment>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let a = UserId::new();
        let b = UserId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_parse_roundtrip() {
        let id = CourseId::new();
        let parsed = CourseId::parse(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(CourseId::parse("not-a-uuid").is_err());
    }
}
