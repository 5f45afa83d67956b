//! Course Entity

use chrono::{DateTime, Utc};
use kernel::id::{CategoryId, CourseId, DepartmentId, SubCategoryId, UserId};
use serde::{Deserialize, Serialize};

/// Course difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(i16)]
pub enum CourseLevel {
    #[default]
    Beginner = 0,
    Intermediate = 1,
    Advanced = 2,
}

impl CourseLevel {
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    pub const fn code(&self) -> &'static str {
        match self {
            CourseLevel::Beginner => "BEGINNER",
            CourseLevel::Intermediate => "INTERMEDIATE",
            CourseLevel::Advanced => "ADVANCED",
        }
    }

    pub fn try_from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(CourseLevel::Beginner),
            1 => Some(CourseLevel::Intermediate),
            2 => Some(CourseLevel::Advanced),
            _ => None,
        }
    }

    pub fn try_from_code(code: &str) -> Option<Self> {
        match code {
            "BEGINNER" => Some(CourseLevel::Beginner),
            "INTERMEDIATE" => Some(CourseLevel::Intermediate),
            "ADVANCED" => Some(CourseLevel::Advanced),
            _ => None,
        }
    }
}

impl std::fmt::Display for CourseLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Course entity
#[derive(Debug, Clone)]
pub struct Course {
    pub course_id: CourseId,
    pub instructor_id: UserId,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub price: f64,
    pub level: CourseLevel,
    pub department_id: Option<DepartmentId>,
    pub category_id: Option<CategoryId>,
    pub sub_category_id: Option<SubCategoryId>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial course update
#[derive(Debug, Clone, Default)]
pub struct CourseUpdate {
    pub title: Option<String>,
    pub subtitle: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub image_url: Option<Option<String>>,
    pub price: Option<f64>,
    pub level: Option<CourseLevel>,
    pub department_id: Option<Option<DepartmentId>>,
    pub category_id: Option<Option<CategoryId>>,
    pub sub_category_id: Option<Option<SubCategoryId>>,
}

impl Course {
    pub fn new(instructor_id: UserId, title: String) -> Self {
        let now = Utc::now();
        Self {
            course_id: CourseId::new(),
            instructor_id,
            title,
            subtitle: None,
            description: None,
            image_url: None,
            price: 0.0,
            level: CourseLevel::default(),
            department_id: None,
            category_id: None,
            sub_category_id: None,
            is_published: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update. Inner `Option`s distinguish "leave as is"
    /// from "clear the field".
    pub fn apply(&mut self, update: CourseUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(subtitle) = update.subtitle {
            self.subtitle = subtitle;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(image_url) = update.image_url {
            self.image_url = image_url;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(level) = update.level {
            self.level = level;
        }
        if let Some(department_id) = update.department_id {
            self.department_id = department_id;
        }
        if let Some(category_id) = update.category_id {
            self.category_id = category_id;
        }
        if let Some(sub_category_id) = update.sub_category_id {
            self.sub_category_id = sub_category_id;
        }
        self.updated_at = Utc::now();
    }

    /// What still blocks publication, given the number of published
    /// sections the course has. Empty means publishable.
    pub fn publish_blockers(&self, published_sections: i64) -> Vec<&'static str> {
        let mut blockers = Vec::new();

        if self.title.trim().is_empty() {
            blockers.push("a title");
        }
        if self
            .description
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .is_empty()
        {
            blockers.push("a description");
        }
        if self.image_url.is_none() {
            blockers.push("a course image");
        }
        if published_sections == 0 {
            blockers.push("at least one published section");
        }

        blockers
    }

    pub fn publish(&mut self) {
        self.is_published = true;
        self.updated_at = Utc::now();
    }

    pub fn unpublish(&mut self) {
        self.is_published = false;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> Course {
        Course::new(UserId::new(), "Operating Systems".to_string())
    }

    #[test]
    fn new_course_is_unpublished_draft() {
        let course = draft();
        assert!(!course.is_published);
        assert_eq!(course.level, CourseLevel::Beginner);
        assert_eq!(course.price, 0.0);
    }

    #[test]
    fn publish_blockers_list_everything_missing() {
        let course = draft();
        let blockers = course.publish_blockers(0);
        assert_eq!(
            blockers,
            vec![
                "a description",
                "a course image",
                "at least one published section"
            ]
        );
    }

    #[test]
    fn complete_course_has_no_blockers() {
        let mut course = draft();
        course.apply(CourseUpdate {
            description: Some(Some("Processes, scheduling, memory.".into())),
            image_url: Some(Some("https://cdn.example.com/os.png".into())),
            ..Default::default()
        });
        assert!(course.publish_blockers(3).is_empty());
    }

    #[test]
    fn blank_description_still_blocks() {
        let mut course = draft();
        course.apply(CourseUpdate {
            description: Some(Some("   ".into())),
            image_url: Some(Some("https://cdn.example.com/os.png".into())),
            ..Default::default()
        });
        assert_eq!(course.publish_blockers(1), vec!["a description"]);
    }

    #[test]
    fn apply_can_clear_optional_fields() {
        let mut course = draft();
        course.apply(CourseUpdate {
            subtitle: Some(Some("From zero".into())),
            ..Default::default()
        });
        assert!(course.subtitle.is_some());

        course.apply(CourseUpdate {
            subtitle: Some(None),
            ..Default::default()
        });
        assert!(course.subtitle.is_none());
    }

    #[test]
    fn level_codes_roundtrip() {
        for level in [
            CourseLevel::Beginner,
            CourseLevel::Intermediate,
            CourseLevel::Advanced,
        ] {
            assert_eq!(CourseLevel::try_from_code(level.code()), Some(level));
            assert_eq!(CourseLevel::try_from_id(level.id()), Some(level));
        }
        assert_eq!(CourseLevel::try_from_code("EXPERT"), None);
    }
}
