//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use kernel::error::app_error::FieldError;
use kernel::id::{CategoryId, DepartmentId, SubCategoryId};
use kernel::page::PageQuery;
use serde::{Deserialize, Deserializer, Serialize};

use crate::application::progress::ProgressOutput;
use crate::application::sections::SectionDetail;
use crate::domain::entity::category::CategoryTree;
use crate::domain::entity::course::{Course, CourseLevel, CourseUpdate};
use crate::domain::entity::department::Department;
use crate::domain::entity::enrollment::Enrollment;
use crate::domain::entity::section::{Section, SectionResource, SectionUpdate};
use crate::domain::repository::CourseFilter;

/// Distinguishes an absent field ("leave as is") from an explicit null
/// ("clear the value") in PATCH bodies
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

fn non_empty(value: &str, field: &str, errors: &mut Vec<FieldError>) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push(FieldError::new(field, "This field is required"));
        None
    } else {
        Some(trimmed.to_string())
    }
}

// ============================================================================
// Departments and categories
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDepartmentRequest {
    pub name: String,
    pub code: Option<String>,
}

impl CreateDepartmentRequest {
    pub fn validate(self) -> Result<(String, Option<String>), Vec<FieldError>> {
        let mut errors = Vec::new();
        let name = non_empty(&self.name, "name", &mut errors);

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok((name.unwrap(), self.code.filter(|c| !c.trim().is_empty())))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentResponse {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Department> for DepartmentResponse {
    fn from(d: &Department) -> Self {
        Self {
            id: d.department_id.to_string(),
            name: d.name.clone(),
            code: d.code.clone(),
            created_at: d.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubCategoryResponse {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: String,
    pub name: String,
    pub sub_categories: Vec<SubCategoryResponse>,
}

impl From<&CategoryTree> for CategoryResponse {
    fn from(tree: &CategoryTree) -> Self {
        Self {
            id: tree.category.category_id.to_string(),
            name: tree.category.name.clone(),
            sub_categories: tree
                .sub_categories
                .iter()
                .map(|s| SubCategoryResponse {
                    id: s.sub_category_id.to_string(),
                    name: s.name.clone(),
                })
                .collect(),
        }
    }
}

// ============================================================================
// Courses
// ============================================================================

/// Query string for course listing
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseListQuery {
    #[serde(flatten)]
    pub page: PageQuery,
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub department_id: Option<String>,
    pub category_id: Option<String>,
    pub level: Option<String>,
    pub search: Option<String>,
}

impl CourseListQuery {
    /// Build the repository filter. Unparseable filter values are
    /// reported rather than silently ignored.
    pub fn filter(&self) -> Result<CourseFilter, Vec<FieldError>> {
        let mut errors = Vec::new();
        let mut filter = CourseFilter::default();

        if let Some(raw) = &self.department_id {
            match DepartmentId::parse(raw) {
                Ok(id) => filter.department_id = Some(id),
                Err(_) => errors.push(FieldError::new("departmentId", "Invalid department id")),
            }
        }
        if let Some(raw) = &self.category_id {
            match CategoryId::parse(raw) {
                Ok(id) => filter.category_id = Some(id),
                Err(_) => errors.push(FieldError::new("categoryId", "Invalid category id")),
            }
        }
        if let Some(raw) = &self.level {
            match CourseLevel::try_from_code(&raw.to_uppercase()) {
                Some(level) => filter.level = Some(level),
                None => errors.push(FieldError::new(
                    "level",
                    "Level must be BEGINNER, INTERMEDIATE or ADVANCED",
                )),
            }
        }
        filter.search = self
            .search
            .as_ref()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(filter)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    pub title: String,
}

impl CreateCourseRequest {
    pub fn validate(self) -> Result<String, Vec<FieldError>> {
        let mut errors = Vec::new();
        let title = non_empty(&self.title, "title", &mut errors);
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(title.unwrap())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub subtitle: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub image_url: Option<Option<String>>,
    pub price: Option<f64>,
    pub level: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub department_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub category_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub sub_category_id: Option<Option<String>>,
}

impl UpdateCourseRequest {
    pub fn validate(self) -> Result<CourseUpdate, Vec<FieldError>> {
        let mut errors = Vec::new();
        let mut update = CourseUpdate::default();

        if let Some(title) = self.title {
            update.title = non_empty(&title, "title", &mut errors);
        }
        update.subtitle = self.subtitle;
        update.description = self.description;
        update.image_url = self.image_url;

        if let Some(price) = self.price {
            if price < 0.0 || !price.is_finite() {
                errors.push(FieldError::new("price", "Price must be zero or positive"));
            } else {
                update.price = Some(price);
            }
        }
        if let Some(raw) = self.level {
            match CourseLevel::try_from_code(&raw.to_uppercase()) {
                Some(level) => update.level = Some(level),
                None => errors.push(FieldError::new(
                    "level",
                    "Level must be BEGINNER, INTERMEDIATE or ADVANCED",
                )),
            }
        }

        update.department_id = parse_opt_id(self.department_id, "departmentId", &mut errors);
        update.category_id = parse_opt_id(self.category_id, "categoryId", &mut errors);
        update.sub_category_id = parse_opt_id(self.sub_category_id, "subCategoryId", &mut errors);

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(update)
    }
}

fn parse_opt_id<T>(
    value: Option<Option<String>>,
    field: &str,
    errors: &mut Vec<FieldError>,
) -> Option<Option<kernel::id::Id<T>>> {
    match value {
        None => None,
        Some(None) => Some(None),
        Some(Some(raw)) => match kernel::id::Id::parse(&raw) {
            Ok(id) => Some(Some(id)),
            Err(_) => {
                errors.push(FieldError::new(field, "Invalid id"));
                None
            }
        },
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
    pub id: String,
    pub instructor_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub price: f64,
    pub level: CourseLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_category_id: Option<String>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Course> for CourseResponse {
    fn from(c: &Course) -> Self {
        Self {
            id: c.course_id.to_string(),
            instructor_id: c.instructor_id.to_string(),
            title: c.title.clone(),
            subtitle: c.subtitle.clone(),
            description: c.description.clone(),
            image_url: c.image_url.clone(),
            price: c.price,
            level: c.level,
            department_id: c.department_id.map(|id| id.to_string()),
            category_id: c.category_id.map(|id| id.to_string()),
            sub_category_id: c.sub_category_id.map(|id| id.to_string()),
            is_published: c.is_published,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

// ============================================================================
// Sections
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSectionRequest {
    pub title: String,
}

impl CreateSectionRequest {
    pub fn validate(self) -> Result<String, Vec<FieldError>> {
        let mut errors = Vec::new();
        let title = non_empty(&self.title, "title", &mut errors);
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(title.unwrap())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSectionRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub video_url: Option<Option<String>>,
    pub is_free: Option<bool>,
}

impl UpdateSectionRequest {
    pub fn validate(self) -> Result<SectionUpdate, Vec<FieldError>> {
        let mut errors = Vec::new();
        let mut update = SectionUpdate {
            description: self.description,
            video_url: self.video_url,
            is_free: self.is_free,
            ..Default::default()
        };

        if let Some(title) = self.title {
            update.title = non_empty(&title, "title", &mut errors);
        }

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(update)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderItem {
    pub id: String,
    pub position: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    pub sections: Vec<ReorderItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddResourceRequest {
    pub name: String,
    pub file_url: String,
}

impl AddResourceRequest {
    pub fn validate(self) -> Result<(String, String), Vec<FieldError>> {
        let mut errors = Vec::new();
        let name = non_empty(&self.name, "name", &mut errors);
        let file_url = non_empty(&self.file_url, "fileUrl", &mut errors);

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok((name.unwrap(), file_url.unwrap()))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionResponse {
    pub id: String,
    pub course_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    pub position: i32,
    pub is_free: bool,
    pub is_published: bool,
}

impl From<&Section> for SectionResponse {
    fn from(s: &Section) -> Self {
        Self {
            id: s.section_id.to_string(),
            course_id: s.course_id.to_string(),
            title: s.title.clone(),
            description: s.description.clone(),
            video_url: s.video_url.clone(),
            position: s.position,
            is_free: s.is_free,
            is_published: s.is_published,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceResponse {
    pub id: String,
    pub name: String,
    pub file_url: String,
}

impl From<&SectionResource> for ResourceResponse {
    fn from(r: &SectionResource) -> Self {
        Self {
            id: r.resource_id.to_string(),
            name: r.name.clone(),
            file_url: r.file_url.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionDetailResponse {
    #[serde(flatten)]
    pub section: SectionResponse,
    pub resources: Vec<ResourceResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playback_id: Option<String>,
}

impl From<&SectionDetail> for SectionDetailResponse {
    fn from(d: &SectionDetail) -> Self {
        Self {
            section: SectionResponse::from(&d.section),
            resources: d.resources.iter().map(ResourceResponse::from).collect(),
            playback_id: d.playback_id.clone(),
        }
    }
}

// ============================================================================
// Enrollments and progress
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentResponse {
    pub id: String,
    pub course_id: String,
    pub progress_percent: i32,
    pub completed: bool,
    pub enrolled_at: DateTime<Utc>,
}

impl From<&Enrollment> for EnrollmentResponse {
    fn from(e: &Enrollment) -> Self {
        Self {
            id: e.enrollment_id.to_string(),
            course_id: e.course_id.to_string(),
            progress_percent: e.progress_percent,
            completed: e.completed,
            enrolled_at: e.enrolled_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrolledCourseResponse {
    #[serde(flatten)]
    pub enrollment: EnrollmentResponse,
    pub course: CourseResponse,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressResponse {
    pub section_completed: bool,
    pub progress_percent: i32,
    pub course_completed: bool,
    pub certificate_issued: bool,
}

impl From<&ProgressOutput> for ProgressResponse {
    fn from(p: &ProgressOutput) -> Self {
        Self {
            section_completed: p.section_completed,
            progress_percent: p.progress_percent,
            course_completed: p.course_completed,
            certificate_issued: p.certificate_issued,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_distinguishes_null_from_absent() {
        let req: UpdateCourseRequest =
            serde_json::from_str(r#"{"subtitle": null, "price": 49.0}"#).unwrap();
        let update = req.validate().unwrap();

        // Explicit null clears, absent leaves untouched
        assert_eq!(update.subtitle, Some(None));
        assert_eq!(update.description, None);
        assert_eq!(update.price, Some(49.0));
    }

    #[test]
    fn negative_price_rejected() {
        let req: UpdateCourseRequest = serde_json::from_str(r#"{"price": -5.0}"#).unwrap();
        let errors = req.validate().unwrap_err();
        assert_eq!(errors[0].field, "price");
    }

    #[test]
    fn list_query_rejects_bad_level() {
        let query = CourseListQuery {
            level: Some("guru".to_string()),
            ..Default::default()
        };
        let errors = query.filter().unwrap_err();
        assert_eq!(errors[0].field, "level");
    }

    #[test]
    fn list_query_builds_filter() {
        let dept = DepartmentId::new();
        let query = CourseListQuery {
            department_id: Some(dept.to_string()),
            level: Some("advanced".to_string()),
            search: Some("  databases ".to_string()),
            ..Default::default()
        };
        let filter = query.filter().unwrap();
        assert_eq!(filter.department_id, Some(dept));
        assert_eq!(filter.level, Some(CourseLevel::Advanced));
        assert_eq!(filter.search.as_deref(), Some("databases"));
    }

    #[test]
    fn section_detail_flattens_section_fields() {
        use kernel::id::CourseId;

        let detail = SectionDetail {
            section: Section::new(CourseId::new(), "Intro".to_string(), 1),
            resources: vec![],
            playback_id: Some("pb-123".to_string()),
        };
        let json = serde_json::to_value(SectionDetailResponse::from(&detail)).unwrap();
        assert_eq!(json["title"], "Intro");
        assert_eq!(json["playbackId"], "pb-123");
    }
}
