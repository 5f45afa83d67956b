//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::{
    CategoryId, CourseId, DepartmentId, SectionId, SectionResourceId, UserId,
};
use kernel::page::SortOrder;

use crate::domain::entity::category::CategoryTree;
use crate::domain::entity::course::{Course, CourseLevel};
use crate::domain::entity::department::Department;
use crate::domain::entity::enrollment::{CourseAnalytics, Enrollment};
use crate::domain::entity::section::{Section, SectionResource};
use crate::domain::entity::video::VideoAsset;
use crate::error::CatalogResult;

/// Filters for course listing
#[derive(Debug, Clone, Default)]
pub struct CourseFilter {
    pub department_id: Option<DepartmentId>,
    pub category_id: Option<CategoryId>,
    pub level: Option<CourseLevel>,
    pub instructor_id: Option<UserId>,
    /// Hide drafts; always set for non-staff callers
    pub published_only: bool,
    /// Substring match over title, subtitle and description
    pub search: Option<String>,
}

/// Sorting for course listing, column already checked against the
/// allow-list
#[derive(Debug, Clone, Copy)]
pub struct CourseSort {
    pub column: &'static str,
    pub order: SortOrder,
}

/// Department repository trait
#[trait_variant::make(DepartmentRepository: Send)]
pub trait LocalDepartmentRepository {
    async fn list(&self) -> CatalogResult<Vec<Department>>;

    async fn create(&self, department: &Department) -> CatalogResult<()>;

    async fn exists(&self, department_id: &DepartmentId) -> CatalogResult<bool>;
}

/// Category repository trait
#[trait_variant::make(CategoryRepository: Send)]
pub trait LocalCategoryRepository {
    /// Categories with their subcategories, alphabetical
    async fn list_tree(&self) -> CatalogResult<Vec<CategoryTree>>;
}

/// Course repository trait
#[trait_variant::make(CourseRepository: Send)]
pub trait LocalCourseRepository {
    async fn create(&self, course: &Course) -> CatalogResult<()>;

    async fn find_by_id(&self, course_id: &CourseId) -> CatalogResult<Option<Course>>;

    /// Page of courses plus the total row count for the same filter
    async fn list(
        &self,
        filter: &CourseFilter,
        sort: CourseSort,
        limit: i64,
        offset: i64,
    ) -> CatalogResult<(Vec<Course>, i64)>;

    async fn update(&self, course: &Course) -> CatalogResult<()>;

    async fn delete(&self, course_id: &CourseId) -> CatalogResult<()>;
}

/// Section repository trait
#[trait_variant::make(SectionRepository: Send)]
pub trait LocalSectionRepository {
    async fn create(&self, section: &Section) -> CatalogResult<()>;

    async fn find_by_id(&self, section_id: &SectionId) -> CatalogResult<Option<Section>>;

    /// Sections of a course ordered by position
    async fn list_by_course(
        &self,
        course_id: &CourseId,
        published_only: bool,
    ) -> CatalogResult<Vec<Section>>;

    async fn update(&self, section: &Section) -> CatalogResult<()>;

    async fn delete(&self, section_id: &SectionId) -> CatalogResult<()>;

    /// Highest position in the course, 0 when empty
    async fn max_position(&self, course_id: &CourseId) -> CatalogResult<i32>;

    async fn count_published(&self, course_id: &CourseId) -> CatalogResult<i64>;

    /// Bulk position update; ids not in the course are ignored and
    /// reported through the returned row count
    async fn reorder(
        &self,
        course_id: &CourseId,
        positions: &[(SectionId, i32)],
    ) -> CatalogResult<u64>;
}

/// Section resource repository trait
#[trait_variant::make(SectionResourceRepository: Send)]
pub trait LocalSectionResourceRepository {
    async fn create(&self, resource: &SectionResource) -> CatalogResult<()>;

    async fn find_by_id(
        &self,
        resource_id: &SectionResourceId,
    ) -> CatalogResult<Option<SectionResource>>;

    async fn list_by_section(&self, section_id: &SectionId)
    -> CatalogResult<Vec<SectionResource>>;

    async fn delete(&self, resource_id: &SectionResourceId) -> CatalogResult<()>;
}

/// Video asset repository trait
#[trait_variant::make(VideoAssetRepository: Send)]
pub trait LocalVideoAssetRepository {
    /// Insert or replace the asset row for a section
    async fn upsert(&self, asset: &VideoAsset) -> CatalogResult<()>;

    async fn find_by_section(&self, section_id: &SectionId) -> CatalogResult<Option<VideoAsset>>;

    async fn delete_by_section(&self, section_id: &SectionId) -> CatalogResult<()>;

    /// All assets across a course's sections (for course deletion)
    async fn list_by_course(&self, course_id: &CourseId) -> CatalogResult<Vec<VideoAsset>>;
}

/// Enrollment and progress repository trait
#[trait_variant::make(EnrollmentRepository: Send)]
pub trait LocalEnrollmentRepository {
    async fn create(&self, enrollment: &Enrollment) -> CatalogResult<()>;

    async fn find(
        &self,
        student_id: &UserId,
        course_id: &CourseId,
    ) -> CatalogResult<Option<Enrollment>>;

    async fn exists(&self, student_id: &UserId, course_id: &CourseId) -> CatalogResult<bool>;

    /// The student's enrollments with their course rows, newest first
    async fn list_by_student(
        &self,
        student_id: &UserId,
    ) -> CatalogResult<Vec<(Enrollment, Course)>>;

    async fn update(&self, enrollment: &Enrollment) -> CatalogResult<()>;

    /// Toggle the completion marker for a section. Returns true when
    /// the marker is now set.
    async fn toggle_section_progress(
        &self,
        student_id: &UserId,
        section_id: &SectionId,
    ) -> CatalogResult<bool>;

    /// Completed published sections of a course for a student
    async fn count_completed_sections(
        &self,
        student_id: &UserId,
        course_id: &CourseId,
    ) -> CatalogResult<i64>;

    /// Issue a certificate unless one exists already
    async fn issue_certificate(
        &self,
        student_id: &UserId,
        course_id: &CourseId,
    ) -> CatalogResult<()>;

    async fn increment_enrollment_count(&self, course_id: &CourseId) -> CatalogResult<()>;

    /// Recompute the completion rate from enrollment rows
    async fn refresh_completion_rate(&self, course_id: &CourseId) -> CatalogResult<()>;

    async fn analytics(&self, course_id: &CourseId) -> CatalogResult<Option<CourseAnalytics>>;
}
