//! Course Use Cases
//!
//! Listing with filters, CRUD guarded by ownership, and the publish
//! state machine.

use std::sync::Arc;

use kernel::actor::{CurrentUser, MaybeUser};
use kernel::id::CourseId;
use kernel::page::{PageQuery, SortOrder, resolve_sort_column};

use crate::domain::entity::course::{Course, CourseUpdate};
use crate::domain::repository::{
    CourseFilter, CourseRepository, CourseSort, SectionRepository, VideoAssetRepository,
};
use crate::error::{CatalogError, CatalogResult};
use crate::infra::video::VideoHost;

/// Columns callers may sort by; the first is the default
pub const COURSE_SORT_COLUMNS: &[&str] = &["created_at", "title", "price"];

/// A page of courses plus the total matching count
pub struct CoursePage {
    pub courses: Vec<Course>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

pub struct CourseUseCase<R> {
    repo: Arc<R>,
}

impl<R> CourseUseCase<R>
where
    R: CourseRepository + SectionRepository + VideoAssetRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// List courses. Drafts are only visible to staff.
    pub async fn list(
        &self,
        viewer: &MaybeUser,
        mut filter: CourseFilter,
        sort_by: Option<&str>,
        order: Option<&str>,
        page: PageQuery,
    ) -> CatalogResult<CoursePage> {
        if !viewer.is_staff() {
            filter.published_only = true;
        }

        let sort = CourseSort {
            column: resolve_sort_column(sort_by, COURSE_SORT_COLUMNS),
            order: SortOrder::parse(order),
        };

        let (courses, total) = self
            .repo
            .list(&filter, sort, page.limit(), page.offset())
            .await?;

        Ok(CoursePage {
            courses,
            total,
            page: page.page(),
            limit: page.limit(),
        })
    }

    pub async fn create(&self, actor: &CurrentUser, title: String) -> CatalogResult<Course> {
        if !actor.role.is_educator_or_admin() {
            return Err(CatalogError::Forbidden);
        }

        let course = Course::new(actor.id, title);
        CourseRepository::create(&*self.repo, &course).await?;

        tracing::info!(course_id = %course.course_id, "Course created");
        Ok(course)
    }

    /// Fetch one course. Drafts are visible to the owner and admins only.
    pub async fn get(&self, viewer: &MaybeUser, course_id: &CourseId) -> CatalogResult<Course> {
        let course = self.require(course_id).await?;

        if !course.is_published {
            let can_view = viewer
                .as_ref()
                .map(|u| u.owns_or_admin(course.instructor_id))
                .unwrap_or(false);
            if !can_view {
                return Err(CatalogError::CourseNotFound);
            }
        }

        Ok(course)
    }

    pub async fn update(
        &self,
        actor: &CurrentUser,
        course_id: &CourseId,
        update: CourseUpdate,
    ) -> CatalogResult<Course> {
        let mut course = self.require_owned(actor, course_id).await?;

        course.apply(update);
        CourseRepository::update(&*self.repo, &course).await?;

        Ok(course)
    }

    /// Delete a course. Hosted video assets for its sections are removed
    /// from the host best-effort before the rows cascade away.
    pub async fn delete<V: VideoHost + Sync>(
        &self,
        actor: &CurrentUser,
        course_id: &CourseId,
        host: &V,
    ) -> CatalogResult<()> {
        let course = self.require_owned(actor, course_id).await?;

        for asset in VideoAssetRepository::list_by_course(&*self.repo, course_id).await? {
            if let Err(e) = host.delete_asset(&asset.asset_id).await {
                tracing::warn!(
                    error = %e,
                    asset_id = %asset.asset_id,
                    "Hosted asset cleanup failed, continuing"
                );
            }
        }

        CourseRepository::delete(&*self.repo, course_id).await?;

        tracing::info!(course_id = %course.course_id, "Course deleted");
        Ok(())
    }

    pub async fn publish(&self, actor: &CurrentUser, course_id: &CourseId) -> CatalogResult<Course> {
        let mut course = self.require_owned(actor, course_id).await?;

        let published_sections = self.repo.count_published(course_id).await?;
        let blockers = course.publish_blockers(published_sections);
        if !blockers.is_empty() {
            return Err(CatalogError::PublishBlocked(format!(
                "the course needs {}",
                blockers.join(", ")
            )));
        }

        course.publish();
        CourseRepository::update(&*self.repo, &course).await?;

        tracing::info!(course_id = %course.course_id, "Course published");
        Ok(course)
    }

    pub async fn unpublish(
        &self,
        actor: &CurrentUser,
        course_id: &CourseId,
    ) -> CatalogResult<Course> {
        let mut course = self.require_owned(actor, course_id).await?;

        course.unpublish();
        CourseRepository::update(&*self.repo, &course).await?;

        tracing::info!(course_id = %course.course_id, "Course unpublished");
        Ok(course)
    }

    async fn require(&self, course_id: &CourseId) -> CatalogResult<Course> {
        CourseRepository::find_by_id(&*self.repo, course_id)
            .await?
            .ok_or(CatalogError::CourseNotFound)
    }

    async fn require_owned(
        &self,
        actor: &CurrentUser,
        course_id: &CourseId,
    ) -> CatalogResult<Course> {
        let course = self.require(course_id).await?;

        if !actor.owns_or_admin(course.instructor_id) {
            return Err(CatalogError::Forbidden);
        }

        Ok(course)
    }
}
