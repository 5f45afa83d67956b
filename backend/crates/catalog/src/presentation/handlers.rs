//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::Response;
use std::sync::Arc;

use kernel::actor::{CurrentUser, MaybeUser};
use kernel::id::{CourseId, SectionId, SectionResourceId};
use kernel::response;

use crate::application::courses::CourseUseCase;
use crate::application::enrollments::EnrollmentUseCase;
use crate::application::progress::ProgressUseCase;
use crate::application::sections::SectionUseCase;
use crate::application::taxonomy::TaxonomyUseCase;
use crate::domain::repository::{
    CategoryRepository, CourseRepository, DepartmentRepository, EnrollmentRepository,
    SectionRepository, SectionResourceRepository, VideoAssetRepository,
};
use crate::error::{CatalogError, CatalogResult};
use crate::infra::video::VideoHost;
use crate::presentation::dto::{
    AddResourceRequest, CategoryResponse, CourseListQuery, CourseResponse,
    CreateCourseRequest, CreateDepartmentRequest, CreateSectionRequest, DepartmentResponse,
    EnrolledCourseResponse, EnrollmentResponse, ProgressResponse, ReorderRequest,
    ResourceResponse, SectionDetailResponse, SectionResponse, UpdateCourseRequest,
    UpdateSectionRequest,
};

/// Everything the catalog handlers need from persistence
pub trait CatalogRepository:
    DepartmentRepository
    + CategoryRepository
    + CourseRepository
    + SectionRepository
    + SectionResourceRepository
    + VideoAssetRepository
    + EnrollmentRepository
    + Send
    + Sync
    + 'static
{
}

impl<T> CatalogRepository for T where
    T: DepartmentRepository
        + CategoryRepository
        + CourseRepository
        + SectionRepository
        + SectionResourceRepository
        + VideoAssetRepository
        + EnrollmentRepository
        + Send
        + Sync
        + 'static
{
}

/// Shared state for catalog handlers
pub struct CatalogAppState<R, V>
where
    R: CatalogRepository,
    V: VideoHost + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub host: Arc<V>,
}

impl<R, V> Clone for CatalogAppState<R, V>
where
    R: CatalogRepository,
    V: VideoHost + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            host: self.host.clone(),
        }
    }
}

fn parse_course_id(raw: &str) -> CatalogResult<CourseId> {
    CourseId::parse(raw).map_err(|_| CatalogError::CourseNotFound)
}

fn parse_section_id(raw: &str) -> CatalogResult<SectionId> {
    SectionId::parse(raw).map_err(|_| CatalogError::SectionNotFound)
}

// ============================================================================
// Departments and categories
// ============================================================================

pub async fn list_departments<R, V>(
    State(state): State<CatalogAppState<R, V>>,
) -> CatalogResult<Response>
where
    R: CatalogRepository,
    V: VideoHost + Send + Sync + 'static,
{
    let departments = TaxonomyUseCase::new(state.repo).list_departments().await?;
    let body: Vec<DepartmentResponse> = departments.iter().map(Into::into).collect();
    Ok(response::ok(body))
}

pub async fn create_department<R, V>(
    State(state): State<CatalogAppState<R, V>>,
    actor: CurrentUser,
    Json(payload): Json<CreateDepartmentRequest>,
) -> CatalogResult<Response>
where
    R: CatalogRepository,
    V: VideoHost + Send + Sync + 'static,
{
    let (name, code) = payload.validate().map_err(CatalogError::Validation)?;
    let department = TaxonomyUseCase::new(state.repo)
        .create_department(&actor, name, code)
        .await?;
    Ok(response::created(DepartmentResponse::from(&department)))
}

pub async fn list_categories<R, V>(
    State(state): State<CatalogAppState<R, V>>,
) -> CatalogResult<Response>
where
    R: CatalogRepository,
    V: VideoHost + Send + Sync + 'static,
{
    let categories = TaxonomyUseCase::new(state.repo).list_categories().await?;
    let body: Vec<CategoryResponse> = categories.iter().map(Into::into).collect();
    Ok(response::ok(body))
}

// ============================================================================
// Courses
// ============================================================================

pub async fn list_courses<R, V>(
    State(state): State<CatalogAppState<R, V>>,
    viewer: MaybeUser,
    Query(query): Query<CourseListQuery>,
) -> CatalogResult<Response>
where
    R: CatalogRepository,
    V: VideoHost + Send + Sync + 'static,
{
    let filter = query.filter().map_err(CatalogError::Validation)?;
    let page = CourseUseCase::new(state.repo)
        .list(
            &viewer,
            filter,
            query.sort_by.as_deref(),
            query.order.as_deref(),
            query.page,
        )
        .await?;

    let body: Vec<CourseResponse> = page.courses.iter().map(Into::into).collect();
    Ok(response::paginated(body, page.total, page.page, page.limit))
}

pub async fn create_course<R, V>(
    State(state): State<CatalogAppState<R, V>>,
    actor: CurrentUser,
    Json(payload): Json<CreateCourseRequest>,
) -> CatalogResult<Response>
where
    R: CatalogRepository,
    V: VideoHost + Send + Sync + 'static,
{
    let title = payload.validate().map_err(CatalogError::Validation)?;
    let course = CourseUseCase::new(state.repo).create(&actor, title).await?;
    Ok(response::created(CourseResponse::from(&course)))
}

pub async fn get_course<R, V>(
    State(state): State<CatalogAppState<R, V>>,
    viewer: MaybeUser,
    Path(id): Path<String>,
) -> CatalogResult<Response>
where
    R: CatalogRepository,
    V: VideoHost + Send + Sync + 'static,
{
    let course_id = parse_course_id(&id)?;
    let course = CourseUseCase::new(state.repo).get(&viewer, &course_id).await?;
    Ok(response::ok(CourseResponse::from(&course)))
}

pub async fn update_course<R, V>(
    State(state): State<CatalogAppState<R, V>>,
    actor: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateCourseRequest>,
) -> CatalogResult<Response>
where
    R: CatalogRepository,
    V: VideoHost + Send + Sync + 'static,
{
    let course_id = parse_course_id(&id)?;
    let update = payload.validate().map_err(CatalogError::Validation)?;
    let course = CourseUseCase::new(state.repo)
        .update(&actor, &course_id, update)
        .await?;
    Ok(response::ok(CourseResponse::from(&course)))
}

pub async fn delete_course<R, V>(
    State(state): State<CatalogAppState<R, V>>,
    actor: CurrentUser,
    Path(id): Path<String>,
) -> CatalogResult<Response>
where
    R: CatalogRepository,
    V: VideoHost + Send + Sync + 'static,
{
    let course_id = parse_course_id(&id)?;
    CourseUseCase::new(state.repo)
        .delete(&actor, &course_id, &*state.host)
        .await?;
    Ok(response::ok(serde_json::json!({ "deleted": true })))
}

pub async fn publish_course<R, V>(
    State(state): State<CatalogAppState<R, V>>,
    actor: CurrentUser,
    Path(id): Path<String>,
) -> CatalogResult<Response>
where
    R: CatalogRepository,
    V: VideoHost + Send + Sync + 'static,
{
    let course_id = parse_course_id(&id)?;
    let course = CourseUseCase::new(state.repo)
        .publish(&actor, &course_id)
        .await?;
    Ok(response::ok(CourseResponse::from(&course)))
}

pub async fn unpublish_course<R, V>(
    State(state): State<CatalogAppState<R, V>>,
    actor: CurrentUser,
    Path(id): Path<String>,
) -> CatalogResult<Response>
where
    R: CatalogRepository,
    V: VideoHost + Send + Sync + 'static,
{
    let course_id = parse_course_id(&id)?;
    let course = CourseUseCase::new(state.repo)
        .unpublish(&actor, &course_id)
        .await?;
    Ok(response::ok(CourseResponse::from(&course)))
}

// ============================================================================
// Sections
// ============================================================================

pub async fn list_sections<R, V>(
    State(state): State<CatalogAppState<R, V>>,
    viewer: MaybeUser,
    Path(id): Path<String>,
) -> CatalogResult<Response>
where
    R: CatalogRepository,
    V: VideoHost + Send + Sync + 'static,
{
    let course_id = parse_course_id(&id)?;
    let sections = SectionUseCase::new(state.repo, state.host)
        .list(&viewer, &course_id)
        .await?;
    let body: Vec<SectionResponse> = sections.iter().map(Into::into).collect();
    Ok(response::ok(body))
}

pub async fn create_section<R, V>(
    State(state): State<CatalogAppState<R, V>>,
    actor: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<CreateSectionRequest>,
) -> CatalogResult<Response>
where
    R: CatalogRepository,
    V: VideoHost + Send + Sync + 'static,
{
    let course_id = parse_course_id(&id)?;
    let title = payload.validate().map_err(CatalogError::Validation)?;
    let section = SectionUseCase::new(state.repo, state.host)
        .create(&actor, &course_id, title)
        .await?;
    Ok(response::created(SectionResponse::from(&section)))
}

pub async fn get_section<R, V>(
    State(state): State<CatalogAppState<R, V>>,
    viewer: MaybeUser,
    Path(id): Path<String>,
) -> CatalogResult<Response>
where
    R: CatalogRepository,
    V: VideoHost + Send + Sync + 'static,
{
    let section_id = parse_section_id(&id)?;
    let detail = SectionUseCase::new(state.repo, state.host)
        .get(&viewer, &section_id)
        .await?;
    Ok(response::ok(SectionDetailResponse::from(&detail)))
}

pub async fn update_section<R, V>(
    State(state): State<CatalogAppState<R, V>>,
    actor: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateSectionRequest>,
) -> CatalogResult<Response>
where
    R: CatalogRepository,
    V: VideoHost + Send + Sync + 'static,
{
    let section_id = parse_section_id(&id)?;
    let update = payload.validate().map_err(CatalogError::Validation)?;
    let section = SectionUseCase::new(state.repo, state.host)
        .update(&actor, &section_id, update)
        .await?;
    Ok(response::ok(SectionResponse::from(&section)))
}

pub async fn delete_section<R, V>(
    State(state): State<CatalogAppState<R, V>>,
    actor: CurrentUser,
    Path(id): Path<String>,
) -> CatalogResult<Response>
where
    R: CatalogRepository,
    V: VideoHost + Send + Sync + 'static,
{
    let section_id = parse_section_id(&id)?;
    SectionUseCase::new(state.repo, state.host)
        .delete(&actor, &section_id)
        .await?;
    Ok(response::ok(serde_json::json!({ "deleted": true })))
}

pub async fn publish_section<R, V>(
    State(state): State<CatalogAppState<R, V>>,
    actor: CurrentUser,
    Path(id): Path<String>,
) -> CatalogResult<Response>
where
    R: CatalogRepository,
    V: VideoHost + Send + Sync + 'static,
{
    let section_id = parse_section_id(&id)?;
    let section = SectionUseCase::new(state.repo, state.host)
        .publish(&actor, &section_id)
        .await?;
    Ok(response::ok(SectionResponse::from(&section)))
}

pub async fn unpublish_section<R, V>(
    State(state): State<CatalogAppState<R, V>>,
    actor: CurrentUser,
    Path(id): Path<String>,
) -> CatalogResult<Response>
where
    R: CatalogRepository,
    V: VideoHost + Send + Sync + 'static,
{
    let section_id = parse_section_id(&id)?;
    let section = SectionUseCase::new(state.repo, state.host)
        .unpublish(&actor, &section_id)
        .await?;
    Ok(response::ok(SectionResponse::from(&section)))
}

pub async fn reorder_sections<R, V>(
    State(state): State<CatalogAppState<R, V>>,
    actor: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<ReorderRequest>,
) -> CatalogResult<Response>
where
    R: CatalogRepository,
    V: VideoHost + Send + Sync + 'static,
{
    let course_id = parse_course_id(&id)?;

    let mut positions = Vec::with_capacity(payload.sections.len());
    for item in payload.sections {
        let section_id = parse_section_id(&item.id)?;
        positions.push((section_id, item.position));
    }

    SectionUseCase::new(state.repo, state.host)
        .reorder(&actor, &course_id, positions)
        .await?;
    Ok(response::ok(serde_json::json!({ "reordered": true })))
}

// ============================================================================
// Section resources
// ============================================================================

pub async fn add_resource<R, V>(
    State(state): State<CatalogAppState<R, V>>,
    actor: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<AddResourceRequest>,
) -> CatalogResult<Response>
where
    R: CatalogRepository,
    V: VideoHost + Send + Sync + 'static,
{
    let section_id = parse_section_id(&id)?;
    let (name, file_url) = payload.validate().map_err(CatalogError::Validation)?;
    let resource = SectionUseCase::new(state.repo, state.host)
        .add_resource(&actor, &section_id, name, file_url)
        .await?;
    Ok(response::created(ResourceResponse::from(&resource)))
}

pub async fn delete_resource<R, V>(
    State(state): State<CatalogAppState<R, V>>,
    actor: CurrentUser,
    Path(id): Path<String>,
) -> CatalogResult<Response>
where
    R: CatalogRepository,
    V: VideoHost + Send + Sync + 'static,
{
    let resource_id =
        SectionResourceId::parse(&id).map_err(|_| CatalogError::ResourceNotFound)?;
    SectionUseCase::new(state.repo, state.host)
        .delete_resource(&actor, &resource_id)
        .await?;
    Ok(response::ok(serde_json::json!({ "deleted": true })))
}

// ============================================================================
// Enrollments and progress
// ============================================================================

pub async fn enroll<R, V>(
    State(state): State<CatalogAppState<R, V>>,
    actor: CurrentUser,
    Path(id): Path<String>,
) -> CatalogResult<Response>
where
    R: CatalogRepository,
    V: VideoHost + Send + Sync + 'static,
{
    let course_id = parse_course_id(&id)?;
    let enrollment = EnrollmentUseCase::new(state.repo)
        .enroll(&actor, &course_id)
        .await?;
    Ok(response::created(EnrollmentResponse::from(&enrollment)))
}

pub async fn list_enrollments<R, V>(
    State(state): State<CatalogAppState<R, V>>,
    actor: CurrentUser,
) -> CatalogResult<Response>
where
    R: CatalogRepository,
    V: VideoHost + Send + Sync + 'static,
{
    let pairs = EnrollmentUseCase::new(state.repo).list_own(&actor).await?;
    let body: Vec<EnrolledCourseResponse> = pairs
        .iter()
        .map(|(enrollment, course)| EnrolledCourseResponse {
            enrollment: EnrollmentResponse::from(enrollment),
            course: CourseResponse::from(course),
        })
        .collect();
    Ok(response::ok(body))
}

pub async fn toggle_progress<R, V>(
    State(state): State<CatalogAppState<R, V>>,
    actor: CurrentUser,
    Path(id): Path<String>,
) -> CatalogResult<Response>
where
    R: CatalogRepository,
    V: VideoHost + Send + Sync + 'static,
{
    let section_id = parse_section_id(&id)?;
    let output = ProgressUseCase::new(state.repo)
        .toggle(&actor, &section_id)
        .await?;
    Ok(response::ok(ProgressResponse::from(&output)))
}
