//! Departments and Categories

use std::sync::Arc;

use kernel::actor::CurrentUser;

use crate::domain::entity::category::CategoryTree;
use crate::domain::entity::department::Department;
use crate::domain::repository::{CategoryRepository, DepartmentRepository};
use crate::error::{CatalogError, CatalogResult};

pub struct TaxonomyUseCase<R> {
    repo: Arc<R>,
}

impl<R> TaxonomyUseCase<R>
where
    R: DepartmentRepository + CategoryRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn list_departments(&self) -> CatalogResult<Vec<Department>> {
        DepartmentRepository::list(&*self.repo).await
    }

    pub async fn create_department(
        &self,
        actor: &CurrentUser,
        name: String,
        code: Option<String>,
    ) -> CatalogResult<Department> {
        if !actor.role.is_admin() {
            return Err(CatalogError::Forbidden);
        }

        let department = Department::new(name, code);
        self.repo.create(&department).await?;

        tracing::info!(department_id = %department.department_id, "Department created");
        Ok(department)
    }

    pub async fn list_categories(&self) -> CatalogResult<Vec<CategoryTree>> {
        self.repo.list_tree().await
    }
}
