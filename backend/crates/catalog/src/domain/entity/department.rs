//! Department Entity

use chrono::{DateTime, Utc};
use kernel::id::DepartmentId;

/// Academic department
#[derive(Debug, Clone)]
pub struct Department {
    pub department_id: DepartmentId,
    pub name: String,
    /// Short code such as "CSE" or "ME"
    pub code: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Department {
    pub fn new(name: String, code: Option<String>) -> Self {
        Self {
            department_id: DepartmentId::new(),
            name,
            code,
            created_at: Utc::now(),
        }
    }
}
