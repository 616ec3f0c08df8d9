use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Worker {
    pub id: String,
    pub name: String,
    pub project_id: Option<String>,
}
