use garde::Validate;
use serde::{Deserialize, Serialize};

/// A stored employee, always owned by one company.
#[derive(Debug, Clone, PartialEq)]
pub struct Employee {
    pub id: Option<String>,
    pub company_id: String,
    pub name: String,
    pub email: String,
    pub position: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeData {
    pub id: String,
    pub company_id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub position: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeWrite {
    #[serde(default)]
    #[garde(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    #[garde(required, email)]
    pub email: Option<String>,
    #[serde(default)]
    #[garde(skip)]
    pub position: Option<String>,
}

impl EmployeeWrite {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: Some(email.into()),
            position: None,
        }
    }

    pub fn with_position(mut self, position: impl Into<String>) -> Self {
        self.position = Some(position.into());
        self
    }
}
