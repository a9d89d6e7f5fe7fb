use garde::Validate;
use serde::{Deserialize, Serialize};

/// A stored company. `id` is `None` until the store assigns one.
#[derive(Debug, Clone, PartialEq)]
pub struct Company {
    pub id: Option<String>,
    pub name: String,
    pub email: String,
    pub url: Option<String>,
}

/// Read DTO of a company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyData {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// Write DTO for create and update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompanyWrite {
    #[serde(default)]
    #[garde(length(max = 100))]
    pub name: String,
    #[serde(default)]
    #[garde(required, email)]
    pub email: Option<String>,
    #[serde(default)]
    #[garde(url)]
    pub url: Option<String>,
}

impl CompanyWrite {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: Some(email.into()),
            url: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}
