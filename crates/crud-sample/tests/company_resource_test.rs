//! The company resource end to end: typed client -> router -> handler -> store actor.

use crud_framework::{
    CrudError, Direction, PageRequest, RestResource, RouterTransport, Transport,
    TransportRequest,
};
use crud_sample::config::AppConfig;
use crud_sample::lifecycle::CompanySystem;
use crud_sample::model::{Company, CompanyData, CompanyWrite};
use http::{Method, StatusCode};
use std::sync::Arc;

const BASE_URL: &str = "http://localhost/api/company";

struct TestApp {
    system: CompanySystem,
    transport: Arc<dyn Transport>,
    companies: RestResource<String, CompanyData, CompanyWrite>,
}

impl TestApp {
    fn new() -> Self {
        let system = CompanySystem::new(&AppConfig::default());
        let transport: Arc<dyn Transport> = Arc::new(RouterTransport::new(system.router()));
        let companies = RestResource::new(transport.clone(), BASE_URL);
        Self {
            system,
            transport,
            companies,
        }
    }

    /// Store a company directly, bypassing the HTTP layer.
    async fn seed(&self, name: &str) -> Company {
        self.system
            .companies()
            .save(Company {
                id: None,
                name: name.to_string(),
                email: format!("{name}@company.org"),
                url: Some(format!("https://{name}.org")),
            })
            .await
            .unwrap()
    }

    async fn stored(&self, id: &str) -> Option<Company> {
        self.system.companies().get(id).await.unwrap()
    }
}

fn assert_company_same(company: &Company, data: &CompanyData) {
    assert_eq!(company.id.as_deref(), Some(data.id.as_str()));
    assert_company_same_without_id(company, data);
}

fn assert_company_same_without_id(company: &Company, data: &CompanyData) {
    assert_eq!(company.name, data.name);
    assert_eq!(company.email, data.email);
    assert_eq!(company.url, data.url);
}

#[tokio::test]
async fn test_get_company() {
    let app = TestApp::new();
    let company = app.seed("default-company").await;

    let data = app
        .companies
        .get_by_id(company.id.as_ref().unwrap())
        .await
        .unwrap();

    assert_company_same(&company, &data.unwrap());
}

#[tokio::test]
async fn test_unknown_company_is_none() {
    let app = TestApp::new();

    let data = app.companies.get_by_id(&"notexisting".to_string()).await.unwrap();

    assert_eq!(data, None);
}

#[tokio::test]
async fn test_find_all_companies() {
    let app = TestApp::new();
    let company = app.seed("default-company").await;

    let result = app.companies.find(0, 10).await.unwrap();

    assert_eq!(result.total_elements(), 1);
    assert_eq!(result.page(), 0);
    assert_eq!(result.total_pages(), 1);
    assert_eq!(result.page_size(), 10);
    assert_eq!(result.len(), 1);
    assert_company_same(&company, &result.content()[0]);
}

#[tokio::test]
async fn test_execute_all_companies() {
    let app = TestApp::new();
    app.seed("default-company").await;

    let mut calls = 0;
    let count = app
        .companies
        .execute_all(1, |_| calls += 1)
        .await
        .unwrap();

    assert_eq!(calls, 1);
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_execute_all_with_size_above_maximum() {
    let app = TestApp::new();
    for i in 0..150 {
        app.seed(&format!("company-{i}")).await;
    }

    let mut calls = 0;
    let count = app
        .companies
        .execute_all(200, |_| calls += 1)
        .await
        .unwrap();

    assert_eq!(calls, 150);
    assert_eq!(count, 150);
}

#[tokio::test]
async fn test_get_by_id_keeps_odd_ids_in_one_segment() {
    let app = TestApp::new();
    let company = app.seed("default-company").await;
    let id = company.id.unwrap();

    let with_query = format!("{id}?page=1");
    assert_eq!(app.companies.get_by_id(&with_query).await.unwrap(), None);
    assert_eq!(app.companies.get_by_id(&"no such id".to_string()).await.unwrap(), None);
    assert!(app.companies.get_by_id(&id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_create_company() {
    let app = TestApp::new();
    let write = CompanyWrite::new("testcompany", "test@company.org").with_url("https://company.org");

    let data = app.companies.create(&write).await.unwrap();

    assert!(!data.id.is_empty());
    let stored = app.stored(&data.id).await.unwrap();
    assert_company_same(&stored, &data);
}

#[tokio::test]
async fn test_create_answers_201() {
    let app = TestApp::new();
    let body = serde_json::to_vec(
        &CompanyWrite::new("new-create", "new@company.org").with_url("https://company.org"),
    )
    .unwrap();

    let response = app
        .transport
        .exchange(TransportRequest::new(Method::POST, BASE_URL).json(body))
        .await
        .unwrap();

    assert_eq!(response.status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_invalid_company_is_not_created() {
    let app = TestApp::new();
    let write = CompanyWrite {
        name: "testcompany".into(),
        email: None,
        url: Some("https://company.org".into()),
    };

    let err = app.companies.create(&write).await.unwrap_err();

    let response = err.error_response().expect("validation body");
    assert!(response.fields().contains_key("email"));
    assert!(!response.first_field_value("email").unwrap_or_default().is_empty());
    assert_eq!(app.companies.find(0, 10).await.unwrap().total_elements(), 0);
}

#[tokio::test]
async fn test_invalid_url_is_reported() {
    let app = TestApp::new();
    let write = CompanyWrite::new("testcompany", "test@company.org").with_url("not a url");

    let err = app.companies.create(&write).await.unwrap_err();

    assert!(err.error_response().is_some_and(|r| r.has_field("url")));
}

#[tokio::test]
async fn test_update_company() {
    let app = TestApp::new();
    let company = app.seed("default-company").await;
    let id = company.id.unwrap();
    let write = CompanyWrite::new("testcompany all new", "test@company2.org")
        .with_url("https://company2.org");

    let data = app.companies.update(&id, &write).await.unwrap();

    assert_eq!(data.id, id);
    assert_eq!(data.name, write.name);
    assert_eq!(Some(&data.email), write.email.as_ref());
    assert_eq!(data.url, write.url);
    assert_company_same(&app.stored(&id).await.unwrap(), &data);
}

#[tokio::test]
async fn test_update_unknown_company_is_not_found() {
    let app = TestApp::new();
    let write = CompanyWrite::new("x", "x@company.org");

    let result = app.companies.update(&"notexisting".to_string(), &write).await;

    assert!(matches!(result, Err(CrudError::NotFound(_))));
}

#[tokio::test]
async fn test_delete_company() {
    let app = TestApp::new();
    let company = app.seed("default-company").await;
    let id = company.id.unwrap();

    app.companies.delete(&id).await.unwrap();

    assert_eq!(app.stored(&id).await, None);
    assert!(matches!(
        app.companies.delete(&id).await,
        Err(CrudError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_sort_asc() {
    let app = TestApp::new();
    app.seed("default-company").await;
    let a_company = app.seed("a-company").await;

    let request = PageRequest::of(0, 100).sorted_by("name", Direction::Asc);
    let result = app.companies.find_with(&request).await.unwrap();

    assert_eq!(result.total_elements(), 2);
    assert_eq!(result.page(), 0);
    assert_eq!(result.total_pages(), 1);
    assert_eq!(result.len(), 2);
    assert_company_same_without_id(&a_company, &result.content()[0]);
}

#[tokio::test]
async fn test_sort_desc() {
    let app = TestApp::new();
    let default_company = app.seed("default-company").await;
    app.seed("a-company").await;

    let request = PageRequest::of(0, 100).sorted_by("name", Direction::Desc);
    let result = app.companies.find_with(&request).await.unwrap();

    assert_eq!(result.total_elements(), 2);
    assert_company_same_without_id(&default_company, &result.content()[0]);
}

#[tokio::test]
async fn test_sort_by_unknown_field_is_rejected() {
    let app = TestApp::new();
    let request = PageRequest::of(0, 10).sorted_by("revenue", Direction::Asc);

    let err = app.companies.find_with(&request).await.unwrap_err();

    assert!(matches!(err, CrudError::BadRequest(message) if message.contains("revenue")));
}

#[tokio::test]
async fn test_shutdown_after_clients_are_gone() {
    let app = TestApp::new();
    app.seed("default-company").await;

    let TestApp {
        system,
        transport,
        companies,
    } = app;
    drop(companies);
    drop(transport);

    system.shutdown().await;
}
