use crate::config::AppConfig;
use crate::converters::{CompanyConverter, EmployeeConverter};
use crate::logging::log_requests;
use crate::model::{Company, Employee};
use crate::store::{EmployeeStorage, StoreActor, StoreClient};
use axum::{middleware, Router};
use crud_framework::{child_resource_router, resource_router, ChildResourceHandler, ResourceHandler};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

pub const COMPANY_PATH: &str = "/api/company";
pub const EMPLOYEE_PATH: &str = "employee";

const STORE_BUFFER: usize = 32;

fn id_generator(prefix: &'static str) -> impl FnMut() -> String + Send + 'static {
    let counter = AtomicU64::new(1);
    move || format!("{prefix}_{}", counter.fetch_add(1, Ordering::SeqCst))
}

/// The running sample: company and employee stores plus the HTTP router.
///
/// ```ignore
/// let system = CompanySystem::new(&AppConfig::default());
/// axum::serve(listener, system.router()).await?;
/// system.shutdown().await;
/// ```
pub struct CompanySystem {
    companies: StoreClient<Company>,
    employees: StoreClient<Employee>,
    router: Router,
    handles: Vec<JoinHandle<()>>,
}

impl CompanySystem {
    /// Spawns the stores and builds the router. Must be called inside a Tokio runtime.
    pub fn new(config: &AppConfig) -> Self {
        let (company_actor, companies) = StoreActor::<Company>::new(STORE_BUFFER, id_generator("company"));
        let (employee_actor, employees) = StoreActor::<Employee>::new(STORE_BUFFER, id_generator("employee"));
        let handles = vec![
            tokio::spawn(company_actor.run()),
            tokio::spawn(employee_actor.run()),
        ];

        let company_handler =
            ResourceHandler::new(companies.clone(), CompanyConverter, config.paging);
        let employee_handler = ChildResourceHandler::new(
            EmployeeStorage::new(employees.clone(), companies.clone()),
            EmployeeConverter,
            config.paging,
        );

        let router = resource_router(Arc::new(company_handler), COMPANY_PATH)
            .merge(child_resource_router(
                Arc::new(employee_handler),
                COMPANY_PATH,
                EMPLOYEE_PATH,
            ))
            .layer(middleware::from_fn_with_state(
                Arc::new(config.logging.clone()),
                log_requests,
            ));

        info!(
            default_page_size = config.paging.default_page_size,
            max_page_size = config.paging.max_page_size,
            "Company system started"
        );

        Self {
            companies,
            employees,
            router,
            handles,
        }
    }

    /// A handle on the application router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn companies(&self) -> &StoreClient<Company> {
        &self.companies
    }

    pub fn employees(&self) -> &StoreClient<Employee> {
        &self.employees
    }

    /// Drops the system's handles and waits for both stores to drain.
    pub async fn shutdown(self) {
        let Self {
            companies,
            employees,
            router,
            handles,
        } = self;
        drop(router);
        drop(companies);
        drop(employees);

        for handle in handles {
            if let Err(e) = handle.await {
                warn!(error = %e, "Store task failed");
            }
        }
        info!("Company system stopped");
    }
}
