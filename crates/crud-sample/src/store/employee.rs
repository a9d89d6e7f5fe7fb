use super::{Filter, StoreClient};
use crate::model::{Company, Employee};
use async_trait::async_trait;
use crud_framework::{ChildStorage, PageRequest, Slice, Storage, StorageError};

/// Employees scoped to the company that owns them.
#[derive(Clone)]
pub struct EmployeeStorage {
    employees: StoreClient<Employee>,
    companies: StoreClient<Company>,
}

impl EmployeeStorage {
    pub fn new(employees: StoreClient<Employee>, companies: StoreClient<Company>) -> Self {
        Self {
            employees,
            companies,
        }
    }
}

#[async_trait]
impl Storage for EmployeeStorage {
    type Entity = Employee;
    type Id = String;

    async fn find_by_id(&self, id: &String) -> Result<Option<Employee>, StorageError> {
        self.employees.find_by_id(id).await
    }

    async fn find_page(&self, request: &PageRequest) -> Result<Slice<Employee>, StorageError> {
        self.employees.find_page(request).await
    }

    async fn save(&self, entity: Employee) -> Result<Employee, StorageError> {
        Storage::save(&self.employees, entity).await
    }

    async fn delete(&self, entity: &Employee) -> Result<(), StorageError> {
        Storage::delete(&self.employees, entity).await
    }
}

#[async_trait]
impl ChildStorage for EmployeeStorage {
    type ParentId = String;
    type Parent = Company;

    async fn find_parent(&self, company_id: &String) -> Result<Option<Company>, StorageError> {
        self.companies.find_by_id(company_id).await
    }

    async fn find_by_parent_and_id(
        &self,
        company_id: &String,
        id: &String,
    ) -> Result<Option<Employee>, StorageError> {
        let employee = self.employees.find_by_id(id).await?;
        Ok(employee.filter(|employee| &employee.company_id == company_id))
    }

    async fn find_page_by_parent(
        &self,
        company_id: &String,
        request: &PageRequest,
    ) -> Result<Slice<Employee>, StorageError> {
        let company_id = company_id.clone();
        let filter: Filter<Employee> =
            Box::new(move |employee| employee.company_id == company_id);
        Ok(self.employees.page(request.clone(), Some(filter)).await?)
    }

    fn attach_parent(&self, employee: &mut Employee, company: Company) {
        employee.company_id = company.id.unwrap_or_default();
    }
}
