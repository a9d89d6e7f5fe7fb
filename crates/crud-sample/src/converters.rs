//! Entity <-> DTO mapping for the sample resources.

use crate::model::{Company, CompanyData, CompanyWrite, Employee, EmployeeData, EmployeeWrite};
use crud_framework::Converter;

#[derive(Debug, Clone, Copy, Default)]
pub struct CompanyConverter;

impl Converter<Company> for CompanyConverter {
    type Data = CompanyData;
    type Edit = CompanyWrite;

    fn from_entity(&self, company: &Company) -> CompanyData {
        CompanyData {
            id: company.id.clone().unwrap_or_default(),
            name: company.name.clone(),
            email: company.email.clone(),
            url: company.url.clone(),
        }
    }

    fn new_entity(&self, edit: CompanyWrite) -> Company {
        Company {
            id: None,
            name: edit.name,
            email: edit.email.unwrap_or_default(),
            url: edit.url,
        }
    }

    fn update_entity_from_edit(&self, edit: CompanyWrite, company: &mut Company) {
        company.name = edit.name;
        company.email = edit.email.unwrap_or_default();
        company.url = edit.url;
    }
}

/// The owning company is attached by the storage, never taken from the body.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmployeeConverter;

impl Converter<Employee> for EmployeeConverter {
    type Data = EmployeeData;
    type Edit = EmployeeWrite;

    fn from_entity(&self, employee: &Employee) -> EmployeeData {
        EmployeeData {
            id: employee.id.clone().unwrap_or_default(),
            company_id: employee.company_id.clone(),
            name: employee.name.clone(),
            email: employee.email.clone(),
            position: employee.position.clone(),
        }
    }

    fn new_entity(&self, edit: EmployeeWrite) -> Employee {
        Employee {
            id: None,
            company_id: String::new(),
            name: edit.name,
            email: edit.email.unwrap_or_default(),
            position: edit.position,
        }
    }

    fn update_entity_from_edit(&self, edit: EmployeeWrite, employee: &mut Employee) {
        employee.name = edit.name;
        employee.email = edit.email.unwrap_or_default();
        employee.position = edit.position;
    }
}
