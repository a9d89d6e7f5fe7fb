use super::{SortValue, StoreEntity};
use crate::model::{Company, Employee};

impl StoreEntity for Company {
    const SORT_FIELDS: &'static [&'static str] = &["id", "name", "email", "url"];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }

    fn sort_value(&self, field: &str) -> SortValue<'_> {
        match field {
            "id" => self.id.as_deref().into(),
            "name" => SortValue::Text(&self.name),
            "email" => SortValue::Text(&self.email),
            "url" => self.url.as_deref().into(),
            _ => SortValue::Empty,
        }
    }
}

impl StoreEntity for Employee {
    const SORT_FIELDS: &'static [&'static str] = &["id", "companyId", "name", "email", "position"];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }

    fn sort_value(&self, field: &str) -> SortValue<'_> {
        match field {
            "id" => self.id.as_deref().into(),
            "companyId" => SortValue::Text(&self.company_id),
            "name" => SortValue::Text(&self.name),
            "email" => SortValue::Text(&self.email),
            "position" => self.position.as_deref().into(),
            _ => SortValue::Empty,
        }
    }
}
