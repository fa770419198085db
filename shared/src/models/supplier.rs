//! Supplier models

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A supplier of exactly one material
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: Uuid,
    pub name: String,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub material_id: Uuid,
}

impl Supplier {
    pub fn supplies(&self, material_id: Uuid) -> bool {
        self.material_id == material_id
    }
}

/// Supplier with the name of the material it supplies
#[derive(Debug, Clone, Serialize)]
pub struct SupplierView {
    #[serde(flatten)]
    pub supplier: Supplier,
    pub material_name: Option<String>,
}

/// Input for creating a supplier
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewSupplier {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 100))]
    pub contact_person: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 255))]
    pub address: Option<String>,
    pub material_id: Uuid,
}

/// Partial update of a supplier
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SupplierUpdate {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 100))]
    pub contact_person: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 255))]
    pub address: Option<String>,
    pub material_id: Option<Uuid>,
}

impl SupplierUpdate {
    pub fn apply(&self, supplier: &mut Supplier) {
        if let Some(name) = &self.name {
            supplier.name = name.clone();
        }
        if let Some(contact_person) = &self.contact_person {
            supplier.contact_person = Some(contact_person.clone());
        }
        if let Some(phone) = &self.phone {
            supplier.phone = Some(phone.clone());
        }
        if let Some(email) = &self.email {
            supplier.email = Some(email.clone());
        }
        if let Some(address) = &self.address {
            supplier.address = Some(address.clone());
        }
        if let Some(material_id) = self.material_id {
            supplier.material_id = material_id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        let input = NewSupplier {
            name: "Vidrios SA".to_string(),
            contact_person: None,
            phone: None,
            email: Some("not-an-email".to_string()),
            address: None,
            material_id: Uuid::new_v4(),
        };
        assert!(input.validate().unwrap_err().field_errors().contains_key("email"));
    }

    #[test]
    fn test_view_is_flat() {
        let supplier = Supplier {
            id: Uuid::new_v4(),
            name: "Vidrios SA".to_string(),
            contact_person: None,
            phone: None,
            email: None,
            address: None,
            material_id: Uuid::new_v4(),
        };
        let json = serde_json::to_value(SupplierView {
            supplier,
            material_name: Some("Float glass".to_string()),
        })
        .unwrap();
        assert_eq!(json["name"], "Vidrios SA");
        assert_eq!(json["material_name"], "Float glass");
    }
}
