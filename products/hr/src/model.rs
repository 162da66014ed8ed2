use entity::employee;
use serde::{Deserialize, Serialize};

/// A stored or to-be-stored employee. `id == 0` means storage has not
/// assigned one yet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(default)]
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl Employee {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
        }
    }

    pub fn is_new(&self) -> bool {
        self.id <= 0
    }

    /// Copy every provided field onto this record. The id never changes.
    pub fn apply(&mut self, changes: EmployeeChanges) {
        if let Some(first_name) = changes.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = changes.last_name {
            self.last_name = last_name;
        }
        if let Some(email) = changes.email {
            self.email = email;
        }
    }
}

/// Body of an update request. Absent fields keep their stored value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmployeeChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl From<employee::Model> for Employee {
    fn from(model: employee::Model) -> Self {
        Self {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_uses_camel_case_and_defaults_the_id() {
        let employee: Employee = serde_json::from_value(json!({
            "firstName": "Todimu",
            "lastName": "Isewon",
            "email": "todi@gmail.com"
        }))
        .unwrap();
        assert!(employee.is_new());
        assert_eq!(employee, Employee::new("Todimu", "Isewon", "todi@gmail.com"));

        let value = serde_json::to_value(Employee { id: 7, ..employee }).unwrap();
        assert_eq!(
            value,
            json!({"id": 7, "firstName": "Todimu", "lastName": "Isewon", "email": "todi@gmail.com"})
        );
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let parsed = serde_json::from_value::<Employee>(json!({"firstName": "Todimu"}));
        assert!(parsed.is_err());
    }

    #[test]
    fn apply_only_touches_present_fields() {
        let mut employee = Employee {
            id: 3,
            ..Employee::new("Todimu", "Isewon", "todi@gmail.com")
        };
        let changes: EmployeeChanges = serde_json::from_value(json!({
            "firstName": "Lani",
            "email": "todimu@gmail.com"
        }))
        .unwrap();
        employee.apply(changes);
        assert_eq!(employee.id, 3);
        assert_eq!(employee.first_name, "Lani");
        assert_eq!(employee.last_name, "Isewon");
        assert_eq!(employee.email, "todimu@gmail.com");
    }
}
