use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AppRole {
    #[default]
    Employee,
    Admin,
    BackendAdmin,
}

impl Display for AppRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let role = match self {
            AppRole::Employee => "employee",
            AppRole::Admin => "admin",
            AppRole::BackendAdmin => "backend_admin",
        };
        write!(f, "{}", role)
    }
}

impl AppRole {
    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "employee" => Some(AppRole::Employee),
            "admin" => Some(AppRole::Admin),
            "backend_admin" => Some(AppRole::BackendAdmin),
            _ => None,
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            AppRole::Employee => 0,
            AppRole::Admin => 1,
            AppRole::BackendAdmin => 2,
        }
    }

    /// Collapses the role rows stored for one user into a single effective
    /// role. Precedence: backend_admin > admin > employee, independent of
    /// the order the rows came back from the store.
    pub fn resolve(roles: &[String]) -> Option<AppRole> {
        roles
            .iter()
            .filter_map(|role| AppRole::from_str(role))
            .max_by_key(AppRole::precedence)
    }

    pub fn is_admin_or_higher(&self) -> bool {
        self.precedence() >= AppRole::Admin.precedence()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_highest_role_regardless_of_row_order() {
        let rows = vec![
            "employee".to_string(),
            "backend_admin".to_string(),
            "admin".to_string(),
        ];
        assert_eq!(AppRole::resolve(&rows), Some(AppRole::BackendAdmin));

        let rows = vec!["admin".to_string(), "employee".to_string()];
        assert_eq!(AppRole::resolve(&rows), Some(AppRole::Admin));
    }

    #[test]
    fn unknown_role_strings_are_ignored() {
        let rows = vec!["superuser".to_string(), "employee".to_string()];
        assert_eq!(AppRole::resolve(&rows), Some(AppRole::Employee));

        let rows = vec!["superuser".to_string()];
        assert_eq!(AppRole::resolve(&rows), None);
    }

    #[test]
    fn admin_gate_accepts_admin_and_backend_admin() {
        assert!(AppRole::Admin.is_admin_or_higher());
        assert!(AppRole::BackendAdmin.is_admin_or_higher());
        assert!(!AppRole::Employee.is_admin_or_higher());
    }
}
