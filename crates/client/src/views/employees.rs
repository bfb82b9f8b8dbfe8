//! Employee list fragment.

use askama::Template;
use comanda_core::Role;

use super::ViewError;
use crate::api::Employee;

/// An employee card.
#[derive(Debug, Clone)]
pub struct EmployeeCardView {
    pub usuario: String,
    pub icon: &'static str,
    pub badge_class: &'static str,
    pub role_label: &'static str,
}

impl From<&Employee> for EmployeeCardView {
    fn from(employee: &Employee) -> Self {
        let (icon, badge_class) = match employee.tipo {
            Role::Admin => ("👑", "badge-admin"),
            Role::Gerente => ("👨‍💼", "badge-gerente"),
        };
        Self {
            usuario: employee.usuario.clone(),
            icon,
            badge_class,
            role_label: employee.tipo.label(),
        }
    }
}

/// Employee accounts with a remove action each.
#[derive(Debug, Template)]
#[template(path = "employees/list.html")]
pub struct EmployeeListView {
    pub employees: Vec<EmployeeCardView>,
}

impl EmployeeListView {
    #[must_use]
    pub fn new(employees: &[Employee]) -> Self {
        Self {
            employees: employees.iter().map(EmployeeCardView::from).collect(),
        }
    }

    /// # Errors
    ///
    /// Returns error if the template fails to render.
    pub fn to_html(&self) -> Result<String, ViewError> {
        Ok(self.render()?)
    }
}
