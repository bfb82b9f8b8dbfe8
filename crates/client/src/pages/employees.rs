//! Employee account management (admin only).

use std::time::Duration;

use comanda_core::Role;
use secrecy::SecretString;
use tracing::{info, instrument, warn};

use super::{Outcome, PageError, PageLoad, require_session};
use crate::api::{ApiClient, NewEmployee};
use crate::screen::{Element, Notice, Route, Screen};
use crate::views::EmployeeListView;

/// How long in-page alerts stay visible.
const ALERT_DISPLAY: Duration = Duration::from_secs(5);
/// Delay before a non-admin is sent back to the dashboard.
const DENIED_REDIRECT_DELAY: Duration = Duration::from_secs(2);

/// Registration form values.
#[derive(Debug, Clone)]
pub struct EmployeeForm {
    pub usuario: String,
    pub senha: SecretString,
    pub tipo: Role,
}

/// Actions on the employee page.
#[derive(Debug, Clone)]
pub enum EmployeeEvent {
    Register(EmployeeForm),
    Remove(String),
}

#[derive(Debug)]
pub struct EmployeesPage<S> {
    api: ApiClient,
    screen: S,
}

impl<S: Screen> EmployeesPage<S> {
    /// Open the page. Requires an admin session: other staff get an alert
    /// and are sent to the order dashboard.
    pub async fn init(api: ApiClient, screen: S) -> PageLoad<Self> {
        let Some(session) = require_session(&api, &screen).await else {
            return PageLoad::Redirected(Route::Login);
        };

        if !session.is_admin() {
            warn!(usuario = %session.usuario, "Non-admin opened employee management");
            screen.flash(
                Element::AlertContainer,
                Notice::error("Acesso negado! Apenas administradores podem acessar esta página."),
                ALERT_DISPLAY,
            );
            screen.redirect(Route::Orders, DENIED_REDIRECT_DELAY);
            return PageLoad::Redirected(Route::Orders);
        }

        let page = Self { api, screen };
        page.refresh().await;
        PageLoad::Ready(page)
    }

    /// Reload and render the employee list.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Outcome<usize> {
        let result = async {
            let employees = self.api.list_employees().await?;
            self.screen.render(
                Element::EmployeeList,
                EmployeeListView::new(&employees).to_html()?,
            );
            Ok::<_, PageError>(employees.len())
        }
        .await;

        if let Err(e) = &result {
            warn!(error = %e, "Failed to load employees");
            self.alert(Notice::error("Erro ao carregar lista de funcionários!"));
        }
        result.into()
    }

    /// Dispatch an employee event.
    pub async fn handle(&self, event: EmployeeEvent) -> Outcome {
        match event {
            EmployeeEvent::Register(form) => self.register(form).await,
            EmployeeEvent::Remove(usuario) => self.remove(&usuario).await,
        }
    }

    /// Create an account. The username is trimmed; other validation is the
    /// backend's.
    #[instrument(skip(self, form), fields(tipo = %form.tipo))]
    pub async fn register(&self, form: EmployeeForm) -> Outcome {
        let usuario = form.usuario.trim().to_string();
        let employee = NewEmployee {
            usuario: usuario.clone(),
            senha: form.senha,
            tipo: form.tipo,
        };

        if let Err(e) = self.api.create_employee(&employee).await {
            warn!(error = %e, usuario = %usuario, "Failed to register employee");
            let e = PageError::from(e);
            self.alert(Notice::error(
                e.user_message("Erro ao cadastrar funcionário!"),
            ));
            return Outcome::Failed(e);
        }

        info!(usuario = %usuario, "Employee registered");
        self.alert(Notice::success(format!(
            "Funcionário {usuario} cadastrado com sucesso!"
        )));
        self.screen.reset_form(Element::EmployeeForm);
        self.refresh().await.map(drop)
    }

    /// Remove an account after confirmation.
    #[instrument(skip(self))]
    pub async fn remove(&self, usuario: &str) -> Outcome {
        if !self
            .screen
            .confirm(&format!("Deseja realmente remover o usuário \"{usuario}\"?"))
        {
            return Outcome::Declined;
        }

        if let Err(e) = self.api.delete_employee(usuario).await {
            warn!(error = %e, "Failed to remove employee");
            let e = PageError::from(e);
            self.alert(Notice::error(e.user_message("Erro ao remover usuário!")));
            return Outcome::Failed(e);
        }

        info!("Employee removed");
        self.alert(Notice::success(format!(
            "Usuário {usuario} removido com sucesso!"
        )));
        self.refresh().await.map(drop)
    }

    fn alert(&self, notice: Notice) {
        self.screen
            .flash(Element::AlertContainer, notice, ALERT_DISPLAY);
    }
}
