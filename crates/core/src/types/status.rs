//! Status and role enums exchanged with the backend.
//!
//! Wire values are the Portuguese strings the backend stores
//! (`"Pendente"`, `"admin"`, ...).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a wire string does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind}: {value}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

/// Order lifecycle status.
///
/// Orders move forward only: Pendente -> Preparando -> Pronto -> Entregue.
/// `Cancelado` is accepted by the backend but never offered as an action.
/// Any other string, or a missing one, maps to `Unknown` so one odd record
/// does not break a list and gets no actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    Pendente,
    Preparando,
    Pronto,
    Entregue,
    Cancelado,
    #[default]
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    /// The wire/display label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pendente => "Pendente",
            Self::Preparando => "Preparando",
            Self::Pronto => "Pronto",
            Self::Entregue => "Entregue",
            Self::Cancelado => "Cancelado",
            Self::Unknown => "Desconhecido",
        }
    }

    /// The status the "advance" action moves this order to, if any.
    #[must_use]
    pub const fn next(&self) -> Option<Self> {
        match self {
            Self::Pendente => Some(Self::Preparando),
            Self::Preparando => Some(Self::Pronto),
            Self::Pronto => Some(Self::Entregue),
            Self::Entregue | Self::Cancelado | Self::Unknown => None,
        }
    }

    /// Whether the order can still be cancelled (removed) from the dashboard.
    #[must_use]
    pub const fn is_cancellable(&self) -> bool {
        matches!(self, Self::Pendente)
    }

    /// CSS modifier used by the status badge (`status-pendente`, ...).
    #[must_use]
    pub fn css_class(&self) -> String {
        format!("status-{}", self.as_str().to_lowercase())
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pendente" => Ok(Self::Pendente),
            "preparando" => Ok(Self::Preparando),
            "pronto" => Ok(Self::Pronto),
            "entregue" => Ok(Self::Entregue),
            "cancelado" => Ok(Self::Cancelado),
            _ => Err(ParseEnumError {
                kind: "order status",
                value: s.to_owned(),
            }),
        }
    }
}

/// Employee role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access, including employee management and system reset.
    Admin,
    /// Day-to-day order and product management.
    #[default]
    Gerente,
}

impl Role {
    /// Human label shown on badges.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Admin => "Administrador",
            Self::Gerente => "Gerente",
        }
    }

    /// Whether this role may use admin-only features.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Gerente => write!(f, "gerente"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "gerente" => Ok(Self::Gerente),
            _ => Err(ParseEnumError {
                kind: "role",
                value: s.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_moves_forward_only() {
        assert_eq!(OrderStatus::Pendente.next(), Some(OrderStatus::Preparando));
        assert_eq!(OrderStatus::Preparando.next(), Some(OrderStatus::Pronto));
        assert_eq!(OrderStatus::Pronto.next(), Some(OrderStatus::Entregue));
        assert_eq!(OrderStatus::Entregue.next(), None);
        assert_eq!(OrderStatus::Cancelado.next(), None);
    }

    #[test]
    fn test_status_wire_format() {
        let status: OrderStatus = serde_json::from_str("\"Preparando\"").unwrap();
        assert_eq!(status, OrderStatus::Preparando);
        assert_eq!(
            serde_json::to_string(&OrderStatus::Entregue).unwrap(),
            "\"Entregue\""
        );

        let odd: OrderStatus = serde_json::from_str("\"Arquivado\"").unwrap();
        assert_eq!(odd, OrderStatus::Unknown);
        assert_eq!(odd.next(), None);
        assert_eq!(OrderStatus::default(), OrderStatus::Unknown);
        assert!(!OrderStatus::default().is_cancellable());
    }

    #[test]
    fn test_status_css_class() {
        assert_eq!(OrderStatus::Pendente.css_class(), "status-pendente");
    }

    #[test]
    fn test_status_from_str_is_case_insensitive() {
        assert_eq!("pronto".parse::<OrderStatus>(), Ok(OrderStatus::Pronto));
        assert!("x".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_role_round_trip() {
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!(Role::Gerente.to_string(), "gerente");
        let role: Role = serde_json::from_str("\"gerente\"").unwrap();
        assert_eq!(role, Role::Gerente);
        assert!("dono".parse::<Role>().is_err());
    }
}
