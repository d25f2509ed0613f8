//! Literales enumerables de archivos (visibilidad, réplica) y orden de sort.
//!
//! Sólo se aceptan `Y`/`N` (visibilidad) y `Yes`/`No` (réplica). Cualquier
//! valor que comience por `A` (sin distinguir mayúsculas) significa "todos" y
//! se representa como `None` en los parsers.

use serde::{Deserialize, Serialize};

use crate::DomainError;

fn means_all(raw: &str) -> bool {
    raw.trim().chars().next().map(|c| c.eq_ignore_ascii_case(&'a')).unwrap_or(false)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    Visible,
    Hidden,
}

impl Visibility {
    /// `Ok(None)` = sin restricción.
    pub fn parse(raw: &str) -> Result<Option<Self>, DomainError> {
        if means_all(raw) {
            return Ok(None);
        }
        match raw.trim().to_ascii_uppercase().as_str() {
            "Y" => Ok(Some(Self::Visible)),
            "N" => Ok(Some(Self::Hidden)),
            _ => Err(DomainError::InvalidLiteral { field: "Visible", value: raw.to_string() }),
        }
    }

    pub fn as_literal(self) -> &'static str {
        match self {
            Self::Visible => "Y",
            Self::Hidden => "N",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplicaFlag {
    Yes,
    No,
}

impl ReplicaFlag {
    pub fn parse(raw: &str) -> Result<Option<Self>, DomainError> {
        if means_all(raw) {
            return Ok(None);
        }
        match raw.trim().to_ascii_lowercase().as_str() {
            "yes" => Ok(Some(Self::Yes)),
            "no" => Ok(Some(Self::No)),
            _ => Err(DomainError::InvalidLiteral { field: "ReplicaFlag", value: raw.to_string() }),
        }
    }

    pub fn as_literal(self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(DomainError::InvalidLiteral { field: "Sort", value: raw.to_string() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anything_starting_with_a_means_all() {
        assert_eq!(Visibility::parse("ALL").unwrap(), None);
        assert_eq!(Visibility::parse("any").unwrap(), None);
        assert_eq!(ReplicaFlag::parse("All").unwrap(), None);
    }

    #[test]
    fn visibility_accepts_only_y_n() {
        assert_eq!(Visibility::parse("Y").unwrap(), Some(Visibility::Visible));
        assert_eq!(Visibility::parse("n").unwrap(), Some(Visibility::Hidden));
        assert!(Visibility::parse("Yes").is_err());
        assert!(Visibility::parse("maybe").is_err());
    }

    #[test]
    fn replica_accepts_only_yes_no() {
        assert_eq!(ReplicaFlag::parse("Yes").unwrap(), Some(ReplicaFlag::Yes));
        assert_eq!(ReplicaFlag::parse("no").unwrap(), Some(ReplicaFlag::No));
        assert!(ReplicaFlag::parse("Y").is_err());
    }

    #[test]
    fn sort_order_rejects_unknown_direction() {
        assert_eq!(SortOrder::parse("DESC").unwrap(), SortOrder::Desc);
        let err = SortOrder::parse("sideways").unwrap_err();
        assert_eq!(err, DomainError::InvalidLiteral { field: "Sort", value: "sideways".into() });
    }
}
