//! Valor de faceta: "sin restricción", un escalar o una lista.
//!
//! Los clientes usan un único literal (`"ALL"`) para marcar una faceta no
//! suministrada, sea string, entero o lista. Ese marcador es la variante
//! `Unconstrained`, que se evalúa antes de cualquier validación del tipo.

use serde::{Deserialize, Serialize};

/// Literal histórico que significa "faceta no suministrada".
pub const SENTINEL: &str = "ALL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum Facet<T> {
    #[default]
    Unconstrained,
    One(T),
    Many(Vec<T>),
}

impl<T> Facet<T> {
    pub fn is_unconstrained(&self) -> bool {
        matches!(self, Facet::Unconstrained)
    }

    /// Valores suministrados, como slice (vacío si `Unconstrained`).
    pub fn values(&self) -> &[T] {
        match self {
            Facet::Unconstrained => &[],
            Facet::One(v) => std::slice::from_ref(v),
            Facet::Many(vs) => vs,
        }
    }

    /// Devuelve el escalar si la faceta tiene exactamente la forma `One`.
    pub fn as_one(&self) -> Option<&T> {
        match self {
            Facet::One(v) => Some(v),
            _ => None,
        }
    }

    pub fn map<U, F: FnMut(&T) -> U>(&self, mut f: F) -> Facet<U> {
        match self {
            Facet::Unconstrained => Facet::Unconstrained,
            Facet::One(v) => Facet::One(f(v)),
            Facet::Many(vs) => Facet::Many(vs.iter().map(f).collect()),
        }
    }
}

impl<T> From<Option<T>> for Facet<T> {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => Facet::One(v),
            None => Facet::Unconstrained,
        }
    }
}

impl<T> From<Vec<T>> for Facet<T> {
    fn from(v: Vec<T>) -> Self {
        Facet::Many(v)
    }
}
