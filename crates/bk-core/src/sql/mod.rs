//! Constructor estructurado de SQL.
//!
//! Los filtros se componen como un AST (`Predicate`) y se renderizan al final,
//! en vez de concatenar texto en cada faceta. Reglas de render:
//! - la conjunción de nivel superior se une con ` AND ` sin paréntesis;
//! - todo `Or` va entre paréntesis, incluso con un solo miembro;
//! - un `And` anidado dentro de un `Or` va entre paréntesis.

pub mod expr;
pub mod select;

pub use expr::{CmpOp, Column, Predicate, TableRef, TableSet};
pub use select::{Insert, OrderBy, Paging, Select, SelectItem};
