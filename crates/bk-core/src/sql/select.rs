use bk_domain::SortOrder;

use super::expr::{Column, Predicate, TableSet};
use crate::store::SqlValue;

#[derive(Debug, Clone, PartialEq)]
pub enum SelectItem {
    Column(Column),
    CountAll,
    Count(Column),
    Sum(Column),
    Max(Column),
}

impl SelectItem {
    pub fn is_aggregate(&self) -> bool {
        !matches!(self, SelectItem::Column(_))
    }

    fn render(&self) -> String {
        match self {
            SelectItem::Column(c) => c.to_string(),
            SelectItem::CountAll => "COUNT(*)".to_string(),
            SelectItem::Count(c) => format!("COUNT({c})"),
            SelectItem::Sum(c) => format!("SUM({c})"),
            SelectItem::Max(c) => format!("MAX({c})"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderBy {
    pub column: Column,
    pub order: SortOrder,
}

/// Ventana de paginación: `StartItem` (desplazamiento) y `MaxItem`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub start_item: u64,
    pub max_item: u64,
}

/// Consulta SELECT compuesta.
///
/// `joins` guarda las condiciones estructurales (uniones entre tablas) y
/// `filter` las condiciones aportadas por las facetas; ambas se renderizan
/// como una sola conjunción.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Select {
    pub items: Vec<SelectItem>,
    pub distinct: bool,
    pub tables: TableSet,
    pub joins: Vec<Predicate>,
    pub filter: Vec<Predicate>,
    pub order_by: Vec<OrderBy>,
    pub paging: Option<Paging>,
    /// Subconsulta de origen: si está presente, `FROM` la envuelve y
    /// `tables`/condiciones se ignoran.
    pub source: Option<Box<Select>>,
}

impl Select {
    pub fn columns(columns: &[Column]) -> Self {
        Self { items: columns.iter().copied().map(SelectItem::Column).collect(), ..Default::default() }
    }

    pub fn conditions(&self) -> impl Iterator<Item = &Predicate> {
        self.joins.iter().chain(self.filter.iter())
    }

    pub fn where_clause(&self) -> Option<String> {
        let parts: Vec<String> = self.conditions().map(Predicate::render).collect();
        if parts.is_empty() { None } else { Some(parts.join(" AND ")) }
    }

    /// Misma consulta reducida a `COUNT(*)`, sin orden ni paginación. Con
    /// `DISTINCT` cuenta las filas distintas de una subconsulta.
    pub fn to_count(&self) -> Select {
        if self.distinct {
            let inner = Select { order_by: Vec::new(), paging: None, ..self.clone() };
            return Select { items: vec![SelectItem::CountAll], source: Some(Box::new(inner)), ..Default::default() };
        }
        Select { items: vec![SelectItem::CountAll],
                 distinct: false,
                 tables: self.tables.clone(),
                 joins: self.joins.clone(),
                 filter: self.filter.clone(),
                 order_by: Vec::new(),
                 paging: None,
                 source: None }
    }

    pub fn to_sql(&self) -> String {
        self.render(false)
    }

    /// Como `to_sql`, pero cada elemento lleva el alias `cN` de su posición.
    /// Un backend que devuelve filas como objetos las reordena por ese alias.
    pub fn to_positional_sql(&self) -> String {
        self.render(true)
    }

    fn render(&self, positional: bool) -> String {
        let items = self.items
                        .iter()
                        .enumerate()
                        .map(|(i, item)| {
                            if positional { format!("{} AS c{i}", item.render()) } else { item.render() }
                        })
                        .collect::<Vec<_>>()
                        .join(", ");
        let from = match &self.source {
            Some(inner) => format!("({}) q", inner.render(true)),
            None => self.tables.render(),
        };
        let mut sql = format!("SELECT {}{} FROM {}", if self.distinct { "DISTINCT " } else { "" }, items, from);
        if let Some(w) = self.where_clause() {
            sql.push_str(" WHERE ");
            sql.push_str(&w);
        }
        if !self.order_by.is_empty() {
            let order = self.order_by
                            .iter()
                            .map(|o| {
                                format!("{} {}", o.column, match o.order {
                                    SortOrder::Asc => "ASC",
                                    SortOrder::Desc => "DESC",
                                })
                            })
                            .collect::<Vec<_>>()
                            .join(", ");
            sql.push_str(" ORDER BY ");
            sql.push_str(&order);
        }
        if let Some(p) = self.paging {
            sql.push_str(&format!(" OFFSET {} ROWS FETCH NEXT {} ROWS ONLY", p.start_item, p.max_item));
        }
        sql
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub table: &'static str,
    pub columns: Vec<&'static str>,
    pub values: Vec<SqlValue>,
}

impl Insert {
    pub fn to_sql(&self) -> String {
        format!("INSERT INTO {} ({}) VALUES ({})",
                self.table,
                self.columns.join(", "),
                self.values.iter().map(SqlValue::render_literal).collect::<Vec<_>>().join(", "))
    }
}
