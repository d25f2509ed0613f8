use std::fmt;

use crate::store::SqlValue;

/// Tabla con alias (`files f`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableRef {
    pub name: &'static str,
    pub alias: &'static str,
}

impl TableRef {
    pub const fn new(name: &'static str, alias: &'static str) -> Self {
        Self { name, alias }
    }

    pub const fn col(self, name: &'static str) -> Column {
        Column { alias: self.alias, name }
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.alias)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Column {
    pub alias: &'static str,
    pub name: &'static str,
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.alias, self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CmpOp {
    pub fn symbol(self) -> &'static str {
        match self {
            CmpOp::Eq => "=",
            CmpOp::Ne => "<>",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
        }
    }

    pub fn holds(self, ord: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering::*;
        match self {
            CmpOp::Eq => ord == Equal,
            CmpOp::Ne => ord != Equal,
            CmpOp::Lt => ord == Less,
            CmpOp::Le => ord != Greater,
            CmpOp::Gt => ord == Greater,
            CmpOp::Ge => ord != Less,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Compare(Column, CmpOp, SqlValue),
    ColumnEq(Column, Column),
    IsNull(Column),
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
}

impl Predicate {
    pub fn eq(column: Column, value: impl Into<SqlValue>) -> Self {
        Predicate::Compare(column, CmpOp::Eq, value.into())
    }

    pub fn cmp(column: Column, op: CmpOp, value: impl Into<SqlValue>) -> Self {
        Predicate::Compare(column, op, value.into())
    }

    pub fn join(left: Column, right: Column) -> Self {
        Predicate::ColumnEq(left, right)
    }

    /// Grupo OR de igualdades (siempre entre paréntesis al renderizar).
    pub fn any_of<I, V>(column: Column, values: I) -> Self
        where I: IntoIterator<Item = V>,
              V: Into<SqlValue>
    {
        Predicate::Or(values.into_iter().map(|v| Predicate::eq(column, v)).collect())
    }

    /// Aliases de tabla referenciados por el predicado.
    pub fn aliases(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        self.collect_aliases(&mut out);
        out
    }

    fn collect_aliases(&self, out: &mut Vec<&'static str>) {
        match self {
            Predicate::Compare(c, _, _) | Predicate::IsNull(c) => out.push(c.alias),
            Predicate::ColumnEq(a, b) => {
                out.push(a.alias);
                out.push(b.alias);
            }
            Predicate::And(ps) | Predicate::Or(ps) => ps.iter().for_each(|p| p.collect_aliases(out)),
        }
    }

    pub fn render(&self) -> String {
        self.render_nested(false)
    }

    fn render_nested(&self, nested: bool) -> String {
        match self {
            Predicate::Compare(c, op, v) => format!("{c} {} {}", op.symbol(), v.render_literal()),
            Predicate::ColumnEq(a, b) => format!("{a} = {b}"),
            Predicate::IsNull(c) => format!("{c} IS NULL"),
            Predicate::And(ps) => {
                let body = ps.iter().map(|p| p.render_nested(true)).collect::<Vec<_>>().join(" AND ");
                if nested && ps.len() > 1 { format!("({body})") } else { body }
            }
            Predicate::Or(ps) => {
                let body = ps.iter().map(|p| p.render_nested(true)).collect::<Vec<_>>().join(" OR ");
                format!("({body})")
            }
        }
    }
}

/// Lista ordenada de tablas de la cláusula FROM.
///
/// Una tabla no se agrega dos veces: se busca `nombre alias` como entrada
/// completa, sin distinguir mayúsculas, en el texto acumulado delimitado por
/// comas.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableSet {
    tables: Vec<TableRef>,
}

impl TableSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, table: TableRef) -> bool {
        let haystack = format!(", {},", self.render().to_lowercase());
        let needle = format!(", {},", table.to_string().to_lowercase());
        haystack.contains(&needle)
    }

    /// Agrega la tabla si falta; devuelve `true` si fue agregada.
    pub fn add(&mut self, table: TableRef) -> bool {
        if self.contains(table) {
            return false;
        }
        self.tables.push(table);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &TableRef> {
        self.tables.iter()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn render(&self) -> String {
        self.tables.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const F: TableRef = TableRef::new("files", "f");
    const IF: TableRef = TableRef::new("inputfiles", "fi");

    #[test]
    fn or_group_is_always_parenthesized() {
        let p = Predicate::any_of(F.col("eventtypeid"), [90000000i64]);
        assert_eq!(p.render(), "(f.eventtypeid = 90000000)");
    }

    #[test]
    fn and_inside_or_is_parenthesized() {
        let run = F.col("runnumber");
        let p = Predicate::Or(vec![
            Predicate::And(vec![Predicate::cmp(run, CmpOp::Ge, 15i64), Predicate::cmp(run, CmpOp::Le, 25i64)]),
            Predicate::any_of(run, [10i64, 20]),
        ]);
        assert_eq!(p.render(),
                   "((f.runnumber >= 15 AND f.runnumber <= 25) OR (f.runnumber = 10 OR f.runnumber = 20))");
    }

    #[test]
    fn table_set_deduplicates_case_insensitively() {
        let mut t = TableSet::new();
        assert!(t.add(IF));
        // "files f" aparece como subcadena de "inputfiles fi" sin delimitadores
        assert!(t.add(F));
        assert!(!t.add(TableRef::new("FILES", "F")));
        assert_eq!(t.render(), "inputfiles fi, files f");
    }
}
