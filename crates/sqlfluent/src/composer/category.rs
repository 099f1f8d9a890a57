//! Clause categories and the fixed order they render in.

use std::fmt;

/// Classification of a clause kind.
///
/// Every category except [`Category::Filter`] holds at most one fragment in a
/// [`Composer`](super::Composer); setting it again replaces the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// `SELECT`, `INSERT INTO`, `UPDATE`, `DELETE`
    Action,
    /// `FROM`, insert field list, `SET`
    Target,
    /// `VALUES`
    Values,
    /// `INNER JOIN` / `LEFT JOIN`
    Join,
    /// The ordered `WHERE` / `AND` / `OR` list
    Filter,
    /// `GROUP BY`
    Grouping,
    /// `HAVING`
    Having,
    /// `ORDER BY`
    Ordering,
    /// `LIMIT`
    Pagination,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Action,
        Category::Target,
        Category::Values,
        Category::Join,
        Category::Filter,
        Category::Grouping,
        Category::Having,
        Category::Ordering,
        Category::Pagination,
    ];

    /// Render position. Lower ranks are emitted first.
    pub const fn rank(self) -> u8 {
        match self {
            Category::Action => 0,
            Category::Target => 1,
            Category::Values => 2,
            Category::Join => 3,
            Category::Filter => 4,
            Category::Grouping => 5,
            Category::Having => 6,
            Category::Ordering => 7,
            Category::Pagination => 8,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Action => "action",
            Category::Target => "target",
            Category::Values => "values",
            Category::Join => "join",
            Category::Filter => "filter",
            Category::Grouping => "grouping",
            Category::Having => "having",
            Category::Ordering => "ordering",
            Category::Pagination => "pagination",
        };
        f.write_str(name)
    }
}

/// Wrap a table or alias name in backticks, doubling embedded backticks.
pub(crate) fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// One non-filter clause together with its payload.
///
/// Table and alias names are quoted when rendered. Every other payload
/// (field lists, SET expressions, join conditions, ORDER BY text...) is
/// inserted verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    Select(String),
    InsertTable(String),
    InsertFields(String),
    InsertValues(String),
    UpdateTable(String),
    UpdateSet(String),
    Delete,
    From(String),
    FromAs {
        table: String,
        alias: String,
    },
    InnerJoinAsOn {
        table: String,
        alias: String,
        on: String,
    },
    LeftJoinAsOn {
        table: String,
        alias: String,
        on: String,
    },
    GroupBy(String),
    Having(String),
    OrderBy(String),
    Limit {
        offset: u64,
        count: u64,
    },
    /// Raw `LIMIT` payload, e.g. `?,?` for prepared pagination.
    LimitRaw(String),
}

impl Clause {
    /// The category slot this clause occupies.
    pub fn category(&self) -> Category {
        match self {
            Clause::Select(_) | Clause::InsertTable(_) | Clause::UpdateTable(_) | Clause::Delete => {
                Category::Action
            }
            Clause::InsertFields(_)
            | Clause::UpdateSet(_)
            | Clause::From(_)
            | Clause::FromAs { .. } => Category::Target,
            Clause::InsertValues(_) => Category::Values,
            Clause::InnerJoinAsOn { .. } | Clause::LeftJoinAsOn { .. } => Category::Join,
            Clause::GroupBy(_) => Category::Grouping,
            Clause::Having(_) => Category::Having,
            Clause::OrderBy(_) => Category::Ordering,
            Clause::Limit { .. } | Clause::LimitRaw(_) => Category::Pagination,
        }
    }

    /// Render the fragment text, including its surrounding padding.
    pub fn to_fragment(&self) -> String {
        match self {
            Clause::Select(fields) => format!(" SELECT {fields} "),
            Clause::InsertTable(table) => format!(" INSERT INTO  {} ", quote_ident(table)),
            Clause::InsertFields(fields) => format!(" ({fields}) "),
            Clause::InsertValues(values) => format!(" VALUES {values} "),
            Clause::UpdateTable(table) => format!(" UPDATE  {} ", quote_ident(table)),
            Clause::UpdateSet(expr) => format!(" SET {expr} "),
            Clause::Delete => " DELETE ".to_string(),
            Clause::From(table) => format!(" FROM {} ", quote_ident(table)),
            Clause::FromAs { table, alias } => {
                format!(" FROM {} AS {} ", quote_ident(table), quote_ident(alias))
            }
            Clause::InnerJoinAsOn { table, alias, on } => format!(
                " INNER JOIN {} AS {} ON {on} ",
                quote_ident(table),
                quote_ident(alias)
            ),
            Clause::LeftJoinAsOn { table, alias, on } => format!(
                " LEFT JOIN {} AS {} ON {on} ",
                quote_ident(table),
                quote_ident(alias)
            ),
            Clause::GroupBy(expr) => format!(" GROUP BY {expr} "),
            Clause::Having(expr) => format!(" HAVING {expr} "),
            Clause::OrderBy(expr) => format!(" ORDER BY {expr} "),
            Clause::Limit { offset, count } => format!(" LIMIT {offset},{count}"),
            Clause::LimitRaw(text) => format!(" LIMIT {text}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_are_strictly_increasing_in_declaration_order() {
        let ranks: Vec<u8> = Category::ALL.iter().map(|c| c.rank()).collect();
        assert!(ranks.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn quote_ident_doubles_backticks() {
        assert_eq!(quote_ident("users"), "`users`");
        assert_eq!(quote_ident("we`ird"), "`we``ird`");
    }

    #[test]
    fn action_kinds_share_one_slot() {
        assert_eq!(Clause::Select("*".into()).category(), Category::Action);
        assert_eq!(Clause::Delete.category(), Category::Action);
        assert_eq!(Clause::UpdateTable("t".into()).category(), Category::Action);
        assert_eq!(Clause::From("t".into()).category(), Category::Target);
        assert_eq!(Clause::InsertValues("(?)".into()).category(), Category::Values);
    }
}
