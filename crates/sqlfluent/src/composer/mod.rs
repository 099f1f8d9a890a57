//! Order-independent SQL composer.
//!
//! A [`Composer`] collects clause fragments keyed by [`Category`] and an
//! ordered list of filter terms. Clauses may be set in any order; rendering
//! always emits them in the fixed category order, with the filter list placed
//! between the JOIN and GROUP BY slots in the order the filters were added.
//!
//! # Example
//!
//! ```ignore
//! use sqlfluent::Composer;
//!
//! let mut q = Composer::new();
//! q.limit(100, 20)
//!     .where_("id").eq("30000")
//!     .from("test_temp")
//!     .select("*");
//!
//! assert_eq!(
//!     q.sql().trim(),
//!     r#"SELECT *  FROM `test_temp`  WHERE id   = "30000"  LIMIT 100,20"#
//! );
//! ```

mod category;
mod filter;

pub use category::{Category, Clause};
pub use filter::{Connector, FilterTerm, Op, PLACEHOLDER, REJECTED_CHARS, is_rejected};

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

/// Mutable, reusable accumulator of clause fragments.
#[derive(Debug, Clone, Default)]
pub struct Composer {
    clauses: HashMap<Category, String>,
    filters: Vec<FilterTerm>,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset every category and filter.
    pub fn clear(&mut self) -> &mut Self {
        self.clauses.clear();
        self.filters.clear();
        self
    }

    /// `true` when no clause and no filter has been set.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty() && self.filters.is_empty()
    }

    /// The fragment currently stored for `category`.
    ///
    /// For [`Category::Filter`] this is always `None`; use [`Composer::filters`].
    pub fn fragment(&self, category: Category) -> Option<&str> {
        self.clauses.get(&category).map(String::as_str)
    }

    /// Filter fragments in call order.
    pub fn filters(&self) -> &[FilterTerm] {
        &self.filters
    }

    // ==================== Clauses ====================

    /// Write or replace the fragment for the clause's category.
    pub fn set_action(&mut self, clause: Clause) -> &mut Self {
        self.clauses.insert(clause.category(), clause.to_fragment());
        self
    }

    pub fn select(&mut self, fields: &str) -> &mut Self {
        self.set_action(Clause::Select(fields.to_string()))
    }

    pub fn insert_table(&mut self, table: &str) -> &mut Self {
        self.set_action(Clause::InsertTable(table.to_string()))
    }

    /// Comma-separated column list; wrapped in parentheses when rendered.
    pub fn insert_fields(&mut self, fields: &str) -> &mut Self {
        self.set_action(Clause::InsertFields(fields.to_string()))
    }

    /// Raw `VALUES` payload, e.g. `(?)` or `('a','b'),('c','d')`.
    pub fn insert_values(&mut self, values: &str) -> &mut Self {
        self.set_action(Clause::InsertValues(values.to_string()))
    }

    pub fn update_table(&mut self, table: &str) -> &mut Self {
        self.set_action(Clause::UpdateTable(table.to_string()))
    }

    /// Raw `SET` payload, inserted verbatim.
    pub fn update_set(&mut self, expr: &str) -> &mut Self {
        self.set_action(Clause::UpdateSet(expr.to_string()))
    }

    pub fn delete(&mut self) -> &mut Self {
        self.set_action(Clause::Delete)
    }

    pub fn from(&mut self, table: &str) -> &mut Self {
        self.set_action(Clause::From(table.to_string()))
    }

    pub fn from_as(&mut self, table: &str, alias: &str) -> &mut Self {
        self.set_action(Clause::FromAs {
            table: table.to_string(),
            alias: alias.to_string(),
        })
    }

    pub fn inner_join_as_on(&mut self, table: &str, alias: &str, on: &str) -> &mut Self {
        self.set_action(Clause::InnerJoinAsOn {
            table: table.to_string(),
            alias: alias.to_string(),
            on: on.to_string(),
        })
    }

    pub fn left_join_as_on(&mut self, table: &str, alias: &str, on: &str) -> &mut Self {
        self.set_action(Clause::LeftJoinAsOn {
            table: table.to_string(),
            alias: alias.to_string(),
            on: on.to_string(),
        })
    }

    pub fn group_by(&mut self, expr: &str) -> &mut Self {
        self.set_action(Clause::GroupBy(expr.to_string()))
    }

    pub fn having(&mut self, expr: &str) -> &mut Self {
        self.set_action(Clause::Having(expr.to_string()))
    }

    pub fn order_by(&mut self, expr: &str) -> &mut Self {
        self.set_action(Clause::OrderBy(expr.to_string()))
    }

    /// `LIMIT offset,count`
    pub fn limit(&mut self, offset: u64, count: u64) -> &mut Self {
        self.set_action(Clause::Limit { offset, count })
    }

    /// `LIMIT {text}`, typically `?,?` for prepared pagination.
    pub fn limit_raw(&mut self, text: &str) -> &mut Self {
        self.set_action(Clause::LimitRaw(text.to_string()))
    }

    // ==================== Filters ====================

    /// Append a connector term. Dropped silently if `column` contains a
    /// rejected character.
    pub fn add_filter(&mut self, connector: Connector, column: &str) -> &mut Self {
        if !self.accept(column) {
            return self;
        }
        self.filters.push(connector.term(column));
        self
    }

    /// Append a predicate term. Dropped silently if `operand` contains a
    /// rejected character.
    pub fn add_predicate(&mut self, op: Op, operand: &str) -> &mut Self {
        if !self.accept(operand) {
            return self;
        }
        self.filters.push(op.term(operand));
        self
    }

    /// Append `{connector} FIND_IN_SET("value", column)` as a single term.
    pub fn add_find_in_set(&mut self, connector: Connector, column: &str, value: &str) -> &mut Self {
        if !self.accept(column) || !self.accept(value) {
            return self;
        }
        self.filters
            .push(connector.find_in_set_term(column, value));
        self
    }

    fn accept(&self, input: &str) -> bool {
        if is_rejected(input) {
            tracing::debug!(
                target: "sqlfluent::composer",
                input,
                "filter input contains a rejected character; term dropped"
            );
            return false;
        }
        true
    }

    pub fn where_(&mut self, column: &str) -> &mut Self {
        self.add_filter(Connector::Where, column)
    }

    pub fn and(&mut self, column: &str) -> &mut Self {
        self.add_filter(Connector::And, column)
    }

    pub fn or(&mut self, column: &str) -> &mut Self {
        self.add_filter(Connector::Or, column)
    }

    pub fn eq(&mut self, operand: &str) -> &mut Self {
        self.add_predicate(Op::Eq, operand)
    }

    pub fn neq(&mut self, operand: &str) -> &mut Self {
        self.add_predicate(Op::Neq, operand)
    }

    pub fn gt(&mut self, operand: &str) -> &mut Self {
        self.add_predicate(Op::Gt, operand)
    }

    pub fn ge(&mut self, operand: &str) -> &mut Self {
        self.add_predicate(Op::Ge, operand)
    }

    pub fn lt(&mut self, operand: &str) -> &mut Self {
        self.add_predicate(Op::Lt, operand)
    }

    pub fn le(&mut self, operand: &str) -> &mut Self {
        self.add_predicate(Op::Le, operand)
    }

    pub fn like(&mut self, pattern: &str) -> &mut Self {
        self.add_predicate(Op::Like, pattern)
    }

    /// `IN (list)`; `list` is comma-separated and inserted unquoted.
    pub fn in_list(&mut self, list: &str) -> &mut Self {
        self.add_predicate(Op::In, list)
    }

    /// `NOT IN (list)`; `list` is comma-separated and inserted unquoted.
    pub fn not_in(&mut self, list: &str) -> &mut Self {
        self.add_predicate(Op::NotIn, list)
    }

    pub fn where_find_in_set(&mut self, column: &str, value: &str) -> &mut Self {
        self.add_find_in_set(Connector::Where, column, value)
    }

    pub fn and_find_in_set(&mut self, column: &str, value: &str) -> &mut Self {
        self.add_find_in_set(Connector::And, column, value)
    }

    pub fn or_find_in_set(&mut self, column: &str, value: &str) -> &mut Self {
        self.add_find_in_set(Connector::Or, column, value)
    }

    // ==================== Rendering ====================

    /// Render the SQL text.
    ///
    /// With `for_prepared` set, a filter operand given as exactly `?` is
    /// emitted bare so it binds as a parameter; other text is left alone.
    pub fn render(&self, for_prepared: bool) -> String {
        let mut parts: Vec<(u8, Cow<'_, str>)> = self
            .clauses
            .iter()
            .map(|(category, fragment)| (category.rank(), Cow::Borrowed(fragment.as_str())))
            .collect();

        if !self.filters.is_empty() {
            let filters = self
                .filters
                .iter()
                .map(|term| term.render(for_prepared))
                .collect::<Vec<_>>()
                .join(" ");
            parts.push((Category::Filter.rank(), Cow::Owned(filters)));
        }

        // Stable: equal ranks keep insertion order.
        parts.sort_by_key(|(rank, _)| *rank);
        parts.into_iter().map(|(_, fragment)| fragment).collect()
    }

    /// Render for direct execution (`render(false)`).
    pub fn sql(&self) -> String {
        self.render(false)
    }
}

impl fmt::Display for Composer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(false))
    }
}

#[cfg(test)]
mod tests;
