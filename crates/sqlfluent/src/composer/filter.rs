//! Filter terms: connectors, predicate operators and the operand guard.

/// Characters that cause a connector column or predicate operand to be dropped.
pub const REJECTED_CHARS: [char; 3] = ['=', '>', '<'];

/// Operand that binds as a parameter when rendered for a prepared statement.
pub const PLACEHOLDER: &str = "?";

/// Returns `true` when `input` must be silently dropped.
///
/// Also rejects legitimate text such as `a=b` meant as a string literal.
pub fn is_rejected(input: &str) -> bool {
    input.contains(REJECTED_CHARS)
}

/// One filter fragment, kept in call order.
///
/// A term whose operand is exactly `?` also carries the unquoted form used
/// when rendering for a prepared statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterTerm {
    text: String,
    bound: Option<String>,
}

impl FilterTerm {
    fn plain(text: String) -> Self {
        Self { text, bound: None }
    }

    /// The fragment as rendered for direct execution.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn binds_placeholder(&self) -> bool {
        self.bound.is_some()
    }

    pub(crate) fn render(&self, for_prepared: bool) -> &str {
        match &self.bound {
            Some(bound) if for_prepared => bound,
            _ => &self.text,
        }
    }
}

/// Keyword that links a filter term to the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connector {
    Where,
    And,
    Or,
}

impl Connector {
    pub fn keyword(self) -> &'static str {
        match self {
            Connector::Where => "WHERE",
            Connector::And => "AND",
            Connector::Or => "OR",
        }
    }

    pub(crate) fn fragment(self, column: &str) -> String {
        format!(" {} {column} ", self.keyword())
    }

    pub(crate) fn find_in_set_fragment(self, column: &str, value: &str) -> String {
        format!(" {} FIND_IN_SET(\"{value}\", {column}) ", self.keyword())
    }

    pub(crate) fn term(self, column: &str) -> FilterTerm {
        FilterTerm::plain(self.fragment(column))
    }

    pub(crate) fn find_in_set_term(self, column: &str, value: &str) -> FilterTerm {
        let bound = (value == PLACEHOLDER)
            .then(|| format!(" {} FIND_IN_SET(?, {column}) ", self.keyword()));
        FilterTerm {
            text: self.find_in_set_fragment(column, value),
            bound,
        }
    }
}

/// Predicate operator applied to the column named by the preceding connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Neq,
    Gt,
    Ge,
    Lt,
    Le,
    Like,
    /// Comma-separated list, inserted unquoted.
    In,
    /// Comma-separated list, inserted unquoted.
    NotIn,
}

impl Op {
    pub fn symbol(self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::Neq => "!=",
            Op::Gt => ">",
            Op::Ge => ">=",
            Op::Lt => "<",
            Op::Le => "<=",
            Op::Like => "LIKE",
            Op::In => "IN",
            Op::NotIn => "NOT IN",
        }
    }

    pub(crate) fn fragment(self, operand: &str) -> String {
        match self {
            Op::In | Op::NotIn => format!(" {} ({}) ", self.symbol(), operand.trim()),
            _ => format!(" {} \"{operand}\" ", self.symbol()),
        }
    }

    pub(crate) fn term(self, operand: &str) -> FilterTerm {
        let bound = match self {
            Op::In | Op::NotIn => None,
            _ if operand == PLACEHOLDER => Some(format!(" {} ? ", self.symbol())),
            _ => None,
        };
        FilterTerm {
            text: self.fragment(operand),
            bound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_comparison_characters() {
        assert!(is_rejected("1>2"));
        assert!(is_rejected("a=b"));
        assert!(is_rejected("<script"));
        assert!(!is_rejected("title_01"));
        assert!(!is_rejected("?"));
    }

    #[test]
    fn relational_operands_are_double_quoted() {
        assert_eq!(Op::Eq.fragment("30000"), " = \"30000\" ");
        assert_eq!(Op::Neq.fragment("x"), " != \"x\" ");
        assert_eq!(Op::Le.fragment("?"), " <= \"?\" ");
        assert_eq!(Op::Like.fragment("%a%"), " LIKE \"%a%\" ");
    }

    #[test]
    fn list_operands_are_trimmed_and_unquoted() {
        assert_eq!(Op::In.fragment("  1,2,3 "), " IN (1,2,3) ");
        assert_eq!(Op::NotIn.fragment("?,?"), " NOT IN (?,?) ");
    }

    #[test]
    fn only_a_bare_placeholder_operand_binds() {
        let term = Op::Eq.term("?");
        assert!(term.binds_placeholder());
        assert_eq!(term.render(false), " = \"?\" ");
        assert_eq!(term.render(true), " = ? ");

        let term = Op::Eq.term("say \"?\" now");
        assert!(!term.binds_placeholder());
        assert_eq!(term.render(true), term.text());

        assert!(!Op::In.term("?").binds_placeholder());
        assert_eq!(Op::In.term("?").render(true), " IN (?) ");
        assert!(!Connector::Where.term("?").binds_placeholder());
    }

    #[test]
    fn find_in_set_placeholder_binds() {
        let term = Connector::Where.find_in_set_term("tags", "?");
        assert_eq!(term.render(false), " WHERE FIND_IN_SET(\"?\", tags) ");
        assert_eq!(term.render(true), " WHERE FIND_IN_SET(?, tags) ");
        assert!(!Connector::Where.find_in_set_term("tags", "red").binds_placeholder());
    }

    #[test]
    fn connector_fragments_pad_the_column() {
        assert_eq!(Connector::Where.fragment("id"), " WHERE id ");
        assert_eq!(
            Connector::And.find_in_set_fragment("tags", "red"),
            " AND FIND_IN_SET(\"red\", tags) "
        );
    }
}
