use super::{Filter, Join, NullFilter, SqlStatement};
use crate::value::Value;

const WHERE: &str = "WHERE";
const AND: &str = "AND";
const IS_NULL: &str = "IS NULL";
const IS_NOT_NULL: &str = "IS NOT NULL";

/// Appends clause fragments to the statement text while numbering placeholders.
///
/// `next_placeholder` starts at 1 and moves forward once per bound value, so
/// `args[i]` always belongs to `$i+1`.
pub(super) struct Assembler {
    sql: String,
    args: Vec<Value>,
    next_placeholder: usize,
}

impl Assembler {
    pub(super) fn new(head: String) -> Self {
        Self {
            sql: head,
            args: Vec::new(),
            next_placeholder: 1,
        }
    }

    fn bind(&mut self, value: Value) -> usize {
        let n = self.next_placeholder;
        self.args.push(value);
        self.next_placeholder += 1;
        n
    }

    // The first predicate opens WHERE. The check looks at the text built so far, so
    // predicates appended by a later phase (null checks after filters, filters after
    // SET) continue with AND.
    fn conjunction(&self) -> &'static str {
        if self.sql.contains(WHERE) { AND } else { WHERE }
    }

    pub(super) fn push_joins(&mut self, keyword: &str, joins: &[Join]) {
        for join in joins {
            self.sql.push_str(&format!(
                " {keyword} {} ON {} = {}",
                join.table, join.left, join.right
            ));
        }
    }

    pub(super) fn push_list(&mut self, keyword: &str, columns: &[String]) {
        if columns.is_empty() {
            return;
        }
        self.sql.push_str(&format!(" {keyword} {}", columns.join(",")));
    }

    pub(super) fn push_filters(&mut self, filters: Vec<Filter>) {
        for filter in filters {
            let conjunction = self.conjunction();
            let n = self.bind(filter.value);
            self.sql.push_str(&format!(
                " {conjunction} {} {} ${n}",
                filter.column, filter.operator
            ));
        }
    }

    pub(super) fn push_null_filters(&mut self, filters: &[NullFilter]) {
        for filter in filters {
            let conjunction = self.conjunction();
            let check = if filter.is_null { IS_NULL } else { IS_NOT_NULL };
            self.sql
                .push_str(&format!(" {conjunction} {} {check}", filter.column));
        }
    }

    pub(super) fn push_offset(&mut self, offset: Option<i64>) {
        if let Some(offset) = offset.filter(|o| *o > 0) {
            let n = self.bind(Value::Int(offset));
            self.sql.push_str(&format!(" OFFSET ${n}"));
        }
    }

    pub(super) fn push_limit(&mut self, limit: Option<i64>) {
        if let Some(limit) = limit.filter(|l| *l > 0) {
            let n = self.bind(Value::Int(limit));
            self.sql.push_str(&format!(" LIMIT ${n}"));
        }
    }

    /// ` VALUES ($1,...,$n)` for an INSERT payload.
    pub(super) fn push_values(&mut self, args: Vec<Value>) {
        let placeholders: Vec<String> = args
            .into_iter()
            .map(|arg| format!("${}", self.bind(arg)))
            .collect();
        self.sql
            .push_str(&format!(" VALUES ({})", placeholders.join(",")));
    }

    /// ` col1 = $1, col2 = $2` for an UPDATE payload.
    pub(super) fn push_set(&mut self, columns: &[&str], args: Vec<Value>) {
        let assignments: Vec<String> = columns
            .iter()
            .zip(args)
            .map(|(column, arg)| format!(" {column} = ${}", self.bind(arg)))
            .collect();
        self.sql.push_str(&assignments.join(","));
    }

    pub(super) fn push_returning(&mut self, column: &str) {
        self.sql.push_str(&format!(" RETURNING {column}"));
    }

    pub(super) fn finish(self) -> SqlStatement {
        SqlStatement::new(self.sql, self.args)
    }
}
