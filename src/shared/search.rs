use sqlx::{Postgres, QueryBuilder};

/// Build a `%term%` pattern for `ILIKE … ESCAPE '\'`, treating the user's
/// `%`, `_` and `\` literally
pub fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Trimmed value, `None` when missing or blank
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Appends ` WHERE ` before the first predicate and ` AND ` before the rest
pub struct Conditions<'q, 'b> {
    qb: &'b mut QueryBuilder<'q, Postgres>,
    any: bool,
}

impl<'q, 'b> Conditions<'q, 'b> {
    pub fn new(qb: &'b mut QueryBuilder<'q, Postgres>) -> Self {
        Self { qb, any: false }
    }

    pub fn next(&mut self) -> &mut QueryBuilder<'q, Postgres> {
        self.qb.push(if self.any { " AND " } else { " WHERE " });
        self.any = true;
        &mut *self.qb
    }
}
