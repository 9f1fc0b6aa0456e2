//! `--where` row filter expressions for report runs.

use tally_engine::{Row, HEADER};

use crate::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterOp {
    Eq,
    Ne,
    Contains,
}

#[derive(Debug, Clone)]
pub struct WhereExpr {
    column: usize,
    op: FilterOp,
    value: String,
}

impl WhereExpr {
    pub fn matches(&self, row: &Row) -> bool {
        let cell = row.field(self.column);
        match self.op {
            FilterOp::Eq => cell == self.value,
            FilterOp::Ne => cell != self.value,
            FilterOp::Contains => cell.contains(&self.value),
        }
    }
}

/// Parse `field=value`, `field!=value`, or `field~substring`.
/// `!=` is matched before `=` so `status!=paid` splits on the right operator.
pub fn parse_where(expr: &str) -> Result<WhereExpr, CliError> {
    let (field, op, value) = if let Some((f, v)) = expr.split_once("!=") {
        (f, FilterOp::Ne, v)
    } else if let Some((f, v)) = expr.split_once('=') {
        (f, FilterOp::Eq, v)
    } else if let Some((f, v)) = expr.split_once('~') {
        (f, FilterOp::Contains, v)
    } else {
        return Err(CliError::usage(format!(
            "invalid --where expression {expr:?}: expected field=value, field!=value, or field~substring",
        )));
    };

    let field = field.trim();
    let column = HEADER
        .iter()
        .position(|h| h.eq_ignore_ascii_case(field))
        .ok_or_else(|| {
            CliError::usage(format!(
                "unknown column {:?} in --where expression; valid columns: {}",
                field,
                HEADER.join(", "),
            ))
        })?;

    Ok(WhereExpr { column, op, value: value.trim().to_string() })
}

/// AND all expressions together; no expressions keeps every row.
pub fn build_predicate(exprs: Vec<WhereExpr>) -> impl Fn(&Row) -> bool {
    move |row| exprs.iter().all(|e| e.matches(row))
}
