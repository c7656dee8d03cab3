use crate::{
    CompiledExpression, DateRangeValue, FieldPath, FilterField, FilterFieldKind, FilterSpec,
    FilterState, FilterValue,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Compiles UI filter state into the backend filter grammar.
///
/// Clause shapes: `path~'text'`, `path = 42`, `path = 'text'`, `path IS NULL`,
/// `path >: 'YYYY-MM-DD'`, `path <: 'YYYY-MM-DD'` and `(a~'text' or b~'text')`,
/// joined with ` and `. Compilation is total: input that does not fit a
/// field's kind drops that field's clause instead of failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterExpressionCompiler {
    spec: FilterSpec,
}

impl FilterExpressionCompiler {
    /// Creates a compiler for one screen's filter spec.
    #[must_use]
    pub fn new(spec: FilterSpec) -> Self {
        Self { spec }
    }

    /// Returns the compiled spec.
    #[must_use]
    pub fn spec(&self) -> &FilterSpec {
        &self.spec
    }

    /// Compiles the search term and structured filters into one expression.
    #[must_use]
    pub fn compile(&self, search_term: &str, filters: &FilterState) -> CompiledExpression {
        let mut clauses = Vec::new();

        if let Some(search) = self.spec.search() {
            let search_value = FilterValue::Text(search_term.to_owned());
            if let Some(clause) = field_clause(search, &search_value) {
                clauses.push(clause);
            }
        }

        for field in self.spec.fields() {
            let Some(value) = filters.get(field.key()) else {
                continue;
            };
            if let Some(clause) = field_clause(field, value) {
                clauses.push(clause);
            }
        }

        CompiledExpression::from_clauses(clauses)
    }
}

fn field_clause(field: &FilterField, value: &FilterValue) -> Option<String> {
    let path = field.paths().first()?;

    let cleaned = match value {
        FilterValue::Text(text) => Some(FilterValue::Text(clean_text(text))),
        _ => None,
    };
    let value = cleaned.as_ref().unwrap_or(value);

    if let FilterValue::Text(text) = value
        && (text.is_empty() || field.is_all_sentinel(text))
    {
        return None;
    }

    match (field.kind(), value) {
        (_, FilterValue::Null) => None,
        (FilterFieldKind::NullCheck | FilterFieldKind::ExactMatch, FilterValue::Text(text))
            if field.is_null_sentinel(text) =>
        {
            Some(format!("{} IS NULL", path.as_str()))
        }
        (FilterFieldKind::NullCheck, _) => None,
        (FilterFieldKind::TextContains, FilterValue::Text(text)) => {
            Some(contains_clause(path, text))
        }
        (FilterFieldKind::TextContains, FilterValue::Number(number)) => {
            Some(contains_clause(path, number.to_string().as_str()))
        }
        (FilterFieldKind::AnyTextContains, FilterValue::Text(text)) => {
            Some(any_contains_clause(field.paths(), text))
        }
        (FilterFieldKind::AnyTextContains, FilterValue::Number(number)) => Some(
            any_contains_clause(field.paths(), number.to_string().as_str()),
        ),
        (FilterFieldKind::ExactMatch, FilterValue::Number(number)) => {
            Some(format!("{} = {number}", path.as_str()))
        }
        (FilterFieldKind::ExactMatch, FilterValue::Text(text)) => {
            Some(format!("{} = '{}'", path.as_str(), escape_literal(text)))
        }
        (FilterFieldKind::DateRange, FilterValue::DateRange(range)) => {
            date_range_clause(path, range)
        }
        _ => None,
    }
}

/// Drops control characters and surrounding whitespace from UI text.
fn clean_text(text: &str) -> String {
    text.chars()
        .filter(|character| !character.is_control())
        .collect::<String>()
        .trim()
        .to_owned()
}

fn contains_clause(path: &FieldPath, text: &str) -> String {
    format!("{}~'{}'", path.as_str(), escape_literal(text))
}

fn any_contains_clause(paths: &[FieldPath], text: &str) -> String {
    let clauses = paths
        .iter()
        .map(|path| contains_clause(path, text))
        .collect::<Vec<_>>();

    if clauses.len() == 1 {
        clauses.join("")
    } else {
        format!("({})", clauses.join(" or "))
    }
}

fn date_range_clause(path: &FieldPath, range: &DateRangeValue) -> Option<String> {
    let (Some(start), Some(end)) = (range.start, range.end) else {
        return None;
    };
    if start > end {
        return None;
    }

    Some(format!(
        "{path} >: '{}' and {path} <: '{}'",
        start.format(DATE_FORMAT),
        end.format(DATE_FORMAT),
        path = path.as_str()
    ))
}

/// Escapes a literal for interpolation between single quotes.
///
/// Backslashes and single quotes are backslash-escaped; control characters
/// are dropped.
#[must_use]
pub fn escape_literal(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for character in value.chars() {
        match character {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            other if other.is_control() => {}
            other => escaped.push(other),
        }
    }
    escaped
}
