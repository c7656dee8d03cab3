use std::collections::BTreeMap;

use chrono::NaiveDate;
use rostrum_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Clause shape emitted for one filter field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterFieldKind {
    /// `path~'value'`
    TextContains,
    /// `path = 42` or `path = 'value'`
    ExactMatch,
    /// `path IS NULL` when the "has no value" sentinel is selected.
    NullCheck,
    /// `path >: 'start' and path <: 'end'`, only when both bounds are set.
    DateRange,
    /// `(a~'value' or b~'value')` across several backend paths.
    AnyTextContains,
}

/// Validated backend field path such as `createdDate` or `role.name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldPath(String);

impl FieldPath {
    /// Creates a validated field path.
    ///
    /// Paths are dot-separated identifiers; anything else would leak into the
    /// backend filter grammar unescaped.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let is_valid = !value.is_empty()
            && value.split('.').all(|segment| {
                let mut chars = segment.chars();
                chars
                    .next()
                    .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
                    && chars.all(|next| next.is_ascii_alphanumeric() || next == '_')
            });

        if !is_valid {
            return Err(AppError::Validation(format!(
                "invalid filter field path '{value}'"
            )));
        }

        Ok(Self(value))
    }

    /// Returns the path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for FieldPath {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FieldPath> for String {
    fn from(value: FieldPath) -> Self {
        value.0
    }
}

/// One declarative filter input of a list screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterField {
    key: NonEmptyString,
    kind: FilterFieldKind,
    paths: Vec<FieldPath>,
    all_sentinel: Option<String>,
    null_sentinel: Option<String>,
}

impl FilterField {
    /// Creates a text-contains field.
    pub fn text_contains(key: impl Into<String>, path: impl Into<String>) -> AppResult<Self> {
        Self::single(key, path, FilterFieldKind::TextContains)
    }

    /// Creates an exact-match field.
    pub fn exact_match(key: impl Into<String>, path: impl Into<String>) -> AppResult<Self> {
        Self::single(key, path, FilterFieldKind::ExactMatch)
    }

    /// Creates a null-check field triggered by `sentinel`.
    pub fn null_check(
        key: impl Into<String>,
        path: impl Into<String>,
        sentinel: impl Into<String>,
    ) -> AppResult<Self> {
        Self::single(key, path, FilterFieldKind::NullCheck)?.with_null_sentinel(sentinel)
    }

    /// Creates an inclusive date-range field.
    pub fn date_range(key: impl Into<String>, path: impl Into<String>) -> AppResult<Self> {
        Self::single(key, path, FilterFieldKind::DateRange)
    }

    /// Creates a text field matched against any of several backend paths.
    pub fn any_text_contains<I, S>(key: impl Into<String>, paths: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let paths = paths
            .into_iter()
            .map(FieldPath::new)
            .collect::<AppResult<Vec<_>>>()?;
        if paths.is_empty() {
            return Err(AppError::Validation(
                "disjunctive text fields require at least one path".to_owned(),
            ));
        }

        Ok(Self {
            key: NonEmptyString::new(key)?,
            kind: FilterFieldKind::AnyTextContains,
            paths,
            all_sentinel: None,
            null_sentinel: None,
        })
    }

    fn single(
        key: impl Into<String>,
        path: impl Into<String>,
        kind: FilterFieldKind,
    ) -> AppResult<Self> {
        Ok(Self {
            key: NonEmptyString::new(key)?,
            kind,
            paths: vec![FieldPath::new(path)?],
            all_sentinel: None,
            null_sentinel: None,
        })
    }

    /// Sets the "no filter selected" sentinel, e.g. `All`.
    pub fn with_all_sentinel(mut self, sentinel: impl Into<String>) -> AppResult<Self> {
        self.all_sentinel = Some(NonEmptyString::new(sentinel)?.into());
        Ok(self)
    }

    /// Sets the "has no value" sentinel that selects `IS NULL`.
    pub fn with_null_sentinel(mut self, sentinel: impl Into<String>) -> AppResult<Self> {
        if !matches!(
            self.kind,
            FilterFieldKind::NullCheck | FilterFieldKind::ExactMatch
        ) {
            return Err(AppError::Validation(format!(
                "filter field '{}' cannot carry a null sentinel",
                self.key.as_str()
            )));
        }

        self.null_sentinel = Some(NonEmptyString::new(sentinel)?.into());
        Ok(self)
    }

    /// Returns the UI state key.
    #[must_use]
    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    /// Returns the clause kind.
    #[must_use]
    pub fn kind(&self) -> FilterFieldKind {
        self.kind
    }

    /// Returns the backend paths, in clause order.
    #[must_use]
    pub fn paths(&self) -> &[FieldPath] {
        &self.paths
    }

    /// Returns whether `text` equals the "no filter selected" sentinel.
    #[must_use]
    pub fn is_all_sentinel(&self, text: &str) -> bool {
        sentinel_matches(self.all_sentinel.as_deref(), text)
    }

    /// Returns whether `text` equals the "has no value" sentinel.
    #[must_use]
    pub fn is_null_sentinel(&self, text: &str) -> bool {
        sentinel_matches(self.null_sentinel.as_deref(), text)
    }
}

fn sentinel_matches(sentinel: Option<&str>, text: &str) -> bool {
    sentinel.is_some_and(|sentinel| sentinel.trim().eq_ignore_ascii_case(text.trim()))
}

/// Ordered filter fields of one list screen plus its search binding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSpec {
    search: Option<FilterField>,
    fields: Vec<FilterField>,
}

impl FilterSpec {
    /// Creates a spec from ordered filter fields.
    pub fn new(fields: Vec<FilterField>) -> AppResult<Self> {
        let mut seen = std::collections::BTreeSet::new();
        for field in &fields {
            if !seen.insert(field.key()) {
                return Err(AppError::Validation(format!(
                    "duplicate filter field '{}'",
                    field.key()
                )));
            }
        }

        Ok(Self {
            search: None,
            fields,
        })
    }

    /// Binds the free-text search box to one or more backend paths.
    pub fn with_search<I, S>(mut self, paths: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search = Some(FilterField::any_text_contains("search", paths)?);
        Ok(self)
    }

    /// Returns the search binding.
    #[must_use]
    pub fn search(&self) -> Option<&FilterField> {
        self.search.as_ref()
    }

    /// Returns ordered filter fields.
    #[must_use]
    pub fn fields(&self) -> &[FilterField] {
        &self.fields
    }

    /// Finds a filter field by UI key.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&FilterField> {
        self.fields.iter().find(|field| field.key() == key)
    }

    /// Converts raw text input into the value the keyed field expects.
    ///
    /// Date ranges are written `start..end` with `YYYY-MM-DD` bounds, either of
    /// which may be left empty. Exact-match input that parses as an integer is
    /// treated as a numeric id.
    pub fn parse_value(&self, key: &str, raw: &str) -> AppResult<FilterValue> {
        let field = self
            .field(key)
            .ok_or_else(|| AppError::Validation(format!("unknown filter field '{key}'")))?;

        match field.kind() {
            FilterFieldKind::DateRange => {
                let (start, end) = raw.split_once("..").ok_or_else(|| {
                    AppError::Validation(format!(
                        "filter field '{key}' expects a range written as start..end"
                    ))
                })?;
                Ok(FilterValue::DateRange(DateRangeValue {
                    start: parse_optional_date(key, start)?,
                    end: parse_optional_date(key, end)?,
                }))
            }
            FilterFieldKind::ExactMatch => Ok(raw
                .trim()
                .parse::<i64>()
                .map(FilterValue::Number)
                .unwrap_or_else(|_| FilterValue::Text(raw.to_owned()))),
            FilterFieldKind::TextContains
            | FilterFieldKind::NullCheck
            | FilterFieldKind::AnyTextContains => Ok(FilterValue::Text(raw.to_owned())),
        }
    }
}

fn parse_optional_date(key: &str, raw: &str) -> AppResult<Option<NaiveDate>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map(Some)
        .map_err(|error| {
            AppError::Validation(format!(
                "filter field '{key}' has invalid date '{trimmed}': {error}"
            ))
        })
}

/// Inclusive date range selected in a date picker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRangeValue {
    /// First day of the range.
    #[serde(default)]
    pub start: Option<NaiveDate>,
    /// Last day of the range.
    #[serde(default)]
    pub end: Option<NaiveDate>,
}

/// Raw UI value bound to one filter field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Nothing selected.
    Null,
    /// Numeric id.
    Number(i64),
    /// Free text or enum label.
    Text(String),
    /// Date range.
    DateRange(DateRangeValue),
}

/// Structured filter state of one list screen, keyed by field key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterState {
    values: BTreeMap<String, FilterValue>,
}

impl FilterState {
    /// Creates an empty filter state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the state with `key` bound to `value`.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: FilterValue) -> Self {
        self.set(key, value);
        self
    }

    /// Returns the state with `key` bound to text.
    #[must_use]
    pub fn with_text(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.with(key, FilterValue::Text(value.into()))
    }

    /// Returns the state with `key` bound to an inclusive date range.
    #[must_use]
    pub fn with_date_range(
        self,
        key: impl Into<String>,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Self {
        self.with(key, FilterValue::DateRange(DateRangeValue { start, end }))
    }

    /// Binds `key` to `value`.
    pub fn set(&mut self, key: impl Into<String>, value: FilterValue) {
        self.values.insert(key.into(), value);
    }

    /// Returns the value bound to `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.values.get(key)
    }
}

/// Backend filter expression; empty means "no filtering".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CompiledExpression(String);

impl CompiledExpression {
    pub(crate) fn from_clauses(clauses: Vec<String>) -> Self {
        Self(clauses.join(" and "))
    }

    /// Returns the expression text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns whether no clause contributed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for CompiledExpression {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use super::{DateRangeValue, FieldPath, FilterField, FilterSpec, FilterState, FilterValue};

    #[test]
    fn field_path_rejects_grammar_characters() {
        assert!(FieldPath::new("role.name").is_ok());
        assert!(FieldPath::new("name~'x' or 1").is_err());
        assert!(FieldPath::new("").is_err());
        assert!(FieldPath::new("a..b").is_err());
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let fields = vec![
            FilterField::text_contains("name", "name"),
            FilterField::exact_match("name", "name"),
        ]
        .into_iter()
        .collect::<Result<Vec<_>, _>>();
        assert!(fields.is_ok());

        assert!(FilterSpec::new(fields.unwrap_or_default()).is_err());
    }

    #[test]
    fn null_sentinel_is_limited_to_exact_and_null_fields() {
        let field = FilterField::text_contains("name", "name")
            .and_then(|field| field.with_null_sentinel("None"));
        assert!(field.is_err());
    }

    #[test]
    fn parse_value_reads_ranges_and_numeric_ids() {
        let spec = FilterSpec::new(vec![
            FilterField::date_range("createdDate", "createdDate")
                .unwrap_or_else(|_| unreachable!()),
            FilterField::exact_match("recipientId", "recipient.id")
                .unwrap_or_else(|_| unreachable!()),
        ])
        .unwrap_or_default();

        let range = spec.parse_value("createdDate", "2025-01-01..");
        assert_eq!(
            range.ok(),
            Some(FilterValue::DateRange(DateRangeValue {
                start: NaiveDate::from_ymd_opt(2025, 1, 1),
                end: None,
            }))
        );

        assert_eq!(
            spec.parse_value("recipientId", " 42 ").ok(),
            Some(FilterValue::Number(42))
        );
        assert!(spec.parse_value("createdDate", "2025-13-01..").is_err());
        assert!(spec.parse_value("unknown", "x").is_err());
    }

    #[test]
    fn filter_state_deserializes_from_ui_json() {
        let state = serde_json::from_value::<FilterState>(json!({
            "name": "admin",
            "recipientId": 7,
            "role": null,
            "createdDate": {"start": "2025-01-01", "end": "2025-01-31"}
        }));
        assert!(state.is_ok());

        let state = state.unwrap_or_default();
        assert_eq!(state.get("recipientId"), Some(&FilterValue::Number(7)));
        assert_eq!(state.get("role"), Some(&FilterValue::Null));
        assert!(matches!(
            state.get("createdDate"),
            Some(FilterValue::DateRange(DateRangeValue {
                start: Some(_),
                end: Some(_)
            }))
        ));
    }
}
