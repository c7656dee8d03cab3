use rostrum_core::{AppError, AppResult};
use rostrum_domain::PageResult;
use serde_json::{Map, Value};

const ROW_KEYS: &[&str] = &["content", "items", "data", "rows"];
const TOTAL_KEYS: &[&str] = &["totalElements", "totalCount", "total", "count"];

/// Reads rows and the optional total from a list response body.
///
/// A bare array carries no total. Objects carry rows under one of
/// [`ROW_KEYS`] and the total under one of [`TOTAL_KEYS`], either at the top
/// level or inside a nested `page` object.
pub(super) fn page_from_body(body: Value) -> AppResult<PageResult> {
    match body {
        Value::Array(rows) => Ok(PageResult {
            rows,
            total_count: None,
        }),
        Value::Object(mut object) => {
            let rows = ROW_KEYS
                .iter()
                .find_map(|key| match object.remove(*key) {
                    Some(Value::Array(rows)) => Some(rows),
                    _ => None,
                })
                .ok_or_else(|| {
                    AppError::Transport("list response body carries no row array".to_owned())
                })?;

            let total_count = total_from(&object).or_else(|| {
                object
                    .get("page")
                    .and_then(Value::as_object)
                    .and_then(total_from)
            });

            Ok(PageResult { rows, total_count })
        }
        _ => Err(AppError::Transport(
            "list response body must be an array or an object".to_owned(),
        )),
    }
}

fn total_from(object: &Map<String, Value>) -> Option<u64> {
    TOTAL_KEYS
        .iter()
        .find_map(|key| object.get(*key).and_then(Value::as_u64))
}
