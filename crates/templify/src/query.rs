//! JMESPath query evaluation.

use serde_json::{Number, Value};
use tracing::trace;

use crate::error::{RenderError, Result};

/// Evaluates a JMESPath `expression` against `data`.
///
/// A `null` result is reported as [`RenderError::EmptyResult`] rather than
/// rendered as nothing, so a query that matches nothing fails loudly.
///
/// JMESPath arithmetic (`sum`, `avg`, ...) always yields floats. When `data`
/// holds no floats of its own, integral float results can only come from that
/// arithmetic and are normalized to integers. Otherwise numbers are returned
/// as they are, so `30.0` in the data stays `30.0`.
///
/// ```rust
/// use serde_json::json;
/// use templify::evaluate_query;
///
/// let products = json!([
///     {"name": "A", "sales": 100},
///     {"name": "B", "sales": 150},
/// ]);
/// assert_eq!(evaluate_query("max_by(@, &sales).name", &products).unwrap(), json!("B"));
/// assert_eq!(evaluate_query("sum([].sales)", &products).unwrap(), json!(250));
/// ```
pub fn evaluate_query(expression: &str, data: &Value) -> Result<Value> {
    let compiled = jmespath::compile(expression)?;
    let result = compiled.search(data)?;

    if result.is_null() {
        return Err(RenderError::EmptyResult(expression.to_string()));
    }

    let value = serde_json::to_value(&*result)?;
    trace!(expression, result = %value, "evaluated query");
    if contains_float(data) {
        return Ok(value);
    }
    Ok(normalize_numbers(value))
}

fn contains_float(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.is_f64(),
        Value::Array(items) => items.iter().any(contains_float),
        Value::Object(map) => map.values().any(contains_float),
        _ => false,
    }
}

fn normalize_numbers(value: Value) -> Value {
    match value {
        Value::Number(n) => Value::Number(integral(&n).unwrap_or(n)),
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_numbers).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key, normalize_numbers(value)))
                .collect(),
        ),
        other => other,
    }
}

fn integral(n: &Number) -> Option<Number> {
    if n.is_i64() || n.is_u64() {
        return None;
    }
    let f = n.as_f64()?;
    let in_range = f >= i64::MIN as f64 && f <= i64::MAX as f64;
    (f.fract() == 0.0 && in_range).then(|| Number::from(f as i64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn products() -> Value {
        json!([
            {"name": "Product A", "sales": 100, "revenue": 1000},
            {"name": "Product B", "sales": 150, "revenue": 2000},
            {"name": "Product C", "sales": 120, "revenue": 1800},
        ])
    }

    #[test]
    fn test_max_by() {
        let result = evaluate_query("max_by(@, &sales).name", &products()).unwrap();
        assert_eq!(result, json!("Product B"));
    }

    #[test]
    fn test_sum_is_integral() {
        let result = evaluate_query("sum(@[].revenue)", &products()).unwrap();
        assert_eq!(result, json!(4800));
        assert_eq!(result.to_string(), "4800");
    }

    #[test]
    fn test_fractional_results_kept() {
        let result = evaluate_query("avg([].sales)", &json!([{"sales": 1}, {"sales": 2}])).unwrap();
        assert_eq!(result, json!(1.5));
    }

    #[test]
    fn test_float_data_keeps_its_type() {
        let dims = json!({"length": 30.0, "width": 12.5});
        let result = evaluate_query("length", &dims).unwrap();
        assert_eq!(result, json!(30.0));
        assert_eq!(result.to_string(), "30.0");

        let result = evaluate_query("@", &dims).unwrap();
        assert_eq!(result, dims);
    }

    #[test]
    fn test_sum_over_floats_stays_float() {
        let result = evaluate_query("sum(@)", &json!([1.5, 2.5])).unwrap();
        assert_eq!(result, json!(4.0));
    }

    #[test]
    fn test_sort_by_and_join() {
        let result =
            evaluate_query("join(', ', sort_by(@, &sales)[].name)", &products()).unwrap();
        assert_eq!(result, json!("Product A, Product C, Product B"));
    }

    #[test]
    fn test_filter_projection() {
        let result = evaluate_query("[?sales > `110`].name", &products()).unwrap();
        assert_eq!(result, json!(["Product B", "Product C"]));
    }

    #[test]
    fn test_structured_result() {
        let result = evaluate_query("[0].{n: name, s: sales}", &products()).unwrap();
        assert_eq!(result, json!({"n": "Product A", "s": 100}));
    }

    #[test]
    fn test_null_result_is_empty_result() {
        let err = evaluate_query("missing_field", &json!({"a": 1})).unwrap_err();
        assert!(matches!(err, RenderError::EmptyResult(ref q) if q == "missing_field"));
    }

    #[test]
    fn test_empty_projection_is_not_null() {
        let result = evaluate_query("[?sales > `1000`]", &products()).unwrap();
        assert_eq!(result, json!([]));
    }

    #[test]
    fn test_syntax_error_is_invalid_query() {
        let err = evaluate_query("max_by(@, &sales", &products()).unwrap_err();
        assert!(matches!(err, RenderError::InvalidQuery { .. }));
    }

    #[test]
    fn test_runtime_type_error_is_invalid_query() {
        let err = evaluate_query("sum(@)", &json!(["a", "b"])).unwrap_err();
        assert!(err.is_query_error());
    }
}
