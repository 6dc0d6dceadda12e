//! MiniJinja filter registration.

use minijinja::{Environment, Error, ErrorKind, Value};

use crate::options::DEFAULT_QUERY_FUNCTIONS;
use crate::query::evaluate_query;

/// Registers the query filters on a MiniJinja environment.
///
/// Each name in [`DEFAULT_QUERY_FUNCTIONS`] becomes a filter taking a JMESPath
/// expression, so full templates can use the same syntax as query placeholders:
///
/// ```jinja
/// Top seller: {{ products | jmespath("max_by(@, &sales).name") }}
/// ```
///
/// Query failures keep their [`RenderError`](crate::RenderError) as the error
/// source, so they surface as query errors rather than backend errors.
pub fn register_filters(env: &mut Environment<'static>) {
    for name in DEFAULT_QUERY_FUNCTIONS {
        env.add_filter(*name, query_filter);
    }
}

fn query_filter(value: Value, expression: String) -> Result<Value, Error> {
    let data = serde_json::to_value(&value)
        .map_err(|err| Error::new(ErrorKind::BadSerialization, err.to_string()))?;

    evaluate_query(&expression, &data)
        .map(|result| Value::from_serialize(&result))
        .map_err(|err| Error::new(ErrorKind::InvalidOperation, err.to_string()).with_source(err))
}
