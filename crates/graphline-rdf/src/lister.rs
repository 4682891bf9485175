//! Entity listing: one SELECT, one IRI column

use crate::sparql::{QueryError, SparqlClient};
use crate::template::variable_name;

/// Run the listing `query` and return the value bound to `variable` on every row.
///
/// Order and duplicates are whatever the endpoint returned. A row without the
/// variable means the query and its configured variable disagree, so the whole
/// listing fails rather than silently shrinking.
pub fn list_entities(
    client: &dyn SparqlClient,
    query: &str,
    variable: &str,
) -> Result<Vec<String>, QueryError> {
    let name = variable_name(variable);
    let rows = client.select(query)?;
    let mut uris = Vec::with_capacity(rows.len());
    for (i, mut row) in rows.into_iter().enumerate() {
        match row.remove(name) {
            Some(value) => uris.push(value.value),
            None => {
                return Err(QueryError::MalformedResult {
                    message: format!("row {i} has no binding for ?{name}"),
                });
            }
        }
    }
    log::debug!("listed {} entities for ?{name}", uris.len());
    Ok(uris)
}
