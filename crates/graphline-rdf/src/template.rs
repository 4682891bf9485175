//! Parameterizing fixed DESCRIBE queries with one entity IRI

/// Normalize a SPARQL variable name: `?dataset`, `$dataset` and `dataset` all give `dataset`
pub fn variable_name(variable: &str) -> &str {
    variable.trim_start_matches(['?', '$'])
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Replace every whole-token `?variable` / `$variable` in `template` with `<uri>`.
///
/// `?dataset` does not match inside `?datasetType`. This is plain text
/// substitution, not a prepared statement; `uri` must come from the endpoint's
/// own listing results.
pub fn bind_entity(template: &str, variable: &str, uri: &str) -> String {
    let name = variable_name(variable);
    if name.is_empty() {
        return template.to_string();
    }
    let replacement = format!("<{uri}>");
    let mut out = String::with_capacity(template.len() + replacement.len());
    let mut rest = template;

    while let Some(pos) = rest.find(['?', '$']) {
        let (before, from_sigil) = rest.split_at(pos);
        out.push_str(before);
        let after_sigil = &from_sigil[1..];
        let whole_token = after_sigil.starts_with(name)
            && !after_sigil[name.len()..]
                .chars()
                .next()
                .is_some_and(is_name_char);
        if whole_token {
            out.push_str(&replacement);
            rest = &after_sigil[name.len()..];
        } else {
            out.push_str(&from_sigil[..1]);
            rest = after_sigil;
        }
    }
    out.push_str(rest);
    out
}
