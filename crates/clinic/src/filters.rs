//! Custom Askama template filters.

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Make JSON safe to place inside a `<script>` element.
///
/// Usage in templates: `{{ animation|script_json|safe }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn script_json(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(escape_script_json(&value.to_string()))
}

fn escape_script_json(json: &str) -> String {
    json.replace("</", "<\\/").replace("<!--", "<\\!--")
}
