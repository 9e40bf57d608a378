// replace placeholder in template with data
pub fn render_template(template: &str, data: &[(&str, &str)]) -> String {
    let mut result = String::from(template);

    for (placeholder, value) in data {
        result = result.replace(placeholder, value);
    }

    result
}

// wrap a display name the way roast lines expect it
pub fn bold(name: &str) -> String {
    format!("**{name}**")
}
