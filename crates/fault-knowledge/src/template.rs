//! Placeholder substitution for authored text

/// Observed values substituted into knowledge text
#[derive(Debug, Clone, Copy)]
pub struct Substitution<'a> {
    pub name: &'a str,
    pub value: f64,
    pub unit: &'a str,
}

/// Replace `{name}`, `{value}` and `{unit}` in `template`
pub fn render(template: &str, sub: &Substitution<'_>) -> String {
    if !template.contains('{') {
        return template.to_string();
    }
    template
        .replace("{name}", sub.name)
        .replace("{value}", &sub.value.to_string())
        .replace("{unit}", sub.unit)
}
