pub const GENERATE_IMAGE: &str = include_str!("../data/prompts/generate_image.txt");
pub const EDIT_TITLE: &str = include_str!("../data/prompts/edit_title.txt");
pub const EDIT_LOGO_CLAUSE: &str = include_str!("../data/prompts/edit_logo_clause.txt");

/// Replace `{{key}}` placeholders in a template string.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}
