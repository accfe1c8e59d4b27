use bindloop::engine::error::OracleError;

/// Substitutes `{NAME}` placeholders in a script template.
///
/// `{{` and `}}` produce literal braces. A placeholder without a value, or a brace that
/// is never closed, is an error.
pub fn render(template: &str, values: &[(&str, String)]) -> Result<String, OracleError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(c) => name.push(c),
                        None => {
                            return Err(OracleError::Template(format!(
                                "unterminated placeholder '{{{}'",
                                name
                            )));
                        }
                    }
                }
                let value = values
                    .iter()
                    .find(|(key, _)| *key == name)
                    .map(|(_, value)| value)
                    .ok_or_else(|| OracleError::Template(format!("unknown placeholder '{{{}}}'", name)))?;
                out.push_str(value);
            }
            '}' => {
                return Err(OracleError::Template("single '}' outside a placeholder".to_string()));
            }
            c => out.push(c),
        }
    }
    Ok(out)
}
