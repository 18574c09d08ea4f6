use super::variables::VariableBag;

/// One placeholder occurrence found while compiling a template. Duplicate
/// names each produce their own entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacedVariable {
    pub name: String,
    pub is_missing: bool,
    pub is_optional: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpolation {
    pub compiled: String,
    pub replaced: Vec<ReplacedVariable>,
}

/// Compiles a template against a variable bag. Placeholders are `{name}`
/// (required) or `{name?}` (optional); `name` is any run of characters
/// excluding braces, and the first `}` after a `{` closes the token. A
/// present name substitutes its value verbatim; an absent one substitutes
/// the empty string and is reported missing. There is no escaping, and
/// malformed tokens (unterminated `{`, empty `{}`) stay literal text.
pub fn interpolate(template: &str, bag: &VariableBag) -> Interpolation {
    let mut compiled = String::with_capacity(template.len());
    let mut replaced = Vec::new();
    let mut cursor = template;

    while let Some(open) = cursor.find('{') {
        compiled.push_str(&cursor[..open]);
        let rest = &cursor[open + 1..];
        match rest.find(['{', '}']) {
            Some(stop) if rest[stop..].starts_with('}') && stop > 0 => {
                let content = &rest[..stop];
                let (name, is_optional) = if content.len() > 1 && content.ends_with('?') {
                    (&content[..content.len() - 1], true)
                } else {
                    (content, false)
                };
                match bag.get(name) {
                    Some(value) => {
                        compiled.push_str(value);
                        replaced.push(ReplacedVariable {
                            name: name.to_string(),
                            is_missing: false,
                            is_optional,
                        });
                    }
                    None => {
                        replaced.push(ReplacedVariable {
                            name: name.to_string(),
                            is_missing: true,
                            is_optional,
                        });
                    }
                }
                cursor = &rest[stop + 1..];
            }
            Some(stop) if rest[stop..].starts_with('{') => {
                // The earlier `{` never closes; keep it literal and rescan
                // from the inner one.
                compiled.push('{');
                compiled.push_str(&rest[..stop]);
                cursor = &rest[stop..];
            }
            Some(stop) => {
                // `{}` with no name is literal text.
                compiled.push('{');
                compiled.push('}');
                cursor = &rest[stop + 1..];
            }
            None => {
                // Unterminated `{`: the remainder is literal text.
                compiled.push('{');
                compiled.push_str(rest);
                cursor = "";
            }
        }
    }

    compiled.push_str(cursor);
    Interpolation { compiled, replaced }
}
