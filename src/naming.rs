/// Maps a class name to the arg name it is implicitly bound to.
/// Returns `None` when the class name yields no usable arg name.
pub type ArgNaming = fn(&str) -> Option<String>;

/// Default naming convention: `CamelCase` becomes `camel_case`.
///
/// Leading underscores are stripped, so `_ClassOne` and `ClassOne` both map to `class_one`.
/// Runs of capitals are treated as one word: `HTTPServer` maps to `http_server`.
#[must_use]
pub fn default_arg_name(class_name: &str) -> Option<String> {
    let name = class_name.trim_start_matches('_');
    let chars = name.chars().collect::<Vec<_>>();

    let mut arg_name = String::with_capacity(name.len() + 4);
    for (index, &ch) in chars.iter().enumerate() {
        if ch.is_uppercase() && index > 0 {
            let prev = chars[index - 1];
            let next_is_lower = chars.get(index + 1).is_some_and(|next| next.is_lowercase());
            if prev != '_' && (prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)) {
                arg_name.push('_');
            }
        }
        arg_name.extend(ch.to_lowercase());
    }

    if arg_name.is_empty() {
        None
    } else {
        Some(arg_name)
    }
}

#[cfg(test)]
mod tests {
    use super::default_arg_name;

    #[test]
    fn test_camel_case() {
        assert_eq!(default_arg_name("ClassOne").as_deref(), Some("class_one"));
        assert_eq!(default_arg_name("Foo").as_deref(), Some("foo"));
        assert_eq!(default_arg_name("X").as_deref(), Some("x"));
        assert_eq!(default_arg_name("Foo2Bar").as_deref(), Some("foo2_bar"));
    }

    #[test]
    fn test_leading_underscores() {
        assert_eq!(default_arg_name("_CollidingExampleClass").as_deref(), Some("colliding_example_class"));
        assert_eq!(default_arg_name("__X").as_deref(), Some("x"));
    }

    #[test]
    fn test_acronyms() {
        assert_eq!(default_arg_name("HTTPServer").as_deref(), Some("http_server"));
        assert_eq!(default_arg_name("IOError").as_deref(), Some("io_error"));
        assert_eq!(default_arg_name("ID").as_deref(), Some("id"));
    }

    #[test]
    fn test_already_snake() {
        assert_eq!(default_arg_name("class_one").as_deref(), Some("class_one"));
        assert_eq!(default_arg_name("Class_One").as_deref(), Some("class_one"));
    }

    #[test]
    fn test_empty() {
        assert_eq!(default_arg_name(""), None);
        assert_eq!(default_arg_name("__"), None);
    }
}
