/// Fixed prefix of every greeting.
pub const GREETING_PREFIX: &str = "Hello";

/// Build the greeting for `name`.
///
/// The prefix and the name are concatenated as-is, without a separator, so an
/// empty name yields just `"Hello"`.
pub fn greeting(name: &str) -> String {
    let mut message = String::with_capacity(GREETING_PREFIX.len() + name.len());
    message.push_str(GREETING_PREFIX);
    message.push_str(name);
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_has_no_separator() {
        assert_eq!(greeting("Alice"), "HelloAlice");
        assert_eq!(greeting(" Bob"), "Hello Bob");
    }

    #[test]
    fn test_empty_name() {
        assert_eq!(greeting(""), "Hello");
    }

    #[test]
    fn test_greeting_is_deterministic() {
        let name = "Zoë ✓";
        assert_eq!(greeting(name).as_bytes(), greeting(name).as_bytes());
        assert_eq!(greeting(name), format!("Hello{name}"));
    }
}
