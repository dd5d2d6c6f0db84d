//! Field extraction for command messages.
//!
//! A command body is split into positional fields:
//!
//! - Whitespace separates fields.
//! - A backtick-delimited run is one field, whitespace included:
//!   `` echo `hello world` extra `` yields `echo`, `hello world`, `extra`.
//! - Quoted and unquoted text touching each other joins into one field
//!   (`` a`b c` `` yields `ab c`), and an empty pair of backticks yields an
//!   empty field.
//! - An unterminated backtick runs to the end of the text.

/// Splits a command body into fields.
pub fn split_fields(input: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_backticks = false;
    // Set once a backtick pair opened in the current field, so that
    // "``" still produces an (empty) field.
    let mut quoted = false;

    for ch in input.chars() {
        match ch {
            '`' => {
                in_backticks = !in_backticks;
                quoted = true;
            }
            c if c.is_whitespace() && !in_backticks => {
                if !current.is_empty() || quoted {
                    fields.push(std::mem::take(&mut current));
                }
                quoted = false;
            }
            c => current.push(c),
        }
    }

    if !current.is_empty() || quoted {
        fields.push(current);
    }

    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_simple() {
        assert_eq!(split_fields("echo hello world"), vec!["echo", "hello", "world"]);
    }

    #[test]
    fn test_split_backtick_group() {
        assert_eq!(
            split_fields("echo `hello world` extra"),
            vec!["echo", "hello world", "extra"]
        );
    }

    #[test]
    fn test_split_collapses_whitespace() {
        assert_eq!(split_fields("  a \t b\n c  "), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_split_empty() {
        assert!(split_fields("").is_empty());
        assert!(split_fields("   \t ").is_empty());
    }

    #[test]
    fn test_split_empty_backticks() {
        assert_eq!(split_fields("set `` x"), vec!["set", "", "x"]);
    }

    #[test]
    fn test_split_adjacent_text_joins() {
        assert_eq!(split_fields("a`b c`d"), vec!["ab cd"]);
    }

    #[test]
    fn test_split_unterminated_backtick() {
        assert_eq!(split_fields("say `one two"), vec!["say", "one two"]);
    }

    #[test]
    fn test_split_preserves_inner_whitespace() {
        assert_eq!(split_fields("`  padded  `"), vec!["  padded  "]);
    }
}
