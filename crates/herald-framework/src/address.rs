//! Addressing policy.
//!
//! In a busy channel a bot should only treat text as a command when it is
//! spoken to. An [`AddressPolicy`] decides whether a message is addressed to
//! the bot and strips the address before the text is tokenized:
//!
//! | message text           | channel | command body |
//! |------------------------|---------|--------------|
//! | `herald ping`          | group   | `ping`       |
//! | `@Herald: ping`        | group   | `ping`       |
//! | `herald, ping`         | group   | `ping`       |
//! | `ping`                 | direct  | `ping`       |
//! | `ping`                 | group   | *(none)*     |
//! | `heraldic tales`       | group   | *(none)*     |

use herald_core::Message;

/// Recognizes messages addressed to a bot by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressPolicy {
    name: String,
}

impl AddressPolicy {
    /// Creates a policy for `name`; a leading `@` is ignored.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            name: name.trim_start_matches('@').to_string(),
        }
    }

    /// Returns the name the bot answers to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the command body if `message` is addressed to the bot.
    ///
    /// Direct messages are always addressed; the name prefix is still
    /// stripped when present.
    pub fn command_body<'m>(&self, message: &'m Message) -> Option<&'m str> {
        match self.strip_address(message.text()) {
            Some(body) => Some(body),
            None if message.is_direct() => Some(message.text().trim_start()),
            None => None,
        }
    }

    fn strip_address<'t>(&self, text: &'t str) -> Option<&'t str> {
        if self.name.is_empty() {
            return None;
        }

        let text = text.trim_start();
        let text = text.strip_prefix('@').unwrap_or(text);

        let rest = strip_prefix_ignore_case(text, &self.name)?;
        match rest.chars().next() {
            None => Some(rest),
            Some(':' | ',') => Some(rest[1..].trim_start()),
            Some(c) if c.is_whitespace() => Some(rest.trim_start()),
            Some(_) => None,
        }
    }
}

/// Strips `prefix` from `text`, comparing lowercased chars so that case
/// variants of different UTF-8 widths still match.
fn strip_prefix_ignore_case<'t>(text: &'t str, prefix: &str) -> Option<&'t str> {
    let mut chars = text.char_indices();
    let mut end = 0;
    for expected in prefix.chars() {
        let (index, actual) = chars.next()?;
        if !actual.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
        end = index + actual.len_utf8();
    }
    Some(&text[end..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_core::{Channel, User};

    fn group(text: &str) -> Message {
        Message::new(text, User::new("U1", "alice"), Channel::new("C1", "general"), 0)
    }

    fn direct(text: &str) -> Message {
        Message::new(text, User::new("U1", "alice"), Channel::direct("D1"), 0)
    }

    #[test]
    fn test_name_prefix_forms() {
        let policy = AddressPolicy::new("herald");
        assert_eq!(policy.command_body(&group("herald ping")), Some("ping"));
        assert_eq!(policy.command_body(&group("@Herald: ping")), Some("ping"));
        assert_eq!(policy.command_body(&group("HERALD, echo `a b`")), Some("echo `a b`"));
        assert_eq!(policy.command_body(&group("  herald")), Some(""));
    }

    #[test]
    fn test_name_with_at_sign() {
        let policy = AddressPolicy::new("@herald");
        assert_eq!(policy.name(), "herald");
        assert_eq!(policy.command_body(&group("@herald ping")), Some("ping"));
    }

    #[test]
    fn test_unaddressed_group_message() {
        let policy = AddressPolicy::new("herald");
        assert_eq!(policy.command_body(&group("ping")), None);
        assert_eq!(policy.command_body(&group("heraldic tales")), None);
        assert_eq!(policy.command_body(&group("thanks herald")), None);
    }

    #[test]
    fn test_direct_messages_are_addressed() {
        let policy = AddressPolicy::new("herald");
        assert_eq!(policy.command_body(&direct("ping")), Some("ping"));
        assert_eq!(policy.command_body(&direct("herald ping")), Some("ping"));
    }

    #[test]
    fn test_case_variants_of_different_width() {
        let policy = AddressPolicy::new("Straße");
        assert_eq!(policy.command_body(&group("STRAẞE ping")), Some("ping"));

        let policy = AddressPolicy::new("\u{212A}elvin");
        assert_eq!(policy.command_body(&group("kelvin: ping")), Some("ping"));
        assert_eq!(policy.command_body(&group("kelvinator ping")), None);
    }

    #[test]
    fn test_short_text_does_not_panic() {
        let policy = AddressPolicy::new("herald");
        assert_eq!(policy.command_body(&group("he")), None);
        assert_eq!(policy.command_body(&group("héraldé")), None);
    }
}
