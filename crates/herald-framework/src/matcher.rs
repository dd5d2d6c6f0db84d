//! Message matcher.
//!
//! The [`Matcher`] classifies one message against a [`Registry`] and picks
//! at most one handler. Routing follows a fixed priority:
//!
//! 1. **Command** - the first field of the command body names a registered
//!    command (case-insensitive, exact). Remaining fields become arguments.
//! 2. **Pattern** - the full raw text is tested against each pattern in
//!    registration order; the first match wins and its capture groups become
//!    the fields.
//! 3. **Default** - the default handler, if one is set and the message was
//!    command-shaped (it had a command body).
//!
//! Otherwise the matcher reports [`NoHandlerMatched`].
//!
//! A message whose first field names a command is always routed to that
//! command, even if some pattern would also match its text. Pattern handlers
//! are meant for free text such as a casual "thanks".

use tracing::trace;

use crate::context::Route;
use crate::error::NoHandlerMatched;
use crate::fields::split_fields;
use crate::handler::BoxedHandler;
use crate::registry::Registry;

/// The handler selected for a message, with the fields it will receive.
#[derive(Clone)]
pub struct DispatchPlan<'r> {
    pub handler: &'r BoxedHandler,
    pub fields: Vec<String>,
    pub route: Route,
}

impl std::fmt::Debug for DispatchPlan<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchPlan")
            .field("route", &self.route)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

/// Selects handlers from a registry.
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'r> {
    registry: &'r Registry,
}

impl<'r> Matcher<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    /// Plans the dispatch of one message.
    ///
    /// `text` is the full raw message text. `command_body` is the text to
    /// tokenize as a command, or `None` when the message is not
    /// command-shaped (for example, not addressed to the bot); in that case
    /// only patterns are tried.
    pub fn plan(
        &self,
        text: &str,
        command_body: Option<&str>,
    ) -> Result<DispatchPlan<'r>, NoHandlerMatched> {
        let tokens = command_body.map(split_fields);

        if let Some(plan) = tokens.as_deref().and_then(|t| self.match_command(t)) {
            return Ok(plan);
        }

        if let Some(plan) = self.match_pattern(text) {
            return Ok(plan);
        }

        if let (Some(tokens), Some(handler)) = (tokens, self.registry.default_handler()) {
            trace!("Falling back to default handler");
            return Ok(DispatchPlan {
                handler,
                fields: tokens,
                route: Route::Default,
            });
        }

        Err(NoHandlerMatched)
    }

    fn match_command(&self, tokens: &[String]) -> Option<DispatchPlan<'r>> {
        let (name, args) = tokens.split_first()?;
        let command = self.registry.lookup_command(name)?;

        trace!(command = command.name(), fields = args.len(), "Matched command");
        Some(DispatchPlan {
            handler: command.handler(),
            fields: args.to_vec(),
            route: Route::Command(command.name().to_string()),
        })
    }

    fn match_pattern(&self, text: &str) -> Option<DispatchPlan<'r>> {
        self.registry.patterns().iter().find_map(|pattern| {
            let captures = pattern.regex().captures(text)?;
            let fields = captures
                .iter()
                .skip(1)
                .map(|group| group.map(|m| m.as_str().to_string()).unwrap_or_default())
                .collect();

            trace!(pattern = pattern.as_str(), "Matched pattern");
            Some(DispatchPlan {
                handler: pattern.handler(),
                fields,
                route: Route::Pattern(pattern.as_str().to_string()),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::DispatchContext;
    use crate::registry::CommandDescriptor;

    async fn noop(_ctx: DispatchContext) {}

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry
            .register_command(CommandDescriptor::new("hi", noop))
            .unwrap();
        registry
            .register_command(CommandDescriptor::new("echo", noop))
            .unwrap();
        registry
            .register_command(CommandDescriptor::new("thanks", noop))
            .unwrap();
        registry
            .handle_pattern(r"\b(thanks|thank\s+you)\b", noop)
            .unwrap();
        registry
    }

    #[test]
    fn test_command_without_fields() {
        let registry = registry();
        let plan = Matcher::new(&registry).plan("hi", Some("hi")).unwrap();
        assert_eq!(plan.route, Route::Command("hi".into()));
        assert!(plan.fields.is_empty());
    }

    #[test]
    fn test_command_with_backtick_fields() {
        let registry = registry();
        let text = "echo `hello world` extra";
        let plan = Matcher::new(&registry).plan(text, Some(text)).unwrap();
        assert_eq!(plan.route, Route::Command("echo".into()));
        assert_eq!(plan.fields, vec!["hello world", "extra"]);
    }

    #[test]
    fn test_command_name_case_insensitive() {
        let registry = registry();
        let plan = Matcher::new(&registry).plan("ECHO x", Some("ECHO x")).unwrap();
        assert_eq!(plan.route, Route::Command("echo".into()));
    }

    #[test]
    fn test_command_beats_pattern() {
        let registry = registry();
        let plan = Matcher::new(&registry)
            .plan("thanks bro", Some("thanks bro"))
            .unwrap();
        assert_eq!(plan.route, Route::Command("thanks".into()));
        assert_eq!(plan.fields, vec!["bro"]);
    }

    #[test]
    fn test_pattern_when_no_command() {
        let mut registry = Registry::new();
        registry
            .handle_pattern(r"\b(thanks|thank\s+you)\b", noop)
            .unwrap();

        let plan = Matcher::new(&registry)
            .plan("thanks bro", Some("thanks bro"))
            .unwrap();
        assert_eq!(plan.route, Route::Pattern(r"\b(thanks|thank\s+you)\b".into()));
        assert_eq!(plan.fields, vec!["thanks"]);
    }

    #[test]
    fn test_patterns_tried_in_order() {
        let mut registry = Registry::new();
        registry.handle_pattern("first", noop).unwrap();
        registry.handle_pattern("fir", noop).unwrap();

        let plan = Matcher::new(&registry).plan("first!", None).unwrap();
        assert_eq!(plan.route, Route::Pattern("first".into()));
    }

    #[test]
    fn test_unmatched_capture_group_is_empty_field() {
        let mut registry = Registry::new();
        registry.handle_pattern(r"(a)|(b)", noop).unwrap();

        let plan = Matcher::new(&registry).plan("b", None).unwrap();
        assert_eq!(plan.fields, vec!["", "b"]);
    }

    #[test]
    fn test_partial_command_name_does_not_match() {
        let registry = registry();
        assert_eq!(
            Matcher::new(&registry).plan("ech", Some("ech")).unwrap_err(),
            NoHandlerMatched
        );
    }

    #[test]
    fn test_default_handler_receives_all_tokens() {
        let mut registry = registry();
        registry.set_default_handler(noop);

        let plan = Matcher::new(&registry)
            .plan("frobnicate now", Some("frobnicate now"))
            .unwrap();
        assert_eq!(plan.route, Route::Default);
        assert_eq!(plan.fields, vec!["frobnicate", "now"]);
    }

    #[test]
    fn test_default_skipped_when_not_command_shaped() {
        let mut registry = registry();
        registry.set_default_handler(noop);

        let result = Matcher::new(&registry).plan("just chatting", None);
        assert_eq!(result.unwrap_err(), NoHandlerMatched);
    }

    #[test]
    fn test_unaddressed_command_text_only_tries_patterns() {
        let registry = registry();
        let plan = Matcher::new(&registry).plan("thanks", None).unwrap();
        assert!(matches!(plan.route, Route::Pattern(_)));
    }

    #[test]
    fn test_empty_text_tries_patterns_then_default() {
        let mut registry = Registry::new();
        registry.handle_pattern("^$", noop).unwrap();
        let plan = Matcher::new(&registry).plan("", Some("")).unwrap();
        assert!(matches!(plan.route, Route::Pattern(_)));

        let mut registry = Registry::new();
        registry.set_default_handler(noop);
        let plan = Matcher::new(&registry).plan("", Some("")).unwrap();
        assert_eq!(plan.route, Route::Default);
        assert!(plan.fields.is_empty());
    }
}
