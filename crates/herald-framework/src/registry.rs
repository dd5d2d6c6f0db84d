//! Handler registry.
//!
//! The [`Registry`] is pure storage: named commands (looked up
//! case-insensitively, listed in registration order), pattern handlers
//! (tried in registration order) and a single default handler. It never runs
//! a handler itself.
//!
//! Registration happens through `&mut Registry`, so once a registry has been
//! handed to a [`Dispatcher`](crate::Dispatcher) no further writes can race
//! with dispatch.
//!
//! ```rust,ignore
//! let mut registry = Registry::new();
//! registry.register_command(
//!     CommandDescriptor::new("hi", bye)
//!         .description("Says goodbye when the user says hi!"),
//! )?;
//! registry.handle_pattern(r"\b(thanks|thank\s+you)\b", thanks)?;
//! registry.set_default_handler(unrecognized);
//! ```

use std::collections::HashMap;
use std::fmt;

use regex::Regex;
use tracing::{debug, warn};

use crate::error::{RegistryError, RegistryResult};
use crate::handler::{BoxedHandler, Handler, into_handler};

// ============================================================================
// Descriptors
// ============================================================================

/// A named command and the handler it binds to.
#[derive(Clone)]
pub struct CommandDescriptor {
    name: String,
    description: String,
    usage: Vec<String>,
    hidden: bool,
    handler: BoxedHandler,
}

impl CommandDescriptor {
    /// Creates a visible command with a single empty usage template.
    pub fn new<H: Handler>(name: impl Into<String>, handler: H) -> Self {
        Self::from_boxed(name, into_handler(handler))
    }

    /// Creates a command around an already boxed handler.
    pub fn from_boxed(name: impl Into<String>, handler: BoxedHandler) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            usage: vec![String::new()],
            hidden: false,
            handler,
        }
    }

    /// Sets the one-line description shown by help.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Replaces the usage templates (text following the command name).
    ///
    /// An empty list is treated as a single empty template.
    pub fn usage<I, S>(mut self, usage: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.usage = usage.into_iter().map(Into::into).collect();
        if self.usage.is_empty() {
            self.usage.push(String::new());
        }
        self
    }

    /// Hides the command from the help listing.
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get_description(&self) -> &str {
        &self.description
    }

    pub fn usage_templates(&self) -> &[String] {
        &self.usage
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn handler(&self) -> &BoxedHandler {
        &self.handler
    }

    fn validate(&self) -> RegistryResult<()> {
        let reason = if self.name.is_empty() {
            Some("name is empty")
        } else if self.name.chars().any(char::is_whitespace) {
            Some("name contains whitespace")
        } else if self.name.contains('`') {
            Some("name contains a backtick")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(RegistryError::InvalidCommandName {
                name: self.name.clone(),
                reason,
            }),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("usage", &self.usage)
            .field("hidden", &self.hidden)
            .finish_non_exhaustive()
    }
}

/// A regular expression and the handler it binds to.
#[derive(Clone)]
pub struct PatternDescriptor {
    regex: Regex,
    handler: BoxedHandler,
}

impl PatternDescriptor {
    /// Compiles `pattern` and binds it to `handler`.
    pub fn new<H: Handler>(pattern: &str, handler: H) -> RegistryResult<Self> {
        Self::from_boxed(pattern, into_handler(handler))
    }

    /// Compiles `pattern` and binds it to an already boxed handler.
    pub fn from_boxed(pattern: &str, handler: BoxedHandler) -> RegistryResult<Self> {
        let regex = Regex::new(pattern).map_err(|e| RegistryError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { regex, handler })
    }

    /// Binds a pre-compiled regular expression.
    pub fn from_regex<H: Handler>(regex: Regex, handler: H) -> Self {
        Self {
            regex,
            handler: into_handler(handler),
        }
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Returns the pattern source text.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn handler(&self) -> &BoxedHandler {
        &self.handler
    }
}

impl fmt::Debug for PatternDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternDescriptor")
            .field("pattern", &self.regex.as_str())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Storage for every handler a bot can dispatch to.
#[derive(Clone, Default)]
pub struct Registry {
    /// Commands in registration order.
    commands: Vec<CommandDescriptor>,
    /// Lowercased command name to index into `commands`.
    index: HashMap<String, usize>,
    /// Pattern handlers in registration order.
    patterns: Vec<PatternDescriptor>,
    default_handler: Option<BoxedHandler>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a command.
    ///
    /// Fails with [`RegistryError::DuplicateCommand`] if a command with the
    /// same name, compared case-insensitively, already exists.
    pub fn register_command(&mut self, descriptor: CommandDescriptor) -> RegistryResult<()> {
        descriptor.validate()?;

        let key = descriptor.name.to_lowercase();
        if self.index.contains_key(&key) {
            return Err(RegistryError::DuplicateCommand {
                name: descriptor.name,
            });
        }

        debug!(
            command = %descriptor.name,
            hidden = descriptor.hidden,
            "Registered command"
        );
        self.index.insert(key, self.commands.len());
        self.commands.push(descriptor);
        Ok(())
    }

    /// Appends a pattern handler.
    ///
    /// Patterns are tried in registration order. Registering the same
    /// pattern twice is allowed; only the first one can ever win.
    pub fn register_pattern(&mut self, descriptor: PatternDescriptor) {
        if self
            .patterns
            .iter()
            .any(|p| p.as_str() == descriptor.as_str())
        {
            warn!(
                pattern = descriptor.as_str(),
                "Pattern registered more than once, later copies are unreachable"
            );
        }

        debug!(pattern = descriptor.as_str(), "Registered pattern");
        self.patterns.push(descriptor);
    }

    /// Compiles and appends a pattern handler.
    pub fn handle_pattern<H: Handler>(&mut self, pattern: &str, handler: H) -> RegistryResult<()> {
        self.register_pattern(PatternDescriptor::new(pattern, handler)?);
        Ok(())
    }

    /// Sets the fallback handler. The last call wins.
    pub fn set_default_handler<H: Handler>(&mut self, handler: H) {
        self.set_default_boxed(into_handler(handler));
    }

    /// Sets the fallback handler from an already boxed handler.
    pub fn set_default_boxed(&mut self, handler: BoxedHandler) {
        if self.default_handler.is_some() {
            debug!("Replacing default handler");
        }
        self.default_handler = Some(handler);
    }

    /// Looks up a command by exact, case-insensitive name.
    pub fn lookup_command(&self, name: &str) -> Option<&CommandDescriptor> {
        self.index
            .get(&name.to_lowercase())
            .map(|&i| &self.commands[i])
    }

    /// Returns every command in registration order, hidden ones included.
    pub fn list_commands(&self) -> &[CommandDescriptor] {
        &self.commands
    }

    /// Returns every pattern handler in registration order.
    pub fn patterns(&self) -> &[PatternDescriptor] {
        &self.patterns
    }

    pub fn default_handler(&self) -> Option<&BoxedHandler> {
        self.default_handler.as_ref()
    }

    /// Returns the number of registered commands.
    pub fn command_count(&self) -> usize {
        self.commands.len()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("commands", &self.commands)
            .field("patterns", &self.patterns)
            .field("has_default", &self.default_handler.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::DispatchContext;

    async fn noop(_ctx: DispatchContext) {}

    #[test]
    fn test_lookup_is_case_insensitive() {
        let mut registry = Registry::new();
        registry
            .register_command(CommandDescriptor::new("Hi", noop).description("greets"))
            .unwrap();
        registry
            .register_command(CommandDescriptor::new("echo", noop))
            .unwrap();

        assert_eq!(registry.lookup_command("hi").unwrap().name(), "Hi");
        assert_eq!(registry.lookup_command("HI").unwrap().get_description(), "greets");
        assert_eq!(registry.lookup_command("ECHO").unwrap().name(), "echo");
        assert!(registry.lookup_command("ech").is_none());
        assert!(registry.lookup_command("echoes").is_none());
    }

    #[test]
    fn test_duplicate_command_any_case() {
        let mut registry = Registry::new();
        registry
            .register_command(CommandDescriptor::new("ping", noop))
            .unwrap();

        let err = registry
            .register_command(CommandDescriptor::new("PiNg", noop))
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateCommand { ref name } if name == "PiNg"));
        assert_eq!(registry.command_count(), 1);
    }

    #[test]
    fn test_invalid_command_names() {
        let mut registry = Registry::new();
        for name in ["", "two words", "back`tick"] {
            let err = registry
                .register_command(CommandDescriptor::new(name, noop))
                .unwrap_err();
            assert!(matches!(err, RegistryError::InvalidCommandName { .. }));
        }
    }

    #[test]
    fn test_list_commands_in_registration_order() {
        let mut registry = Registry::new();
        for name in ["zeta", "alpha", "mid"] {
            registry
                .register_command(CommandDescriptor::new(name, noop))
                .unwrap();
        }
        let names: Vec<_> = registry.list_commands().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_duplicate_patterns_are_kept() {
        let mut registry = Registry::new();
        registry.handle_pattern("thanks", noop).unwrap();
        registry.handle_pattern("thanks", noop).unwrap();
        assert_eq!(registry.patterns().len(), 2);
    }

    #[test]
    fn test_invalid_pattern() {
        let mut registry = Registry::new();
        let err = registry.handle_pattern("(unclosed", noop).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidPattern { .. }));
        assert!(registry.patterns().is_empty());
    }

    #[test]
    fn test_default_handler_last_wins() {
        let mut registry = Registry::new();
        assert!(registry.default_handler().is_none());

        let first = into_handler(noop);
        let second = into_handler(noop);
        registry.set_default_boxed(first);
        registry.set_default_boxed(second.clone());

        let current = registry.default_handler().unwrap();
        assert!(std::sync::Arc::ptr_eq(current, &second));
    }

    #[test]
    fn test_empty_usage_becomes_single_template() {
        let cmd = CommandDescriptor::new("x", noop).usage(Vec::<String>::new());
        assert_eq!(cmd.usage_templates(), &[String::new()]);
    }
}
