//! Help generator.
//!
//! A stateless, read-only view over a [`Registry`]. Hidden commands are left
//! out of the listing but can still be described by name.

use std::fmt::Write;

use herald_core::ChatResult;

use crate::context::DispatchContext;
use crate::registry::{CommandDescriptor, Registry};

/// Name of the built-in help command.
pub const HELP_COMMAND_NAME: &str = "help";

/// Renders every visible command as name, description and usage lines.
///
/// ```text
/// hi - Says goodbye when the user says hi!
///     hi
/// fields - Show the fields/parameters of a command message!
///     fields `param0` `param1` `...`
/// ```
pub fn render_help(registry: &Registry) -> String {
    let mut out = String::new();
    for command in registry.list_commands().iter().filter(|c| !c.is_hidden()) {
        write_command(&mut out, command);
    }

    if out.is_empty() {
        out.push_str("No commands available.");
    }
    out.truncate(out.trim_end().len());
    out
}

/// Renders a single command by name, hidden commands included.
pub fn render_command_help(registry: &Registry, name: &str) -> Option<String> {
    let command = registry.lookup_command(name)?;
    let mut out = String::new();
    write_command(&mut out, command);
    out.truncate(out.trim_end().len());
    Some(out)
}

fn write_command(out: &mut String, command: &CommandDescriptor) {
    if command.get_description().is_empty() {
        let _ = writeln!(out, "{}", command.name());
    } else {
        let _ = writeln!(out, "{} - {}", command.name(), command.get_description());
    }

    for usage in command.usage_templates() {
        let line = format!("{} {}", command.name(), usage);
        let _ = writeln!(out, "    {}", line.trim_end());
    }
}

/// Builds the `help` command.
///
/// `help` lists visible commands; `help <name>` describes one command.
pub fn help_command() -> CommandDescriptor {
    CommandDescriptor::new(HELP_COMMAND_NAME, help_handler)
        .description("Lists commands, or describes one command.")
        .usage(["", "`command`"])
}

async fn help_handler(ctx: DispatchContext) -> ChatResult<()> {
    let text = match ctx.field(0) {
        Some(name) => render_command_help(ctx.registry(), name)
            .unwrap_or_else(|| format!("No such command: `{name}`.")),
        None => render_help(ctx.registry()),
    };
    ctx.reply(&text).await
}
