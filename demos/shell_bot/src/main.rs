//! Shell Bot Example
//!
//! Type messages into the terminal; the bot answers on stdout.
//!
//! ```text
//! hi                      -> Bye shell!
//! fields `a b` c          -> a b
//!                            c
//! thank you, bot          -> You're welcome shell!
//! dance                   -> Unrecognized command. Type `help` to see supported commands.
//! help                    -> hi - Says goodbye when the user says hi!
//!                            ...
//! help echo               -> echo - Hidden `echo` command!
//! /dm hi                  -> (direct message) Bye shell!
//! /quit                   -> exits
//! ```
//!
//! # Usage
//!
//! ```bash
//! cargo run --package shell-bot
//! cargo run --package shell-bot -- --config demos/shell_bot/herald.toml
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use herald::prelude::*;
use herald::runtime::config::ConfigLoader;
use herald::shell::ShellAdapter;

#[derive(Debug, Parser)]
#[command(about = "Run a Herald bot on stdin/stdout")]
struct Args {
    /// Configuration file to load instead of searching the default locations.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Configuration profile (development, production, ...).
    #[arg(short, long)]
    profile: Option<String>,

    /// Only answer commands that address the bot by name.
    #[arg(long)]
    require_address: bool,
}

// ============================================================================
// Handlers
// ============================================================================

async fn bye(ctx: DispatchContext) -> ChatResult<()> {
    let msg = format!("Bye {}!", ctx.message().user().name);
    ctx.reply(&msg).await
}

async fn echo(ctx: DispatchContext) -> ChatResult<()> {
    let text = ctx.fields().join(" ");
    ctx.reply(&text).await
}

async fn fields(ctx: DispatchContext) -> ChatResult<()> {
    let listing = ctx.fields().join("\n");
    ctx.reply(&listing).await
}

async fn thanks(ctx: DispatchContext) -> ChatResult<()> {
    let msg = format!("You're welcome {}!", ctx.message().user().name);
    ctx.reply(&msg).await
}

async fn unrecognized(ctx: DispatchContext) -> ChatResult<()> {
    ctx.reply("Unrecognized command. Type `help` to see supported commands.")
        .await
}

fn add_handlers(robot: &mut Robot) -> Result<()> {
    // Shown by `help`.
    robot.handle_command(
        CommandDescriptor::new("hi", bye)
            .description("Says goodbye when the user says hi!")
            .usage([""]),
    )?;
    // Only shown by `help echo`.
    robot.handle_command(
        CommandDescriptor::new("echo", echo)
            .description("Hidden `echo` command!")
            .usage(["", "`text to echo`"])
            .hidden(true),
    )?;
    robot.handle_command(
        CommandDescriptor::new("fields", fields)
            .description("Show the fields/parameters of a command message!")
            .usage(["`param0` `param1` `...`"]),
    )?;
    robot.handle_pattern(r"(?i)\b(thanks|thank\s+you)\b", thanks)?;
    robot.set_default_handler(unrecognized);
    robot.enable_help_command()?;
    Ok(())
}

fn add_observers(observers: &mut EventObservers) {
    observers
        .on_connecting(|| info!("Connecting event fired"))
        .on_connected(|| info!("Connected event fired"))
        .on_user(|event| info!(user = %event.user.name, change = ?event.change, "User event"))
        .on_channel(|event| {
            info!(channel = %event.channel.id, change = ?event.change, "Channel event")
        })
        .on_unrecognized(|event| info!(kind = event.kind(), "Unrecognized chat event"))
        .on_error(|err| {
            if err.is_fatal() {
                error!(error = %err, "Fatal chat adapter error");
            } else {
                warn!(error = %err, "Chat adapter error event");
            }
        });
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut loader = ConfigLoader::new().with_user_config_dir();
    if let Some(path) = &args.config {
        loader = loader.file(path);
    }
    if let Some(profile) = &args.profile {
        loader = loader.profile(profile);
    }
    if args.require_address {
        loader = loader.set("bot.require_address", true);
    }
    let config = loader.load()?;

    let mut robot = Robot::from_config::<ShellAdapter>(&config)?;
    add_handlers(&mut robot)?;
    add_observers(robot.observers());

    info!(bot = %robot.config().name, "Shell bot ready, type `help` or `/quit`");

    match robot.run_until_ctrl_c().await? {
        RunOutcome::Halted(reason) => {
            error!(reason = %reason, "Bot halted");
            std::process::exit(1);
        }
        outcome => info!(outcome = ?outcome, "Bot exited"),
    }

    Ok(())
}
