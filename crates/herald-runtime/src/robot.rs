//! The bot runtime.
//!
//! A [`Robot`] owns one chat adapter and wires its three streams:
//!
//! ```text
//!                 ┌──────────── messages ───────────▶ dispatch loop (sequential)
//!  ChatAdapter ───┼──────────── events ─────────────▶ Supervisor task
//!                 └──────────── errors ─────────────▶ Supervisor task
//! ```
//!
//! Messages are dispatched one at a time in arrival order. The run ends when
//! the message stream closes, when a fatal error halts the bot, or when a
//! [`RobotHandle`] asks it to stop.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut robot = Robot::new(BotConfig::default(), ShellAdapter::default());
//! robot.handle_command(CommandDescriptor::new("hi", hi).description("Says hi"))?;
//! robot.handle_pattern(r"\bthanks\b", thanks)?;
//! robot.set_default_handler(unknown);
//!
//! let outcome = robot.run_until_ctrl_c().await?;
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use herald_core::{
    AdapterStreams, BoxedAdapter, BoxedChat, ChatAdapter, ConfigurableAdapter, ErrorEvent,
    create_adapter_channels,
};
use herald_framework::{
    AddressPolicy, CommandDescriptor, DispatchOutcome, Dispatcher, HELP_COMMAND_NAME, Handler,
    Registry, help_command, render_help,
};

use crate::config::{BotConfig, ConfigLoader, HeraldConfig, validate_config};
use crate::error::{RuntimeError, RuntimeResult};
use crate::logging;
use crate::supervisor::{EventObservers, Supervisor};

/// How long a stopped adapter gets to return before its task is abandoned.
const ADAPTER_STOP_TIMEOUT: Duration = Duration::from_secs(5);

/// How a [`Robot::run`] ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The adapter closed its message stream.
    Completed,
    /// A [`RobotHandle`] requested shutdown.
    Stopped,
    /// The supervisor observed a fatal error.
    Halted(ErrorEvent),
}

/// Requests shutdown of a running [`Robot`] from elsewhere.
#[derive(Debug, Clone)]
pub struct RobotHandle {
    shutdown: CancellationToken,
}

impl RobotHandle {
    /// Asks the robot to stop; the adapter is stopped by the run loop.
    pub fn stop(&self) {
        self.shutdown.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.shutdown.is_cancelled()
    }
}

/// A chat bot: one adapter, one dispatcher, one supervisor.
pub struct Robot {
    config: BotConfig,
    adapter: BoxedAdapter,
    dispatcher: Dispatcher,
    observers: EventObservers,
    shutdown: CancellationToken,
}

impl Robot {
    /// Creates a robot around an adapter.
    pub fn new<A>(config: BotConfig, adapter: A) -> Self
    where
        A: ChatAdapter + 'static,
    {
        let adapter = Arc::new(adapter);
        let chat: BoxedChat = adapter.clone();
        let adapter: BoxedAdapter = adapter;

        let dispatcher = if config.require_address {
            Dispatcher::new(chat).with_address_policy(AddressPolicy::new(&config.name))
        } else {
            Dispatcher::new(chat).with_bot_name(&config.name)
        };

        Self {
            config,
            adapter,
            dispatcher,
            observers: EventObservers::new(),
            shutdown: CancellationToken::new(),
        }
    }

    /// Creates a robot from a loaded configuration.
    ///
    /// Initializes logging, validates the configuration and builds the adapter
    /// from its `adapters.<key>` section, falling back to the adapter's
    /// default configuration when the section is absent.
    pub fn from_config<A>(config: &HeraldConfig) -> RuntimeResult<Self>
    where
        A: ConfigurableAdapter + 'static,
    {
        logging::init_from_config(&config.logging);
        validate_config(config)?;

        let key = A::config_key();
        let adapter_config: A::Config = match config.adapter(key) {
            Some(value) => value.deserialize().map_err(|e| {
                RuntimeError::AdapterConfigDeserialize(format!(
                    "Failed to deserialize config for adapter '{key}': {e}"
                ))
            })?,
            None => {
                warn!(
                    adapter = key,
                    "No configuration found for adapter, using default"
                );
                A::Config::default()
            }
        };

        let adapter = A::from_config(adapter_config)?;

        info!(
            bot = %config.bot.name,
            adapter = key,
            log_level = %config.logging.level,
            "Robot initialized from configuration"
        );

        Ok(Self::new(config.bot.clone(), adapter))
    }

    /// Loads configuration from the default locations, then calls
    /// [`from_config`](Self::from_config).
    pub fn load<A>() -> RuntimeResult<Self>
    where
        A: ConfigurableAdapter + 'static,
    {
        let config = ConfigLoader::new().load()?;
        Self::from_config::<A>(&config)
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn registry(&self) -> &Registry {
        self.dispatcher.registry()
    }

    /// Returns the observers the supervisor will notify once running.
    pub fn observers(&mut self) -> &mut EventObservers {
        &mut self.observers
    }

    /// Returns a handle that can stop the robot while it runs.
    pub fn handle(&self) -> RobotHandle {
        RobotHandle {
            shutdown: self.shutdown.clone(),
        }
    }

    /// Registers a command.
    pub fn handle_command(&mut self, descriptor: CommandDescriptor) -> RuntimeResult<()> {
        self.dispatcher.registry_mut().register_command(descriptor)?;
        Ok(())
    }

    /// Registers a pattern handler.
    pub fn handle_pattern<H: Handler>(&mut self, pattern: &str, handler: H) -> RuntimeResult<()> {
        self.dispatcher
            .registry_mut()
            .handle_pattern(pattern, handler)?;
        Ok(())
    }

    /// Sets the handler for command-shaped messages nothing else matched.
    pub fn set_default_handler<H: Handler>(&mut self, handler: H) {
        self.dispatcher.registry_mut().set_default_handler(handler);
    }

    /// Registers the built-in `help` command unless a `help` command exists.
    pub fn enable_help_command(&mut self) -> RuntimeResult<()> {
        if self.registry().lookup_command(HELP_COMMAND_NAME).is_some() {
            debug!("A help command is already registered");
            return Ok(());
        }
        self.handle_command(help_command())
    }

    /// Renders the help text for the registered commands.
    pub fn render_help(&self) -> String {
        render_help(self.registry())
    }

    /// Asks the robot to stop. Equivalent to [`RobotHandle::stop`].
    pub fn stop(&self) {
        self.shutdown.cancel();
    }

    /// Runs until the adapter closes its streams, a fatal error halts the
    /// bot, or [`stop`](Self::stop) is called.
    pub async fn run(mut self) -> RuntimeResult<RunOutcome> {
        if self.config.help_command {
            self.enable_help_command()?;
        }

        let (sink, streams) = create_adapter_channels();
        let AdapterStreams {
            mut messages,
            events,
            errors,
        } = streams;

        let supervisor = Supervisor::new(std::mem::take(&mut self.observers));
        let halt = supervisor.halt_token();
        let supervisor_tasks = supervisor.spawn(events, errors);

        let adapter_name = self.adapter.name();
        info!(
            bot = %self.config.name,
            adapter = adapter_name,
            commands = self.registry().command_count(),
            patterns = self.registry().patterns().len(),
            "Starting robot"
        );

        let adapter = Arc::clone(&self.adapter);
        let mut adapter_task = tokio::spawn(async move { adapter.run(sink).await });

        let outcome = loop {
            tokio::select! {
                biased;
                () = halt.cancelled() => {
                    let reason = supervisor
                        .halt_reason()
                        .unwrap_or_else(|| ErrorEvent::other("halted", true));
                    break RunOutcome::Halted(reason);
                }
                () = self.shutdown.cancelled() => break RunOutcome::Stopped,
                message = messages.recv() => match message {
                    Some(message) => {
                        if let DispatchOutcome::Faulted { route, .. } =
                            self.dispatcher.dispatch(message).await
                        {
                            debug!(route = %route, "Dispatch finished with a contained fault");
                        }
                    }
                    None => break RunOutcome::Completed,
                },
            }
        };

        if outcome != RunOutcome::Completed {
            info!(outcome = ?outcome, adapter = adapter_name, "Stopping adapter");
            if let Err(e) = self.adapter.stop().await {
                warn!(adapter = adapter_name, error = %e, "Adapter failed to stop cleanly");
            }
        }
        drop(messages);

        let adapter_result = match tokio::time::timeout(ADAPTER_STOP_TIMEOUT, &mut adapter_task).await
        {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                error!(adapter = adapter_name, error = %e, "Adapter task ended abnormally");
                return Err(RuntimeError::Task(e.to_string()));
            }
            Err(_) => {
                warn!(adapter = adapter_name, "Adapter did not stop in time, aborting");
                adapter_task.abort();
                Ok(())
            }
        };

        if tokio::time::timeout(ADAPTER_STOP_TIMEOUT, supervisor_tasks.join())
            .await
            .is_err()
        {
            warn!("Event streams still open after adapter exit");
        }

        match adapter_result {
            Err(e) if outcome == RunOutcome::Completed => {
                error!(adapter = adapter_name, error = %e, "Adapter exited with an error");
                return Err(e.into());
            }
            Err(e) => warn!(adapter = adapter_name, error = %e, "Adapter error during shutdown"),
            Ok(()) => {}
        }

        debug!(state = %supervisor.state(), "Final connection state");
        info!(outcome = ?outcome, "Robot stopped");
        Ok(outcome)
    }

    /// Like [`run`](Self::run), but also stops on Ctrl+C.
    pub async fn run_until_ctrl_c(self) -> RuntimeResult<RunOutcome> {
        let handle = self.handle();
        let signal_task = tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Received Ctrl+C, shutting down");
                    handle.stop();
                }
                Err(e) => error!(error = %e, "Failed to listen for Ctrl+C"),
            }
        });

        let result = self.run().await;
        signal_task.abort();
        result
    }
}

impl std::fmt::Debug for Robot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Robot")
            .field("config", &self.config)
            .field("adapter", &self.adapter.name())
            .field("dispatcher", &self.dispatcher)
            .field("observers", &self.observers)
            .finish()
    }
}
