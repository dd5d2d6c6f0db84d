//! The shell adapter.
//!
//! Every line read from the input becomes one [`Message`] from the configured
//! shell user. A few lines are interpreted by the adapter itself:
//!
//! | Line          | Effect                                          |
//! |---------------|-------------------------------------------------|
//! | *(empty)*     | ignored                                         |
//! | `/dm <text>`  | `<text>` arrives as a direct message            |
//! | `/quit`       | disconnects, as if the input had ended          |
//!
//! End of input closes the adapter's streams, which ends the robot's run.
//!
//! Blocking readers such as the process's stdin are read on a dedicated
//! thread and forwarded over a channel, so [`ChatAdapter::stop`] never waits
//! for a pending read.

use std::pin::Pin;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use herald_core::{
    AdapterError, AdapterResult, AdapterSink, Channel, Chat, ChatAdapter, ChatError, ChatEvent,
    ChatResult, ConfigurableAdapter, ErrorEvent, Membership, Message, User, UserEvent,
};

use crate::config::ShellConfig;

type AsyncInput = Pin<Box<dyn AsyncBufRead + Send>>;
type BlockingInput = Box<dyn std::io::BufRead + Send>;
type Output = Pin<Box<dyn AsyncWrite + Send>>;

const QUIT_COMMAND: &str = "/quit";
const DIRECT_PREFIX: &str = "/dm ";
const READER_BUFFER: usize = 64;

enum Input {
    Async(AsyncInput),
    Blocking(BlockingInput),
}

enum LineSource {
    Async(Lines<AsyncInput>),
    Thread(mpsc::Receiver<std::io::Result<String>>),
}

impl LineSource {
    fn start(input: Input) -> std::io::Result<Self> {
        match input {
            Input::Async(reader) => Ok(Self::Async(reader.lines())),
            Input::Blocking(reader) => spawn_line_reader(reader).map(Self::Thread),
        }
    }

    async fn next_line(&mut self) -> std::io::Result<Option<String>> {
        match self {
            Self::Async(lines) => lines.next_line().await,
            Self::Thread(lines) => lines.recv().await.transpose(),
        }
    }
}

/// Reads `reader` line by line on its own thread.
///
/// The thread exits after the next line once the receiver is dropped; a read
/// that never returns only parks that thread.
fn spawn_line_reader(
    reader: BlockingInput,
) -> std::io::Result<mpsc::Receiver<std::io::Result<String>>> {
    let (tx, rx) = mpsc::channel(READER_BUFFER);
    std::thread::Builder::new()
        .name("herald-shell-input".into())
        .spawn(move || {
            for line in std::io::BufRead::lines(reader) {
                let failed = line.is_err();
                if tx.blocking_send(line).is_err() || failed {
                    break;
                }
            }
        })?;
    Ok(rx)
}

/// A chat backend on top of a line-oriented reader and writer.
pub struct ShellAdapter {
    config: ShellConfig,
    user: User,
    input: Mutex<Option<Input>>,
    output: tokio::sync::Mutex<Output>,
    stop: CancellationToken,
}

impl Default for ShellAdapter {
    fn default() -> Self {
        Self::new(ShellConfig::default())
    }
}

impl ShellAdapter {
    /// Creates an adapter on the process's stdin and stdout.
    pub fn new(config: ShellConfig) -> Self {
        Self::with_blocking_io(
            config,
            std::io::BufReader::new(std::io::stdin()),
            tokio::io::stdout(),
        )
    }

    /// Creates an adapter on arbitrary async I/O.
    pub fn with_io<R, W>(config: ShellConfig, input: R, output: W) -> Self
    where
        R: AsyncBufRead + Send + 'static,
        W: AsyncWrite + Send + 'static,
    {
        Self::build(config, Input::Async(Box::pin(input)), Box::pin(output))
    }

    /// Creates an adapter on a blocking reader, read on its own thread.
    pub fn with_blocking_io<R, W>(config: ShellConfig, input: R, output: W) -> Self
    where
        R: std::io::BufRead + Send + 'static,
        W: AsyncWrite + Send + 'static,
    {
        Self::build(config, Input::Blocking(Box::new(input)), Box::pin(output))
    }

    fn build(config: ShellConfig, input: Input, output: Output) -> Self {
        let user = User::new(&config.user_id, &config.user_name);
        Self {
            config,
            user,
            input: Mutex::new(Some(input)),
            output: tokio::sync::Mutex::new(output),
            stop: CancellationToken::new(),
        }
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    fn channel(&self) -> Channel {
        Channel::new(&self.config.channel, &self.config.channel)
    }

    fn direct_channel(&self) -> Channel {
        Channel::direct(&self.config.direct_channel)
    }

    /// Turns an input line into a message, or `None` for lines the adapter
    /// consumes itself.
    fn parse_line(&self, line: &str) -> Option<Message> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return None;
        }

        let (text, channel) = match line.strip_prefix(DIRECT_PREFIX) {
            Some(text) => (text, self.direct_channel()),
            None => (line, self.channel()),
        };

        Some(Message::new(text, self.user.clone(), channel, unix_timestamp()))
    }

    async fn write_raw(&self, text: &str) -> std::io::Result<()> {
        let mut output = self.output.lock().await;
        output.write_all(text.as_bytes()).await?;
        output.flush().await
    }

    async fn prompt(&self) {
        if self.config.prompt.is_empty() {
            return;
        }
        if let Err(e) = self.write_raw(&self.config.prompt).await {
            debug!(error = %e, "Failed to write prompt");
        }
    }
}

fn unix_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or_default()
}

#[async_trait]
impl Chat for ShellAdapter {
    async fn send(&self, channel_id: &str, text: &str) -> ChatResult<()> {
        if channel_id != self.config.channel && channel_id != self.config.direct_channel {
            return Err(ChatError::UnknownChannel(channel_id.to_string()));
        }

        let mut out = String::new();
        for line in text.lines() {
            out.push_str(&self.config.reply_prefix);
            out.push_str(line);
            out.push('\n');
        }
        if out.is_empty() {
            out.push_str(&self.config.reply_prefix);
            out.push('\n');
        }

        trace!(channel_id, "Writing outbound message");
        self.write_raw(&out)
            .await
            .map_err(|e| ChatError::SendFailed(e.to_string()))
    }

    fn users(&self) -> Vec<User> {
        vec![self.user.clone()]
    }
}

#[async_trait]
impl ChatAdapter for ShellAdapter {
    fn name(&self) -> &'static str {
        "shell"
    }

    async fn run(&self, sink: AdapterSink) -> AdapterResult<()> {
        let input = self
            .input
            .lock()
            .take()
            .ok_or(AdapterError::AlreadyRunning("shell"))?;
        let mut lines = LineSource::start(input)?;

        sink.event(ChatEvent::Connecting);
        sink.event(ChatEvent::Connected);
        sink.event(ChatEvent::User(UserEvent {
            user: self.user.clone(),
            change: Membership::Joined,
        }));
        info!(user = %self.user.name, channel = %self.config.channel, "Shell adapter connected");

        loop {
            self.prompt().await;

            let line = tokio::select! {
                biased;
                () = self.stop.cancelled() => {
                    debug!("Shell adapter stop requested");
                    break;
                }
                line = lines.next_line() => line,
            };

            match line {
                Ok(Some(line)) if line.trim() == QUIT_COMMAND => {
                    info!("Quit requested from the shell");
                    break;
                }
                Ok(Some(line)) => {
                    if let Some(message) = self.parse_line(&line)
                        && !sink.message(message)
                    {
                        debug!("Message stream closed, stopping shell adapter");
                        break;
                    }
                }
                Ok(None) => {
                    debug!("End of shell input");
                    break;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to read shell input");
                    sink.error(ErrorEvent::other(format!("shell input: {e}"), true));
                    break;
                }
            }
        }

        sink.error(ErrorEvent::Disconnect { intentional: true });
        Ok(())
    }

    async fn stop(&self) -> AdapterResult<()> {
        self.stop.cancel();
        Ok(())
    }
}

impl ConfigurableAdapter for ShellAdapter {
    type Config = ShellConfig;

    fn config_key() -> &'static str {
        "shell"
    }

    fn from_config(config: Self::Config) -> AdapterResult<Self> {
        if config.channel.is_empty() {
            return Err(AdapterError::InvalidConfig(
                "shell channel must not be empty".into(),
            ));
        }
        if config.channel == config.direct_channel {
            return Err(AdapterError::InvalidConfig(
                "shell channel and direct_channel must differ".into(),
            ));
        }
        Ok(Self::new(config))
    }
}
