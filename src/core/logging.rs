use std::{fmt, io};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use flexi_logger::writers::LogWriter;
use flexi_logger::{
    colored_opt_format, opt_format, Age, Cleanup, Criterion, DeferredNow, Duplicate, FileSpec, Logger, LoggerHandle,
    Naming,
};
use log::{Level, LevelFilter, Record};
use once_cell::sync::OnceCell;
use twilight_http::error::ErrorType;
use twilight_http::Client as HttpClient;
use twilight_model::id::marker::WebhookMarker;
use twilight_model::id::Id;
use twilight_model::user::CurrentUser;

use crate::core::BotConfig;
use crate::error::StartupError;
use crate::utils::Emoji;
use crate::{clocktower_error, clocktower_warn};

static LOGGER_HANDLE: OnceCell<LoggerHandle> = OnceCell::new();
static BOT_USER: OnceCell<CurrentUser> = OnceCell::new();

const DISCORD_AVATAR_URL: &str = "https://cdn.discordapp.com/avatars/";
const MAX_MESSAGE_LENGTH: usize = 2000;
/// Lines kept while discord can't be reached, the oldest ones go first.
const MAX_QUEUED_LINES: usize = 500;

static INFO_QUEUE: LogQueue = LogQueue::new();
static IMPORTANT_QUEUE: LogQueue = LogQueue::new();

/// Log lines waiting to be pushed to a webhook.
///
/// Queues buffer from startup on, and are switched off when no webhook was configured for them.
struct LogQueue {
    active: AtomicBool,
    lines: Mutex<Vec<String>>,
}

impl LogQueue {
    const fn new() -> Self {
        LogQueue {
            active: AtomicBool::new(true),
            lines: Mutex::new(Vec::new()),
        }
    }

    fn push(&self, line: String) {
        if !self.active.load(Ordering::Relaxed) {
            return;
        }
        if let Ok(mut lines) = self.lines.lock() {
            if lines.len() >= MAX_QUEUED_LINES {
                let overflow = lines.len() + 1 - MAX_QUEUED_LINES;
                lines.drain(..overflow);
            }
            lines.push(line);
        }
    }

    fn disable(&self) {
        self.active.store(false, Ordering::Relaxed);
        if let Ok(mut lines) = self.lines.lock() {
            lines.clear();
        }
    }

    /// Takes as many lines as fit in a single discord message.
    fn take_batch(&self) -> Option<String> {
        let mut lines = self.lines.lock().ok()?;
        let mut length = 0;
        let mut count = 0;
        for line in lines.iter() {
            if length + line.len() + 1 > MAX_MESSAGE_LENGTH {
                break;
            }
            length += line.len() + 1;
            count += 1;
        }
        // a single line that is too long on its own still has to go out
        if count == 0 && !lines.is_empty() {
            let mut line = lines.remove(0);
            truncate(&mut line, MAX_MESSAGE_LENGTH);
            return Some(line);
        }
        if count == 0 {
            return None;
        }
        Some(lines.drain(..count).collect::<Vec<_>>().join("\n"))
    }

    fn requeue(&self, batch: String) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.insert(0, batch);
            lines.truncate(MAX_QUEUED_LINES);
        }
    }

    /// Only rate limited batches are worth another try, anything else would fail again.
    fn failed(&self, batch: String, error: &WebhookError) -> bool {
        let retry = error.is_rate_limited();
        if retry {
            self.requeue(batch);
        }
        retry
    }
}

#[derive(Debug)]
enum WebhookError {
    Invalid(String),
    Http(twilight_http::Error),
}

impl WebhookError {
    fn is_rate_limited(&self) -> bool {
        match self {
            WebhookError::Http(e) => is_rate_limit_status(match e.kind() {
                ErrorType::Response { status, .. } => Some(status.get()),
                _ => None,
            }),
            WebhookError::Invalid(_) => false,
        }
    }
}

impl fmt::Display for WebhookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebhookError::Invalid(e) => write!(f, "invalid webhook message: {}", e),
            WebhookError::Http(e) => write!(f, "{}", e),
        }
    }
}

fn is_rate_limit_status(status: Option<u16>) -> bool {
    status == Some(429)
}

fn truncate(line: &mut String, max: usize) {
    if line.len() > max {
        let mut end = max;
        while !line.is_char_boundary(end) {
            end -= 1;
        }
        line.truncate(end);
    }
}

pub fn initialize() -> Result<(), StartupError> {
    let handle = Logger::try_with_env_or_str("info")?
        .log_to_file(FileSpec::default().directory("logs"))
        .duplicate_to_stderr(Duplicate::Debug)
        .format_for_files(opt_format)
        .format_for_stderr(colored_opt_format)
        .rotate(
            Criterion::Age(Age::Day),
            Naming::Timestamps,
            Cleanup::KeepLogAndCompressedFiles(10, 30),
        )
        .add_writer("clocktower_important", Box::new(WebhookLogger { queue: &IMPORTANT_QUEUE }))
        .add_writer("clocktower_info", Box::new(WebhookLogger { queue: &INFO_QUEUE }))
        .start()?;

    if LOGGER_HANDLE.set(handle).is_err() {
        clocktower_error!("The logging system was attempted to be initalized a second time!");
    }

    Ok(())
}

pub fn initialize_discord_webhooks(http: Arc<HttpClient>, config: &BotConfig, user: CurrentUser) {
    if BOT_USER.set(user).is_err() {
        clocktower_warn!("Discord log webhooks were already initialized!");
        return;
    }
    for (queue, url) in [
        (&IMPORTANT_QUEUE, &config.logging.important_logs),
        (&INFO_QUEUE, &config.logging.info_logs),
    ] {
        match url.as_deref().map(parse_webhook) {
            Some(Ok((id, token))) => run(http.clone(), queue, id, token),
            Some(Err(e)) => {
                queue.disable();
                clocktower_error!("Invalid logging webhook url: {}", e);
            }
            None => queue.disable(),
        }
    }
}

fn parse_webhook(url: &str) -> Result<(Id<WebhookMarker>, String), String> {
    match twilight_util::link::webhook::parse(url) {
        Ok((id, Some(token))) => Ok((id, token.to_string())),
        Ok((_, None)) => Err(format!("{} has no token", url)),
        Err(e) => Err(e.to_string()),
    }
}

struct WebhookLogger {
    queue: &'static LogQueue,
}

impl LogWriter for WebhookLogger {
    fn write(&self, _now: &mut DeferredNow, record: &Record) -> io::Result<()> {
        let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S");
        let log_emote = get_emoji(record.level()).for_chat();
        self.queue
            .push(format!("``[{}]`` {} {}", timestamp, log_emote, record.args()));
        Ok(())
    }

    fn flush(&self) -> io::Result<()> {
        Ok(())
    }

    fn max_log_level(&self) -> LevelFilter {
        LevelFilter::Info
    }
}

fn run(http: Arc<HttpClient>, queue: &'static LogQueue, id: Id<WebhookMarker>, token: String) {
    tokio::spawn(async move {
        loop {
            while let Some(batch) = queue.take_batch() {
                if let Err(e) = send_webhook(&http, id, &token, &batch).await {
                    // logging this would just feed the queue again
                    eprintln!("Failed to push logs to discord: {}", e);
                    if queue.failed(batch, &e) {
                        break;
                    }
                }
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
    });
}

async fn send_webhook(http: &HttpClient, id: Id<WebhookMarker>, token: &str, message: &str) -> Result<(), WebhookError> {
    let invalid = |e: &dyn fmt::Display| WebhookError::Invalid(e.to_string());
    let avatar = BOT_USER.get().and_then(|user| {
        user.avatar
            .as_ref()
            .map(|hash| format!("{}{}/{}.png", DISCORD_AVATAR_URL, user.id, hash))
    });

    let mut executor = http.execute_webhook(id, token).content(message).map_err(|e| invalid(&e))?;
    if let Some(user) = BOT_USER.get() {
        executor = executor.username(&user.name).map_err(|e| invalid(&e))?;
    }
    if let Some(avatar) = &avatar {
        executor = executor.avatar_url(avatar);
    }
    executor.await.map(|_| ()).map_err(WebhookError::Http)
}

fn get_emoji(level: Level) -> Emoji {
    match level {
        Level::Error => Emoji::No,
        Level::Warn => Emoji::Warn,
        Level::Info => Emoji::Info,
        _ => Emoji::Info, // never send to discord so doesn't matter
    }
}

#[macro_use]
pub mod macros {
    #[macro_export]
    macro_rules! clocktower_info {
        ($($arg:tt)*) => (
            log::info!(target: "{clocktower_info,_Default}", $($arg)*)
        )
    }

    #[macro_export]
    macro_rules! clocktower_important {
        ($($arg:tt)*) => (
            log::info!(target: "{clocktower_important,clocktower_info,_Default}", $($arg)*)
        )
    }

    #[macro_export]
    macro_rules! clocktower_error {
        ($($arg:tt)*) => (
            log::error!(target: "{clocktower_important,clocktower_info,_Default}", $($arg)*)
        )
    }

    #[macro_export]
    macro_rules! clocktower_warn {
        ($($arg:tt)*) => (
            log::warn!(target: "{clocktower_important,clocktower_info,_Default}", $($arg)*)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batches_fit_in_a_message() {
        let queue = LogQueue::new();
        for _ in 0..30 {
            queue.push("x".repeat(100));
        }
        let first = queue.take_batch().unwrap();
        assert!(first.len() <= MAX_MESSAGE_LENGTH);
        assert_eq!(first.lines().count(), 19);
        let second = queue.take_batch().unwrap();
        assert_eq!(second.lines().count(), 11);
        assert!(queue.take_batch().is_none());
    }

    #[test]
    fn oversized_lines_are_cut() {
        let queue = LogQueue::new();
        queue.push("é".repeat(1500));
        let batch = queue.take_batch().unwrap();
        assert!(batch.len() <= MAX_MESSAGE_LENGTH);
        assert!(queue.take_batch().is_none());
    }

    #[test]
    fn queues_keep_the_newest_lines() {
        let queue = LogQueue::new();
        for i in 0..MAX_QUEUED_LINES + 20 {
            queue.push(format!("line {}", i));
        }
        let lines = queue.lines.lock().unwrap();
        assert_eq!(lines.len(), MAX_QUEUED_LINES);
        assert_eq!(lines[0], "line 20");
        assert_eq!(lines[MAX_QUEUED_LINES - 1], format!("line {}", MAX_QUEUED_LINES + 19));
    }

    #[test]
    fn only_rate_limits_are_retried() {
        assert!(is_rate_limit_status(Some(429)));
        assert!(!is_rate_limit_status(Some(404)));
        assert!(!is_rate_limit_status(None));

        let queue = LogQueue::new();
        let rejected = WebhookError::Invalid(String::from("too long"));
        assert!(!queue.failed(String::from("lost"), &rejected));
        assert!(queue.take_batch().is_none());

        queue.requeue(String::from("again"));
        assert_eq!(queue.take_batch().as_deref(), Some("again"));
    }

    #[test]
    fn disabled_queues_drop_lines() {
        let queue = LogQueue::new();
        queue.push(String::from("kept until disabled"));
        queue.disable();
        queue.push(String::from("dropped"));
        assert!(queue.take_batch().is_none());
    }
}
