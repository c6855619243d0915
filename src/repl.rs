//! Interactive Command Loop
//!
//! Reads commands line by line and fetches resources through the cache.
//!
//! # Commands
//! - `help` - List available commands
//! - `map` - Show the next page of location areas
//! - `mapb` - Show the previous page of location areas
//! - `explore <area>` - List the Pokemon found in a location area
//! - `fetch <url-or-path>` - Fetch a raw resource, from cache when possible
//! - `stats` - Print cache statistics as JSON
//! - `exit` / `q` - Leave the loop

use std::io::BufRead;
use std::thread;

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::client::{CachedClient, LocationAreaPage};

const PROMPT: &str = "cache > ";
const LINE_BUFFER: usize = 16;

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Map,
    MapBack,
    Explore(String),
    Fetch(String),
    Stats,
    Exit,
}

impl Command {
    /// Parses cleaned input words into a command.
    ///
    /// Returns `Ok(None)` for a blank line and `Err` with a user-facing
    /// message for unknown commands or bad arguments.
    pub fn parse(words: &[String]) -> Result<Option<Self>, String> {
        let Some((name, args)) = words.split_first() else {
            return Ok(None);
        };

        let command = match (name.as_str(), args) {
            ("help", _) => Command::Help,
            ("map", _) => Command::Map,
            ("mapb", _) => Command::MapBack,
            ("stats", _) => Command::Stats,
            ("exit" | "q", _) => Command::Exit,
            ("explore", [area]) => Command::Explore(area.clone()),
            ("explore", _) => return Err("Usage: explore <area>".to_string()),
            ("fetch", [target]) => Command::Fetch(target.clone()),
            ("fetch", _) => return Err("Usage: fetch <url-or-path>".to_string()),
            (other, _) => return Err(format!("Invalid command: {}", other)),
        };
        Ok(Some(command))
    }
}

// == Session ==
/// Paging state carried between commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    base_url: String,
    next_page: Option<String>,
    previous_page: Option<String>,
}

impl Session {
    /// Starts on the first page of the location-area listing.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        let first_page = resolve_url(&base_url, "location-area");
        Self {
            base_url,
            next_page: Some(first_page),
            previous_page: None,
        }
    }

    pub fn next_page(&self) -> Option<&str> {
        self.next_page.as_deref()
    }

    pub fn previous_page(&self) -> Option<&str> {
        self.previous_page.as_deref()
    }

    /// Remembers the links of the page just shown.
    pub fn record_page(&mut self, page: &LocationAreaPage) {
        let link = |url: &Option<String>| url.clone().filter(|u| !u.is_empty());
        self.next_page = link(&page.next);
        self.previous_page = link(&page.previous);
    }

    /// URL of a location area given by name or by full URL.
    pub fn area_url(&self, area: &str) -> String {
        if is_absolute(area) {
            area.to_string()
        } else {
            resolve_url(&self.base_url, &format!("location-area/{}", area))
        }
    }
}

/// Splits a raw input line into words on any whitespace.
pub fn clean_input(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

fn is_absolute(target: &str) -> bool {
    target.starts_with("http://") || target.starts_with("https://")
}

/// Resolves a fetch target: absolute URLs pass through, anything else is
/// joined to `base_url`.
pub fn resolve_url(base_url: &str, target: &str) -> String {
    if is_absolute(target) {
        target.to_string()
    } else {
        format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            target.trim_start_matches('/')
        )
    }
}

/// Reads lines from `reader` on a dedicated thread.
///
/// Blocking reads stay off the runtime, so abandoning the command loop never
/// waits for input. The thread ends at end of input or once the receiver is
/// dropped and another line arrives.
pub fn spawn_line_reader<R>(reader: R) -> std::io::Result<mpsc::Receiver<String>>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel(LINE_BUFFER);

    thread::Builder::new()
        .name("line-reader".to_string())
        .spawn(move || {
            for line in reader.lines() {
                match line {
                    Ok(line) => {
                        if tx.blocking_send(line).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        warn!("Failed to read input: {}", err);
                        break;
                    }
                }
            }
        })?;

    Ok(rx)
}

/// Runs the command loop until `exit` or end of input.
///
/// Command failures are reported on `writer` and the loop continues.
pub async fn run_repl<W>(
    client: &CachedClient,
    base_url: &str,
    mut lines: mpsc::Receiver<String>,
    mut writer: W,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut session = Session::new(base_url);

    loop {
        writer.write_all(PROMPT.as_bytes()).await?;
        writer.flush().await?;

        let Some(line) = lines.recv().await else {
            break;
        };

        let command = match Command::parse(&clean_input(&line)) {
            Ok(Some(Command::Exit)) => break,
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                writer.write_all(format!("{}\n", message).as_bytes()).await?;
                continue;
            }
        };
        debug!("Running command {:?}", command);

        let output = execute(client, &mut session, command).await;
        writer.write_all(output.as_bytes()).await?;
    }

    writer.flush().await
}

/// Runs one command and renders its output. Errors are rendered, not returned.
async fn execute(client: &CachedClient, session: &mut Session, command: Command) -> String {
    match command {
        Command::Help => help_text(),
        Command::Exit => String::new(),
        Command::Stats => {
            let stats = client.cache().stats().await;
            match serde_json::to_string_pretty(&stats) {
                Ok(json) => format!("{}\n", json),
                Err(err) => format!("Failed to encode stats: {}\n", err),
            }
        }
        Command::Map => match session.next_page().map(str::to_string) {
            Some(url) => show_page(client, session, &url).await,
            None => "You're on the last page\n".to_string(),
        },
        Command::MapBack => match session.previous_page().map(str::to_string) {
            Some(url) => show_page(client, session, &url).await,
            None => "You're on the first page\n".to_string(),
        },
        Command::Explore(area) => {
            let url = session.area_url(&area);
            match client.location_area(&url).await {
                Ok(area) => {
                    let mut output = format!("Exploring {}...\n", area.name);
                    if area.pokemon_encounters.is_empty() {
                        output.push_str("No Pokemon found in this area\n");
                    } else {
                        output.push_str("Found Pokemon:\n");
                        for name in area.pokemon_names() {
                            output.push_str(&format!(" - {}\n", name));
                        }
                    }
                    output
                }
                Err(err) => format!("Error exploring {}: {}\n", area, err),
            }
        }
        Command::Fetch(target) => {
            let url = resolve_url(&session.base_url, &target);
            match client.fetch(&url).await {
                Ok(body) => format!("{} bytes from {}\n", body.len(), url),
                Err(err) => format!("Error fetching {}: {}\n", url, err),
            }
        }
    }
}

async fn show_page(client: &CachedClient, session: &mut Session, url: &str) -> String {
    match client.location_area_page(url).await {
        Ok(page) => {
            session.record_page(&page);
            page.results
                .iter()
                .map(|area| format!("{}\n", area.name))
                .collect()
        }
        Err(err) => format!("Error listing locations: {}\n", err),
    }
}

fn help_text() -> String {
    [
        "Available commands:",
        "help - Prints the help menu",
        "map - Shows the next page of location areas",
        "mapb - Shows the previous page of location areas",
        "explore <area> - Lists the Pokemon in a location area",
        "fetch <url-or-path> - Fetch a resource, from cache when possible",
        "stats - Prints cache statistics",
        "exit - Leaves the program",
        "",
    ]
    .join("\n")
}
