//! Maps one trimmed message to a reply.

use chrono::{DateTime, Utc};

use crate::helpers::http_date;

pub const EMPTY_PROMPT : &str = "Say something...";
pub const GREETING : &str = "Hello Wor.... i mean Hello there!";
pub const FAREWELL : &str = "Leaving so soon? Goodbye!";
pub const CLOSING : &str = "Closing connection";
pub const ECHO_USAGE : &str = "Usage: /echo <message>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
	pub response: String,
	pub terminate: bool,
}

impl CommandResult {
	fn reply(response: impl Into<String>) -> Self {
		CommandResult { response: response.into(), terminate: false }
	}

	fn last(response: impl Into<String>) -> Self {
		CommandResult { response: response.into(), terminate: true }
	}
}

/// slash command, token already lowercased
#[derive(Debug, PartialEq, Eq)]
pub enum Command<'a> {
	Time,
	Quit,
	Echo(Option<&'a str>),
	Unknown(String),
}

impl<'a> Command<'a> {
	/// `line` must start with `/`
	pub fn parse(line: &'a str) -> Self {
		let (token, argument) = match line.split_once(char::is_whitespace) {
			Some((token, rest)) => (token, Some(rest)),
			None => (line, None),
		};
		let token = token.to_lowercase();
		match token.as_str() {
			"/time" => Command::Time,
			"/quit" => Command::Quit,
			"/echo" => Command::Echo(argument.filter(|a| !a.is_empty())),
			_ => Command::Unknown(token),
		}
	}

	fn run(self, now: DateTime<Utc>) -> CommandResult {
		match self {
			Command::Time => CommandResult::reply(http_date(now)),
			Command::Quit => CommandResult::last(CLOSING),
			Command::Echo(Some(text)) => CommandResult::reply(text),
			Command::Echo(None) => CommandResult::reply(ECHO_USAGE),
			Command::Unknown(token) => CommandResult::reply(format!("Unknown command: {}", token)),
		}
	}
}

pub fn decide(message: &str) -> CommandResult {
	decide_at(message, Utc::now())
}

pub fn decide_at(message: &str, now: DateTime<Utc>) -> CommandResult {
	let message = message.trim();
	if message.is_empty() {
		return CommandResult::reply(EMPTY_PROMPT);
	}
	if message.starts_with('/') {
		return Command::parse(message).run(now);
	}
	if message.eq_ignore_ascii_case("hello") {
		CommandResult::reply(GREETING)
	} else if message.eq_ignore_ascii_case("bye") {
		CommandResult::last(FAREWELL)
	} else {
		CommandResult::reply(message)
	}
}
