pub mod journal;
pub mod router;

use std::time::Duration;

use chrono::Local;
use tokio::{io::{AsyncRead, AsyncWrite}, time::Instant};
use tracing::{debug, info, warn};

use crate::{channel::LineChannel, config::ServerConfig, error::ReadError};

use self::journal::{NullLog, SessionLog};
use self::router::CommandResult;

pub const TIMEOUT_NOTICE : &str = "Connection timed out due to inactivity";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
	Active,
	Closing,
	Closed,
}

/// one connected client: its stream, its history file and its idle deadline
pub struct Session<S> {
	client: String,
	channel: LineChannel<S>,
	log: Box<dyn SessionLog>,
	idle_timeout: Duration,
	state: SessionState,
}

impl<S> Session<S> where S: AsyncRead + AsyncWrite + Unpin {
	pub fn new(client: String, stream: S, log: Box<dyn SessionLog>, idle_timeout: Duration, max_line: usize) -> Self {
		Session {
			client,
			channel: LineChannel::new(stream, max_line),
			log,
			idle_timeout,
			state: SessionState::Active,
		}
	}

	/// opens the client history file next to the others in `config.log_dir`
	pub fn open(client: String, stream: S, config: &ServerConfig) -> Self {
		let log = journal::open(&config.log_dir, &client);
		Session::new(client, stream, log, config.idle_timeout, config.max_line)
	}

	pub fn client(&self) -> &str {
		&self.client
	}

	pub fn state(&self) -> SessionState {
		self.state
	}

	pub async fn run(mut self) {
		info!("client connected: {}", self.client);
		loop {
			self.state = match self.state {
				SessionState::Active => self.step().await,
				SessionState::Closing => {
					self.close().await;
					SessionState::Closed
				},
				SessionState::Closed => break,
			};
		}
		info!("client disconnected: {}", self.client);
	}

	async fn step(&mut self) -> SessionState {
		let deadline = Instant::now() + self.idle_timeout;
		match self.channel.read_line(deadline).await {
			Ok(message) => self.handle(&message).await,
			Err(ReadError::Timeout) => {
				info!("client {} timed out", self.client);
				self.notify(TIMEOUT_NOTICE).await;
				SessionState::Closing
			},
			Err(ReadError::TooLong { limit }) => {
				warn!("client {} sent a line over {} bytes", self.client, limit);
				self.notify(&format!("Message too long (limit {} bytes), closing connection", limit)).await;
				SessionState::Closing
			},
			Err(ReadError::Eof) => {
				debug!("client {} closed the connection", self.client);
				SessionState::Closing
			},
			Err(ReadError::Io(e)) => {
				warn!("could not read from client {}: {}", self.client, e);
				SessionState::Closing
			},
		}
	}

	async fn handle(&mut self, message: &str) -> SessionState {
		debug!("received from {}: {}", self.client, message);
		if let Err(e) = self.log.append(Local::now(), message) {
			warn!("could not append to log of {}: {}", self.client, e);
		}

		let CommandResult { response, terminate } = router::decide(message);
		// a failed write surfaces again on the next read
		self.notify(&response).await;

		if terminate { SessionState::Closing } else { SessionState::Active }
	}

	async fn notify(&mut self, text: &str) {
		if let Err(e) = self.channel.write_line(text).await {
			warn!("could not send response to {}: {}", self.client, e);
		}
	}

	async fn close(&mut self) {
		// drops the history file handle
		self.log = Box::new(NullLog);
		if let Err(e) = self.channel.close().await {
			debug!("could not shut down connection of {}: {}", self.client, e);
		}
	}
}
