//! Append-only per-client history files.

use std::{fs::{File, OpenOptions}, io::Write, path::{Path, PathBuf}};

use chrono::{DateTime, Local};
use tracing::{debug, warn};

use crate::helpers::{log_timestamp, sanitize_address};

pub trait SessionLog: Send {
	fn append(&mut self, at: DateTime<Local>, message: &str) -> std::io::Result<()>;
}

/// history file opened in append mode, never truncated
///
/// plain blocking `std::fs`: one short line per message, written from the session task
pub struct FileLog {
	path: PathBuf,
	file: File,
}

impl FileLog {
	pub fn open(path: PathBuf) -> std::io::Result<Self> {
		let file = OpenOptions::new()
			.create(true)
			.append(true)
			.open(&path)?;
		Ok(FileLog { path, file })
	}

	pub fn path(&self) -> &Path {
		&self.path
	}
}

impl SessionLog for FileLog {
	fn append(&mut self, at: DateTime<Local>, message: &str) -> std::io::Result<()> {
		// one write per line keeps lines whole even with O_APPEND races
		let line = format!("{}: {}\n", log_timestamp(at), message);
		self.file.write_all(line.as_bytes())
	}
}

/// stands in when the history file could not be opened
pub struct NullLog;

impl SessionLog for NullLog {
	fn append(&mut self, _at: DateTime<Local>, _message: &str) -> std::io::Result<()> {
		Ok(())
	}
}

pub fn log_file_name(client: &str) -> String {
	format!("client_{}.log", sanitize_address(client))
}

/// best effort: failure to open degrades to a [`NullLog`]
pub fn open(dir: &Path, client: &str) -> Box<dyn SessionLog> {
	let path = dir.join(log_file_name(client));
	match FileLog::open(path) {
		Ok(log) => {
			debug!("appending history of {} to {}", client, log.path().display());
			Box::new(log)
		},
		Err(e) => {
			warn!("could not open log file for {}: {}", client, e);
			Box::new(NullLog)
		},
	}
}
