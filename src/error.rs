use std::net::SocketAddr;

use thiserror::Error;

/// outcome of a failed `LineChannel::read_line`
#[derive(Debug, Error)]
pub enum ReadError {
	#[error("peer closed the stream")]
	Eof,

	#[error("no message before the inactivity deadline")]
	Timeout,

	#[error("line exceeds {limit} bytes")]
	TooLong { limit: usize },

	#[error("transport failure: {0}")]
	Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ServerError {
	#[error("could not bind on {addr} : {source}")]
	Bind {
		addr: SocketAddr,
		#[source]
		source: std::io::Error,
	},

	#[error(transparent)]
	Io(#[from] std::io::Error),
}
