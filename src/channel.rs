use tokio::{io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader}, time::{timeout_at, Instant}};

use crate::error::ReadError;

/// newline-delimited text over a byte stream
pub struct LineChannel<S> {
	stream: BufReader<S>,
	max_line: usize,
	buf: Vec<u8>,
}

impl<S> LineChannel<S> where S: AsyncRead + AsyncWrite + Unpin {
	pub fn new(stream: S, max_line: usize) -> Self {
		LineChannel {
			stream: BufReader::new(stream),
			max_line,
			buf: Vec::with_capacity(256),
		}
	}

	/// wait for one full line until `deadline`, return it trimmed
	///
	/// a line cut short by the peer closing counts as `Eof`, its partial content is dropped
	pub async fn read_line(&mut self, deadline: Instant) -> Result<String, ReadError> {
		self.buf.clear();
		// a CRLF terminator may take two bytes past the cap
		let limit = (self.max_line as u64).saturating_add(2);
		let mut capped = (&mut self.stream).take(limit);

		let n = match timeout_at(deadline, capped.read_until(b'\n', &mut self.buf)).await {
			Ok(res) => res?,
			Err(_elapsed) => return Err(ReadError::Timeout),
		};

		if n == 0 {
			return Err(ReadError::Eof);
		}

		if self.buf.last() != Some(&b'\n') {
			if n as u64 >= limit {
				return Err(ReadError::TooLong { limit: self.max_line });
			}
			return Err(ReadError::Eof);
		}

		if content_len(&self.buf) > self.max_line {
			return Err(ReadError::TooLong { limit: self.max_line });
		}

		Ok(String::from_utf8_lossy(&self.buf).trim().to_string())
	}

	pub async fn write_line(&mut self, text: &str) -> std::io::Result<()> {
		let writer = self.stream.get_mut();
		writer.write_all(text.as_bytes()).await?;
		writer.write_all(b"\n").await?;
		writer.flush().await
	}

	/// shut down the write side, the stream itself goes away on drop
	pub async fn close(&mut self) -> std::io::Result<()> {
		self.stream.get_mut().shutdown().await
	}
}

/// bytes before the `\n` or `\r\n` terminator
fn content_len(line: &[u8]) -> usize {
	match line {
		[.., b'\r', b'\n'] => line.len() - 2,
		[.., b'\n'] => line.len() - 1,
		_ => line.len(),
	}
}

#[cfg(test)]
mod tests {
	use std::time::Duration;

	use tokio::io::{duplex, AsyncReadExt, AsyncWriteExt};

	use super::*;

	fn soon() -> Instant {
		Instant::now() + Duration::from_secs(5)
	}

	#[tokio::test]
	async fn reads_trimmed_lines_in_order() {
		let (local, mut remote) = duplex(1024);
		let mut chan = LineChannel::new(local, 64);
		remote.write_all(b"  hello  \r\nsecond\n").await.unwrap();

		assert_eq!(chan.read_line(soon()).await.unwrap(), "hello");
		assert_eq!(chan.read_line(soon()).await.unwrap(), "second");
	}

	#[tokio::test]
	async fn clean_close_is_eof() {
		let (local, remote) = duplex(1024);
		let mut chan = LineChannel::new(local, 64);
		drop(remote);

		assert!(matches!(chan.read_line(soon()).await, Err(ReadError::Eof)));
	}

	#[tokio::test]
	async fn partial_line_then_close_is_eof() {
		let (local, mut remote) = duplex(1024);
		let mut chan = LineChannel::new(local, 64);
		remote.write_all(b"no terminator").await.unwrap();
		drop(remote);

		assert!(matches!(chan.read_line(soon()).await, Err(ReadError::Eof)));
	}

	#[tokio::test]
	async fn silence_hits_deadline() {
		let (local, _remote) = duplex(1024);
		let mut chan = LineChannel::new(local, 64);
		let deadline = Instant::now() + Duration::from_millis(50);

		assert!(matches!(chan.read_line(deadline).await, Err(ReadError::Timeout)));
	}

	#[tokio::test]
	async fn oversized_line_is_rejected() {
		let (local, mut remote) = duplex(1024);
		let mut chan = LineChannel::new(local, 8);
		remote.write_all(b"0123456789abcdef\n").await.unwrap();

		assert!(matches!(chan.read_line(soon()).await, Err(ReadError::TooLong { limit: 8 })));
	}

	#[tokio::test]
	async fn line_at_cap_is_accepted() {
		let (local, mut remote) = duplex(1024);
		let mut chan = LineChannel::new(local, 8);
		remote.write_all(b"01234567\n").await.unwrap();

		assert_eq!(chan.read_line(soon()).await.unwrap(), "01234567");
	}

	#[tokio::test]
	async fn crlf_terminator_does_not_count_against_cap() {
		let (local, mut remote) = duplex(1024);
		let mut chan = LineChannel::new(local, 8);
		remote.write_all(b"01234567\r\n").await.unwrap();

		assert_eq!(chan.read_line(soon()).await.unwrap(), "01234567");
	}

	#[tokio::test]
	async fn one_byte_over_cap_is_rejected() {
		let (local, mut remote) = duplex(1024);
		let mut chan = LineChannel::new(local, 8);
		remote.write_all(b"012345678\n").await.unwrap();

		assert!(matches!(chan.read_line(soon()).await, Err(ReadError::TooLong { limit: 8 })));
	}

	#[tokio::test]
	async fn unbounded_cap_still_reads_lines() {
		let (local, mut remote) = duplex(1024);
		let mut chan = LineChannel::new(local, usize::MAX);
		remote.write_all(b"hello\n").await.unwrap();

		assert_eq!(chan.read_line(soon()).await.unwrap(), "hello");
	}

	#[test]
	fn content_len_strips_terminators() {
		assert_eq!(content_len(b"abc\r\n"), 3);
		assert_eq!(content_len(b"abc\n"), 3);
		assert_eq!(content_len(b"\n"), 0);
		assert_eq!(content_len(b"abc"), 3);
	}

	#[tokio::test]
	async fn invalid_utf8_is_decoded_lossily() {
		let (local, mut remote) = duplex(1024);
		let mut chan = LineChannel::new(local, 64);
		remote.write_all(b"ab\xffcd\n").await.unwrap();

		assert_eq!(chan.read_line(soon()).await.unwrap(), "ab\u{FFFD}cd");
	}

	#[tokio::test]
	async fn writes_terminated_lines() {
		let (local, mut remote) = duplex(1024);
		let mut chan = LineChannel::new(local, 64);
		chan.write_line("pong").await.unwrap();
		chan.close().await.unwrap();

		let mut out = String::new();
		remote.read_to_string(&mut out).await.unwrap();
		assert_eq!(out, "pong\n");
	}
}
