use std::{net::{IpAddr, Ipv4Addr, SocketAddr}, path::PathBuf, time::Duration};

pub const DEFAULT_PORT : u16 = 4000;
pub const IDLE_TIMEOUT : Duration = Duration::from_secs(30);
pub const MAX_LINE : usize = 1024;

#[derive(Debug, Clone)]
pub struct ServerConfig {
	pub host: IpAddr,
	pub port: u16,
	/// per-read deadline, re-armed before every read
	pub idle_timeout: Duration,
	/// longest accepted line in bytes, terminator excluded
	pub max_line: usize,
	/// where `client_*.log` files are created
	pub log_dir: PathBuf,
}

impl Default for ServerConfig {
	fn default() -> Self {
		ServerConfig {
			host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
			port: DEFAULT_PORT,
			idle_timeout: IDLE_TIMEOUT,
			max_line: MAX_LINE,
			log_dir: PathBuf::from("."),
		}
	}
}

impl ServerConfig {
	pub fn addr(&self) -> SocketAddr {
		SocketAddr::new(self.host, self.port)
	}
}
