use std::{net::IpAddr, path::PathBuf, process::ExitCode, time::Duration};

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use linewarden::{config, Server, ServerConfig};

/// line-oriented tcp chat responder with per-client history
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
	/// address to listen on
	#[arg(long, default_value = "0.0.0.0")]
	host: IpAddr,

	/// port to listen on
	#[arg(short, long, default_value_t = config::DEFAULT_PORT)]
	port: u16,

	/// seconds a client may stay silent before being dropped
	#[arg(long, default_value_t = config::IDLE_TIMEOUT.as_secs())]
	idle_timeout: u64,

	/// longest accepted line, in bytes
	#[arg(long, default_value_t = config::MAX_LINE)]
	max_line: usize,

	/// directory for client_*.log history files
	#[arg(long, default_value = ".")]
	log_dir: PathBuf,
}

impl From<Args> for ServerConfig {
	fn from(args: Args) -> Self {
		ServerConfig {
			host: args.host,
			port: args.port,
			idle_timeout: Duration::from_secs(args.idle_timeout),
			max_line: args.max_line,
			log_dir: args.log_dir,
		}
	}
}

fn main() -> ExitCode {
	let args = Args::parse();

	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.with_writer(std::io::stderr)
		.init();

	let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
		Ok(rt) => rt,
		Err(e) => {
			error!("could not start async runtime: {}", e);
			return ExitCode::FAILURE;
		},
	};

	runtime.block_on(run(args.into()))
}

async fn run(config: ServerConfig) -> ExitCode {
	let server = match Server::bind(config).await {
		Ok(s) => s,
		Err(e) => {
			error!("{}", e);
			return ExitCode::FAILURE;
		},
	};

	tokio::select! {
		_ = server.serve() => ExitCode::SUCCESS,
		res = tokio::signal::ctrl_c() => match res {
			Ok(()) => {
				info!("interrupted, shutting down");
				ExitCode::SUCCESS
			},
			Err(e) => {
				error!("could not listen for ctrl-c: {}", e);
				ExitCode::FAILURE
			},
		},
	}
}
