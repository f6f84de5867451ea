use std::{net::SocketAddr, sync::Arc};

use tokio::net::TcpListener;
use tracing::{debug, error, info};

use crate::{config::ServerConfig, error::ServerError, session::Session};

/// accept loop, one independent session task per connection
pub struct Server {
	listener: TcpListener,
	config: Arc<ServerConfig>,
}

impl Server {
	pub async fn bind(config: ServerConfig) -> Result<Self, ServerError> {
		let addr = config.addr();
		let listener = TcpListener::bind(addr).await
			.map_err(|source| ServerError::Bind { addr, source })?;
		info!("server listening on {}", listener.local_addr()?);
		Ok(Server { listener, config: Arc::new(config) })
	}

	pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
		Ok(self.listener.local_addr()?)
	}

	/// never returns: failed accepts are logged and skipped
	pub async fn serve(self) {
		loop {
			match self.listener.accept().await {
				Ok((stream, addr)) => {
					debug!("accepted connection from {}", addr);
					let config = self.config.clone();
					tokio::spawn(async move {
						Session::open(addr.to_string(), stream, &config).run().await
					});
				},
				Err(e) => error!("could not accept connection: {}", e),
			}
		}
	}
}
