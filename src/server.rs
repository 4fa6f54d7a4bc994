use std::pin::Pin;
use std::task::{ready, Context, Poll};

use axum::extract::connect_info::Connected;
use axum::Router;
use bindable::BindableAddr;
use hyper::server::accept::Accept;
use tokio::net::{UnixListener, UnixStream};

use crate::Error;

struct UnixIncoming(UnixListener);

impl Accept for UnixIncoming {
	type Conn = UnixStream;
	type Error = std::io::Error;

	fn poll_accept(
		self: Pin<&mut Self>,
		cx: &mut Context<'_>,
	) -> Poll<Option<Result<Self::Conn, Self::Error>>> {
		let (stream, _addr) = ready!(self.0.poll_accept(cx))?;
		Poll::Ready(Some(Ok(stream)))
	}
}

#[derive(Clone, Copy, Debug)]
struct UnixConnectInfo;

impl Connected<&UnixStream> for UnixConnectInfo {
	fn connect_info(_target: &UnixStream) -> Self {
		Self
	}
}

pub async fn run(app: Router, addr: &BindableAddr) -> Result<(), Error> {
	match addr {
		BindableAddr::Tcp(socket_addr) => {
			axum::Server::bind(socket_addr)
				.serve(app.into_make_service())
				.await
		}
		BindableAddr::Unix(path) => {
			let listener =
				UnixListener::bind(path).map_err(|err| Error::BindUnix(err, path.clone()))?;
			axum::Server::builder(UnixIncoming(listener))
				.serve(app.into_make_service_with_connect_info::<UnixConnectInfo>())
				.await
		}
	}
	.map_err(Error::RunServer)
}
