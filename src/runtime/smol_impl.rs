//! smol runtime implementation.

use std::future::Future;
use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use async_io::Async;

use super::{AsyncUdpSocket, TimedOut};

/// smol-based UDP socket using async-io.
#[derive(Debug)]
pub struct UdpSocket(Async<std::net::UdpSocket>);

impl AsyncUdpSocket for UdpSocket {
    async fn bind(addr: &str) -> io::Result<Self> {
        let socket = std::net::UdpSocket::bind(addr)?;
        Async::new(socket).map(UdpSocket)
    }

    fn local_addr(&self) -> io::Result<SocketAddr> {
        self.0.get_ref().local_addr()
    }

    fn join_multicast_v4(&self, multiaddr: Ipv4Addr, interface: Ipv4Addr) -> io::Result<()> {
        self.0.get_ref().join_multicast_v4(&multiaddr, &interface)
    }

    async fn send_to(&self, buf: &[u8], addr: &str) -> io::Result<usize> {
        let addr: SocketAddr = addr
            .parse()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        self.0.send_to(buf, addr).await
    }

    async fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)> {
        self.0.recv_from(buf).await
    }
}

/// Run a future with a timeout using smol.
pub async fn timeout_impl<F, T>(duration: Duration, future: F) -> Result<T, TimedOut>
where
    F: Future<Output = T>,
{
    use futures::future::Either;

    let timeout_future = smol::Timer::after(duration);

    futures::pin_mut!(future);
    futures::pin_mut!(timeout_future);

    match futures::future::select(future, timeout_future).await {
        Either::Left((result, _)) => Ok(result),
        Either::Right((_, _)) => Err(TimedOut),
    }
}
