//! async-std runtime implementation.

use std::future::Future;
use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use async_std::net::UdpSocket as AsyncStdUdpSocket;

use super::{AsyncUdpSocket, TimedOut};

/// async-std-based UDP socket.
#[derive(Debug)]
pub struct UdpSocket(AsyncStdUdpSocket);

impl AsyncUdpSocket for UdpSocket {
    async fn bind(addr: &str) -> io::Result<Self> {
        AsyncStdUdpSocket::bind(addr).await.map(UdpSocket)
    }

    fn local_addr(&self) -> io::Result<SocketAddr> {
        self.0.local_addr()
    }

    fn join_multicast_v4(&self, multiaddr: Ipv4Addr, interface: Ipv4Addr) -> io::Result<()> {
        self.0.join_multicast_v4(multiaddr, interface)
    }

    async fn send_to(&self, buf: &[u8], addr: &str) -> io::Result<usize> {
        self.0.send_to(buf, addr).await
    }

    async fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)> {
        self.0.recv_from(buf).await
    }
}

/// Run a future with a timeout using async-std.
pub async fn timeout_impl<F, T>(duration: Duration, future: F) -> Result<T, TimedOut>
where
    F: Future<Output = T>,
{
    async_std::future::timeout(duration, future)
        .await
        .map_err(|_| TimedOut)
}
