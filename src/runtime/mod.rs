//! Runtime-agnostic async abstractions.
//!
//! This module provides the UDP socket seam that lets the discovery
//! responder work with any async runtime (tokio, async-std, smol). The
//! bridge core never touches a concrete socket type directly.
//!
//! # Feature Flags
//!
//! Enable one of the following features to select your runtime:
//!
//! - `runtime-tokio` (default) - Use the tokio runtime
//! - `runtime-async-std` - Use the async-std runtime
//! - `runtime-smol` - Use the smol runtime

use std::future::Future;
use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

#[cfg(feature = "runtime-tokio")]
mod tokio_impl;

#[cfg(feature = "runtime-async-std")]
mod async_std_impl;

#[cfg(feature = "runtime-smol")]
mod smol_impl;

// Re-export the active runtime's types
#[cfg(feature = "runtime-tokio")]
pub use tokio_impl::*;

#[cfg(feature = "runtime-async-std")]
pub use async_std_impl::*;

#[cfg(feature = "runtime-smol")]
pub use smol_impl::*;

/// Trait for the async UDP socket operations the discovery responder
/// needs: bind, multicast membership, receiving a datagram with its
/// source address, and sending a unicast reply.
///
/// This trait abstracts over different async runtime's UDP socket
/// implementations, allowing the library to be runtime-agnostic.
pub trait AsyncUdpSocket: Send + Sync + Sized {
    /// Bind to the specified address.
    fn bind(addr: &str) -> impl Future<Output = io::Result<Self>> + Send;

    /// The local address the socket is bound to.
    fn local_addr(&self) -> io::Result<SocketAddr>;

    /// Join an IPv4 multicast group on the given interface.
    fn join_multicast_v4(&self, multiaddr: Ipv4Addr, interface: Ipv4Addr) -> io::Result<()>;

    /// Send data to a specific address.
    fn send_to(&self, buf: &[u8], addr: &str) -> impl Future<Output = io::Result<usize>> + Send;

    /// Receive data and the source address.
    fn recv_from(
        &self,
        buf: &mut [u8],
    ) -> impl Future<Output = io::Result<(usize, SocketAddr)>> + Send;
}

/// Run a future with a timeout.
///
/// Returns `Err(TimedOut)` if the timeout expires before the future
/// completes. A zero duration makes this a single non-blocking readiness
/// check: the future is polled once and `TimedOut` is returned if it is
/// not immediately ready.
pub async fn timeout<F, T>(duration: Duration, future: F) -> Result<T, TimedOut>
where
    F: Future<Output = T>,
{
    timeout_impl(duration, future).await
}

/// Error returned when a timeout expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedOut;

impl std::fmt::Display for TimedOut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "operation timed out")
    }
}

impl std::error::Error for TimedOut {}

// Compile-time check to ensure exactly one runtime is selected
#[cfg(not(any(
    feature = "runtime-tokio",
    feature = "runtime-async-std",
    feature = "runtime-smol"
)))]
compile_error!(
    "One of \"runtime-tokio\", \"runtime-async-std\", or \"runtime-smol\" features must be enabled"
);

#[cfg(all(feature = "runtime-tokio", feature = "runtime-async-std"))]
compile_error!("Features \"runtime-tokio\" and \"runtime-async-std\" are mutually exclusive");

#[cfg(all(feature = "runtime-tokio", feature = "runtime-smol"))]
compile_error!("Features \"runtime-tokio\" and \"runtime-smol\" are mutually exclusive");

#[cfg(all(feature = "runtime-async-std", feature = "runtime-smol"))]
compile_error!("Features \"runtime-async-std\" and \"runtime-smol\" are mutually exclusive");
