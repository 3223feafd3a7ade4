//! Passive discovery: answering SSDP search probes.
//!
//! Assistants locate the bridge by multicasting an `M-SEARCH` query to the
//! SSDP group. The responder answers matching probes with a unicast
//! datagram pointing at the bridge's description document; everything else
//! is discarded silently.

use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use log::debug;

use crate::bridge::BridgeId;
use crate::errors::Error;
use crate::runtime::{self, AsyncUdpSocket, UdpSocket};

type Result<T> = std::result::Result<T, Error>;

/// SSDP multicast group address.
pub const MULTICAST_ADDR: Ipv4Addr = Ipv4Addr::new(239, 255, 255, 250);

/// SSDP port.
pub const SSDP_PORT: u16 = 1900;

const SEARCH_MARKER: &str = "M-SEARCH";
const ROOT_DEVICE_TARGET: &str = "upnp:rootdevice";
const BASIC_DEVICE_TARGET: &str = "device:basic:1";

/// Whether a datagram payload is a search probe this bridge must answer.
///
/// A probe matches when it carries the search-request marker and asks for
/// either root devices or basic devices. Anything else is ignored.
///
/// # Examples
///
/// ```
/// use hue_bridge_rs::discovery::is_search_probe;
///
/// assert!(is_search_probe("M-SEARCH * HTTP/1.1\r\nST: upnp:rootdevice\r\n"));
/// assert!(is_search_probe("M-SEARCH * HTTP/1.1\r\nST: urn:schemas-upnp-org:device:basic:1\r\n"));
/// assert!(!is_search_probe("NOTIFY * HTTP/1.1\r\nNT: upnp:rootdevice\r\n"));
/// assert!(!is_search_probe("M-SEARCH * HTTP/1.1\r\nST: ssdp:all\r\n"));
/// ```
pub fn is_search_probe(payload: &str) -> bool {
    payload.contains(SEARCH_MARKER)
        && (payload.contains(ROOT_DEVICE_TARGET) || payload.contains(BASIC_DEVICE_TARGET))
}

/// Build the search response datagram.
///
/// The template is byte-exact: the discovery clients of the emulated
/// ecosystem match on field order and the literal server/device-type
/// strings, so none of this is negotiable.
pub fn search_response(ip: Ipv4Addr, bridge: &BridgeId) -> String {
    format!(
        "HTTP/1.1 200 OK\r\n\
         EXT:\r\n\
         CACHE-CONTROL: max-age=100\r\n\
         LOCATION: http://{ip}:80/description.xml\r\n\
         SERVER: FreeRTOS/6.0.5, UPnP/1.0, IpBridge/1.17.0\r\n\
         hue-bridgeid: {serial}\r\n\
         ST: urn:schemas-upnp-org:device:basic:1\r\n\
         USN: uuid:{uuid}::upnp:rootdevice\r\n\
         \r\n",
        serial = bridge.serial(),
        uuid = bridge.uuid(),
    )
}

/// Answers discovery probes arriving on the SSDP port.
///
/// One [`poll`](Self::poll) call checks for at most one pending datagram,
/// without blocking, and answers a matching probe with exactly one
/// unicast reply to the probe's source. No state is carried between
/// polls; a probe that is not observed on one poll is simply gone.
#[derive(Debug)]
pub struct DiscoveryResponder {
    socket: UdpSocket,
    ip: Ipv4Addr,
    bridge: BridgeId,
}

impl DiscoveryResponder {
    /// Bind the SSDP port and join the multicast group.
    ///
    /// Joining the group is the one operation discovery cannot work
    /// without, so failure here is the failure of bridge startup.
    pub async fn bind(ip: Ipv4Addr, bridge: BridgeId) -> Result<Self> {
        let socket = UdpSocket::bind(&format!("0.0.0.0:{SSDP_PORT}"))
            .await
            .map_err(|e| Error::socket("bind", e))?;
        socket
            .join_multicast_v4(MULTICAST_ADDR, Ipv4Addr::UNSPECIFIED)
            .map_err(|e| Error::socket("join multicast", e))?;
        Ok(Self { socket, ip, bridge })
    }

    /// Wrap an already bound socket. Lets tests (and hosts with unusual
    /// socket setups) skip the fixed port and group join.
    pub fn from_socket(socket: UdpSocket, ip: Ipv4Addr, bridge: BridgeId) -> Self {
        Self { socket, ip, bridge }
    }

    /// The address the responder's socket is bound to.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Check for one pending probe and answer it.
    ///
    /// Returns `Ok(true)` when a reply datagram was sent, `Ok(false)`
    /// when there was nothing to do (no datagram pending, or a datagram
    /// that is not a search probe).
    pub async fn poll(&self) -> Result<bool> {
        let mut buf = [0u8; 1024];
        match runtime::timeout(Duration::ZERO, self.socket.recv_from(&mut buf)).await {
            Ok(Ok((len, addr))) => {
                let payload = String::from_utf8_lossy(&buf[..len]);
                if !is_search_probe(&payload) {
                    return Ok(false);
                }
                debug!("answering search probe from {addr}");
                let response = search_response(self.ip, &self.bridge);
                self.socket
                    .send_to(response.as_bytes(), &addr.to_string())
                    .await
                    .map_err(|e| Error::socket("send_to", e))?;
                Ok(true)
            }
            Ok(Err(err)) => Err(Error::socket("recv_from", err)),
            Err(_) => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HardwareAddr;

    fn bridge() -> BridgeId {
        BridgeId::new(HardwareAddr::new([0xDE, 0xAD, 0xBE, 0xEF, 0x12, 0x34]))
    }

    #[test]
    fn probe_matching() {
        assert!(is_search_probe("M-SEARCH ... upnp:rootdevice"));
        assert!(is_search_probe("M-SEARCH ... urn:schemas-upnp-org:device:basic:1"));
        assert!(is_search_probe("upnp:rootdevice M-SEARCH"));
        assert!(!is_search_probe("M-SEARCH ... ssdp:all"));
        assert!(!is_search_probe("NOTIFY ... upnp:rootdevice"));
        assert!(!is_search_probe(""));
    }

    #[test]
    fn response_template_is_byte_exact() {
        let response = search_response(Ipv4Addr::new(192, 168, 1, 40), &bridge());
        assert_eq!(
            response,
            "HTTP/1.1 200 OK\r\n\
             EXT:\r\n\
             CACHE-CONTROL: max-age=100\r\n\
             LOCATION: http://192.168.1.40:80/description.xml\r\n\
             SERVER: FreeRTOS/6.0.5, UPnP/1.0, IpBridge/1.17.0\r\n\
             hue-bridgeid: deadbeef1234\r\n\
             ST: urn:schemas-upnp-org:device:basic:1\r\n\
             USN: uuid:2f402f80-da50-11e1-9b23-deadbeef1234::upnp:rootdevice\r\n\
             \r\n"
        );
    }

    #[cfg(feature = "runtime-tokio")]
    mod socket_roundtrip {
        use super::*;
        use std::time::Duration;

        #[tokio::test]
        async fn probe_gets_one_unicast_reply() {
            let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
            let responder =
                DiscoveryResponder::from_socket(socket, Ipv4Addr::new(127, 0, 0, 1), bridge());
            let responder_addr = responder.local_addr().unwrap();

            let prober = tokio::net::UdpSocket::bind("127.0.0.1:0").await.unwrap();
            prober
                .send_to(
                    b"M-SEARCH * HTTP/1.1\r\nST: upnp:rootdevice\r\n\r\n",
                    responder_addr,
                )
                .await
                .unwrap();

            let mut replied = false;
            for _ in 0..50 {
                if responder.poll().await.unwrap() {
                    replied = true;
                    break;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
            assert!(replied, "responder never saw the probe");

            let mut buf = [0u8; 1024];
            let (len, from) = tokio::time::timeout(
                Duration::from_secs(1),
                prober.recv_from(&mut buf),
            )
            .await
            .expect("no reply datagram")
            .unwrap();
            assert_eq!(from, responder_addr);
            let reply = String::from_utf8_lossy(&buf[..len]);
            assert!(reply.contains("LOCATION: http://127.0.0.1:80/description.xml"));
            assert!(reply.contains("hue-bridgeid: deadbeef1234"));
        }

        #[tokio::test]
        async fn non_probe_is_discarded() {
            let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
            let responder =
                DiscoveryResponder::from_socket(socket, Ipv4Addr::new(127, 0, 0, 1), bridge());
            let responder_addr = responder.local_addr().unwrap();

            let prober = tokio::net::UdpSocket::bind("127.0.0.1:0").await.unwrap();
            prober
                .send_to(b"NOTIFY * HTTP/1.1\r\n\r\n", responder_addr)
                .await
                .unwrap();

            for _ in 0..50 {
                assert!(!responder.poll().await.unwrap());
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        }

        #[tokio::test]
        async fn idle_poll_returns_immediately() {
            let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
            let responder =
                DiscoveryResponder::from_socket(socket, Ipv4Addr::new(127, 0, 0, 1), bridge());
            assert!(!responder.poll().await.unwrap());
        }
    }
}
