//! Bridge identity and configuration.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::Error;

type Result<T> = std::result::Result<T, Error>;

/// The hardware (MAC) address the bridge presents as its identity.
///
/// The emulated ecosystem derives everything identity-related from this
/// value: the bridge serial, the discovery UUID, and per-device unique
/// ids. It is read once at configuration time and reused verbatim for the
/// process lifetime.
///
/// # Examples
///
/// ```
/// use hue_bridge_rs::HardwareAddr;
///
/// let mac: HardwareAddr = "de:ad:be:ef:12:34".parse().unwrap();
/// assert_eq!(mac.to_string(), "DE:AD:BE:EF:12:34");
/// assert_eq!(mac.serial(), "deadbeef1234");
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct HardwareAddr([u8; 6]);

impl HardwareAddr {
    /// Create from raw octets.
    pub fn new(octets: [u8; 6]) -> Self {
        HardwareAddr(octets)
    }

    /// Get the raw octets.
    pub fn octets(&self) -> [u8; 6] {
        self.0
    }

    /// The lowercase, undelimited form used as the bridge serial and
    /// discovery identifier.
    pub fn serial(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Display for HardwareAddr {
    /// Formats as uppercase colon-separated octets, the form embedded in
    /// device unique ids.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

impl FromStr for HardwareAddr {
    type Err = Error;

    /// Parse from colon- or dash-separated hex octets, or 12 bare hex
    /// digits. Case-insensitive.
    fn from_str(s: &str) -> Result<Self> {
        let hex: String = s.chars().filter(|c| *c != ':' && *c != '-').collect();
        if hex.len() != 12 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidHardwareAddress(s.to_string()));
        }

        let mut octets = [0u8; 6];
        for (i, octet) in octets.iter_mut().enumerate() {
            *octet = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16)
                .map_err(|_| Error::InvalidHardwareAddress(s.to_string()))?;
        }
        Ok(HardwareAddr(octets))
    }
}

/// Configuration for a [`Bridge`](crate::Bridge) instance.
///
/// # Examples
///
/// ```
/// use std::net::Ipv4Addr;
/// use hue_bridge_rs::{BridgeConfig, HardwareAddr};
///
/// let mac: HardwareAddr = "de:ad:be:ef:12:34".parse().unwrap();
/// let config = BridgeConfig::new(Ipv4Addr::new(192, 168, 1, 40), mac)
///     .with_capacity(8);
/// assert_eq!(config.capacity, 8);
/// ```
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// The local IPv4 address advertised in discovery replies and the
    /// description document.
    pub ip: Ipv4Addr,
    /// The hardware address the bridge identity is derived from.
    pub mac: HardwareAddr,
    /// Maximum number of devices the registry will hold.
    pub capacity: usize,
}

impl BridgeConfig {
    /// Default registry capacity. The limit only has memory reasons;
    /// raise it freely via [`with_capacity`](Self::with_capacity).
    pub const DEFAULT_CAPACITY: usize = 20;

    pub fn new(ip: Ipv4Addr, mac: HardwareAddr) -> Self {
        BridgeConfig {
            ip,
            mac,
            capacity: Self::DEFAULT_CAPACITY,
        }
    }

    /// Build a configuration with the local IP taken from the first
    /// non-loopback IPv4 interface.
    pub fn with_detected_ip(mac: HardwareAddr) -> Result<Self> {
        let interfaces =
            if_addrs::get_if_addrs().map_err(|e| Error::socket("enumerate interfaces", e))?;
        let ip = interfaces
            .iter()
            .filter(|iface| !iface.is_loopback())
            .find_map(|iface| match iface.ip() {
                IpAddr::V4(v4) => Some(v4),
                IpAddr::V6(_) => None,
            })
            .ok_or(Error::NoIpv4Interface)?;
        Ok(Self::new(ip, mac))
    }

    /// Set the registry capacity.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }
}
