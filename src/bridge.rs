//! The bridge facade tying registry, discovery and dispatch together.

use log::debug;
use uuid::Uuid;

use crate::config::{BridgeConfig, HardwareAddr};
use crate::descriptor;
use crate::device::Device;
use crate::discovery::DiscoveryResponder;
use crate::dispatch::{self, ApiReply};
use crate::errors::Error;
use crate::registry::{DeviceId, DeviceRegistry};

type Result<T> = std::result::Result<T, Error>;

/// The instance identifier the bridge presents on the network.
///
/// Derived from the hardware address once, at construction, and reused
/// verbatim for the process lifetime by both the discovery responder and
/// the description document.
#[derive(Debug, Clone)]
pub struct BridgeId {
    mac: HardwareAddr,
    serial: String,
}

impl BridgeId {
    pub fn new(mac: HardwareAddr) -> Self {
        BridgeId {
            serial: mac.serial(),
            mac,
        }
    }

    pub fn mac(&self) -> HardwareAddr {
        self.mac
    }

    /// The lowercase serial ("bridge id") form.
    pub fn serial(&self) -> &str {
        &self.serial
    }

    /// The discovery UUID: a fixed prefix with the hardware address as
    /// the node field.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_bridge_rs::BridgeId;
    ///
    /// let id = BridgeId::new("de:ad:be:ef:12:34".parse().unwrap());
    /// assert_eq!(
    ///     id.uuid().to_string(),
    ///     "2f402f80-da50-11e1-9b23-deadbeef1234",
    /// );
    /// ```
    pub fn uuid(&self) -> Uuid {
        let [a, b, c, d, e, f] = self.mac.octets();
        Uuid::from_fields(0x2f40_2f80, 0xda50, 0x11e1, &[0x9b, 0x23, a, b, c, d, e, f])
    }
}

/// An emulated bridge: a device registry plus the discovery responder and
/// API dispatcher that make it visible to voice assistants.
///
/// The bridge is single-threaded and cooperative. The host drives it with
/// repeated [`poll`](Self::poll) calls (each performing at most one
/// non-blocking discovery check) and forwards unhandled HTTP requests to
/// [`handle_api_call`](Self::handle_api_call). All device mutation and
/// every callback happens synchronously inside those calls.
///
/// # HTTP layer contract
///
/// The host owns the HTTP server on port 80 and must:
/// - serve [`description_xml`](Self::description_xml) at
///   `/description.xml` (content type `text/xml`),
/// - optionally serve [`status_page`](Self::status_page) at an
///   informational route (content type `text/plain`),
/// - for every other request, call
///   [`handle_api_call`](Self::handle_api_call) with the request path and
///   body, answer 200 with the returned reply, and fall back to its own
///   404 when the call returns `None`,
/// - send exactly one response per request.
///
/// # Example
///
/// ```ignore
/// use hue_bridge_rs::{Bridge, BridgeConfig, Device};
///
/// let mac = "de:ad:be:ef:12:34".parse()?;
/// let mut bridge = Bridge::new(BridgeConfig::with_detected_ip(mac)?);
/// bridge.add_device(Device::brightness("Kitchen", |bri| {
///     // drive the hardware
/// }))?;
/// bridge.begin().await?;
///
/// loop {
///     bridge.poll().await?;
///     // hand pending HTTP requests to bridge.handle_api_call(path, body)
/// }
/// ```
#[derive(Debug)]
pub struct Bridge {
    config: BridgeConfig,
    id: BridgeId,
    registry: DeviceRegistry,
    responder: Option<DiscoveryResponder>,
}

impl Bridge {
    pub fn new(config: BridgeConfig) -> Self {
        let id = BridgeId::new(config.mac);
        let registry = DeviceRegistry::new(config.capacity);
        Bridge {
            config,
            id,
            registry,
            responder: None,
        }
    }

    /// The fixed instance identifier.
    pub fn id(&self) -> &BridgeId {
        &self.id
    }

    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    pub fn device(&self, id: DeviceId) -> Option<&Device> {
        self.registry.get(id)
    }

    pub fn device_mut(&mut self, id: DeviceId) -> Option<&mut Device> {
        self.registry.get_mut(id)
    }

    /// Register a device. Fails with [`Error::RegistryFull`] beyond the
    /// configured capacity.
    pub fn add_device(&mut self, device: Device) -> Result<DeviceId> {
        let id = self.registry.add(device)?;
        debug!("added device {id}");
        Ok(id)
    }

    /// Start discovery: bind the SSDP port and join the multicast group.
    ///
    /// Success is solely whether the UDP join worked; there is nothing
    /// else to set up.
    pub async fn begin(&mut self) -> Result<()> {
        let responder = DiscoveryResponder::bind(self.config.ip, self.id.clone()).await?;
        self.responder = Some(responder);
        debug!("discovery responder up as {}", self.id.serial());
        Ok(())
    }

    /// Process one round of pending discovery activity.
    ///
    /// Checks for at most one pending probe datagram without blocking and
    /// answers it if it matches. Returns whether a reply was sent. Before
    /// [`begin`](Self::begin) this is a no-op.
    pub async fn poll(&mut self) -> Result<bool> {
        match &self.responder {
            Some(responder) => responder.poll().await,
            None => Ok(false),
        }
    }

    /// Recognize and execute one API request. `None` means the request is
    /// not an API call and the host should 404 it.
    pub fn handle_api_call(&mut self, path: &str, body: &str) -> Option<ApiReply> {
        dispatch::handle_api_call(&mut self.registry, &self.config.mac, path, body)
    }

    /// The UPnP description document for the host to serve at
    /// `/description.xml`.
    pub fn description_xml(&self) -> String {
        descriptor::description_xml(self.config.ip, &self.id)
    }

    /// Plain-text status overview for an informational route.
    pub fn status_page(&self) -> String {
        descriptor::status_page(&self.registry)
    }
}
