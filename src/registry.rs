//! Ordered, fixed-capacity device storage.

use crate::device::Device;
use crate::errors::Error;

type Result<T> = std::result::Result<T, Error>;

/// Identifier of a registered device.
///
/// Ids are 1-based and assigned in insertion order; 0 is never a valid
/// device and doubles as the "all devices" sentinel in API paths.
pub type DeviceId = u32;

/// Owns every [`Device`] behind the bridge, in insertion order.
///
/// Ids are assigned sequentially starting at 1 and are never reused or
/// reassigned; devices are never removed. Capacity is fixed at
/// construction; the limit only has memory reasons.
///
/// # Example
///
/// ```
/// use hue_bridge_rs::{Device, DeviceRegistry};
///
/// let mut registry = DeviceRegistry::new(2);
/// let id = registry.add(Device::brightness("Desk", |_| {})).unwrap();
/// assert_eq!(id, 1);
/// assert_eq!(registry.get(id).unwrap().name(), "Desk");
/// assert!(registry.get(0).is_none());
/// ```
#[derive(Debug)]
pub struct DeviceRegistry {
    devices: Vec<Device>,
    capacity: usize,
}

impl DeviceRegistry {
    pub fn new(capacity: usize) -> Self {
        DeviceRegistry {
            devices: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Add a device, returning its newly assigned id.
    ///
    /// Fails with [`Error::RegistryFull`] once the configured capacity is
    /// reached; the device is not stored in that case and the caller
    /// decides whether that is fatal.
    pub fn add(&mut self, device: Device) -> Result<DeviceId> {
        if self.devices.len() >= self.capacity {
            return Err(Error::RegistryFull {
                capacity: self.capacity,
            });
        }
        self.devices.push(device);
        Ok(self.devices.len() as DeviceId)
    }

    /// Look up a device by id.
    ///
    /// Id 0 and ids beyond the current count resolve to `None`; an
    /// unresolvable id is "no such device", never an error.
    pub fn get(&self, id: DeviceId) -> Option<&Device> {
        if id == 0 {
            return None;
        }
        self.devices.get(id as usize - 1)
    }

    /// Mutable lookup with the same resolution rules as [`get`](Self::get).
    pub fn get_mut(&mut self, id: DeviceId) -> Option<&mut Device> {
        if id == 0 {
            return None;
        }
        self.devices.get_mut(id as usize - 1)
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate over `(id, device)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (DeviceId, &Device)> {
        self.devices
            .iter()
            .enumerate()
            .map(|(i, d)| (i as DeviceId + 1, d))
    }
}
