//! # hue_bridge_rs
//!
//! An async Rust library that presents local devices to voice assistants
//! as a Philips Hue bridge.
//!
//! This crate provides a **runtime-agnostic** emulation of the bridge
//! surface Alexa-class assistants rely on: an SSDP discovery responder, a
//! UPnP description document, and the small subset of the Hue REST API
//! the assistants actually emit (list lights, read a light, set a
//! light's state). Incoming state changes are translated into callbacks
//! on your devices, so any light you can drive from Rust becomes voice
//! controllable without a real bridge.
//!
//! ## Quick Start
//!
//! ```ignore
//! use hue_bridge_rs::{Bridge, BridgeConfig, Device};
//!
//! // Works with any async runtime!
//! async fn run() -> Result<(), Box<dyn std::error::Error>> {
//!     let mac = "de:ad:be:ef:12:34".parse()?;
//!     let mut bridge = Bridge::new(BridgeConfig::with_detected_ip(mac)?);
//!
//!     bridge.add_device(Device::brightness("Kitchen", |bri| {
//!         // 0 is off, anything else is on at that level
//!         println!("kitchen -> {bri}");
//!     }))?;
//!
//!     bridge.begin().await?;
//!     loop {
//!         // One non-blocking discovery check per call; pair this with
//!         // your HTTP server feeding bridge.handle_api_call(...).
//!         bridge.poll().await?;
//!     }
//! }
//! ```
//!
//! ## Features
//!
//! - **Discovery**: answers SSDP `M-SEARCH` probes with the byte-exact
//!   reply assistants expect from a [`Bridge`]
//! - **Brightness Devices**: on/off and dimming with last-level restore
//!   via [`Device::brightness`]
//! - **Color Devices**: hue/saturation and color-temperature modes via
//!   [`Device::color`], resolved to RGB with [`Color`]
//! - **Registry**: stable 1-based device ids in a fixed-capacity
//!   [`DeviceRegistry`]
//! - **Dispatch**: the recognized REST shapes as a pure, independently
//!   testable parser in [`dispatch`]
//!
//! ## Serving HTTP
//!
//! The bridge core deliberately does not speak HTTP. Bring any HTTP
//! server, register `/description.xml` and a fall-through handler, and
//! forward `(path, body)` pairs to [`Bridge::handle_api_call`]; see the
//! [`Bridge`] docs for the exact contract.
//!
//! ## Runtime Selection
//!
//! This library is runtime-agnostic. Select your preferred runtime using
//! feature flags:
//!
//! ### Using tokio (default)
//!
//! ```toml
//! [dependencies]
//! hue-bridge-rs = "0.1"
//! tokio = { version = "1", features = ["rt-multi-thread", "macros"] }
//! ```
//!
//! ### Using async-std
//!
//! ```toml
//! [dependencies]
//! hue-bridge-rs = { version = "0.1", default-features = false, features = ["runtime-async-std"] }
//! async-std = { version = "1.12", features = ["attributes"] }
//! ```
//!
//! ### Using smol
//!
//! ```toml
//! [dependencies]
//! hue-bridge-rs = { version = "0.1", default-features = false, features = ["runtime-smol"] }
//! smol = "2"
//! ```
//!
//! ## Feature Flags
//!
//! - `runtime-tokio` (default): Use the tokio async runtime
//! - `runtime-async-std`: Use the async-std runtime
//! - `runtime-smol`: Use the smol runtime

mod bridge;
mod config;
mod descriptor;
mod device;
pub mod discovery;
pub mod dispatch;
mod errors;
mod registry;
pub mod runtime;
mod types;

// Re-export public API
pub use bridge::{Bridge, BridgeId};
pub use config::{BridgeConfig, HardwareAddr};
pub use descriptor::{description_xml, device_descriptor, status_page};
pub use device::{Capability, Device, DeviceCallback};
pub use discovery::DiscoveryResponder;
pub use dispatch::{ApiCommand, ApiReply, StateAction, parse_api_call};
pub use errors::Error;
pub use registry::{DeviceId, DeviceRegistry};
pub use types::{Color, ColorMode, HueSaturation, Mireds, brightness};
