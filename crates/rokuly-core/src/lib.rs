//! Device workflows on top of `rokuly-api`.
//!
//! This crate owns everything between raw ECP calls and a test runner:
//!
//! - **[`Device`]**: Facade over one Roku: remote-control keys, channel
//!   launch/input, info queries, sideload and screenshot workflows. Every
//!   call re-reads state from the device; nothing is cached.
//!
//! - **Readiness** ([`readiness`]): Bounded fixed-interval poll of the
//!   app UI until the `FAILED` status marker disappears.
//!
//! - **UI snapshots** ([`UiSnapshot`], [`ui`]): The app-ui XML parsed into
//!   an owned [`UiNode`] tree, mirrored to a temp file, queried with
//!   [`Selector`]s and the bounds/visible display rules.
//!
//! - **[`DeviceUiDriver`]**: Capability trait a host automation framework
//!   binds to. [`RokuUiDriver`] implements it by refreshing the snapshot
//!   before every predicate.
//!
//! - **[`Session`]**: Validates configuration and performs the optional
//!   auto-install before a test run.

pub mod config;
pub mod device;
pub mod driver;
pub mod error;
pub mod install;
pub mod model;
pub mod readiness;
pub mod remote;
pub mod screenshot;
pub mod session;
pub mod snapshot;
pub mod ui;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{AutoInstall, DeviceConfig};
pub use device::Device;
pub use driver::{DeviceUiDriver, RokuUiDriver, WaitOptions};
pub use error::CoreError;
pub use model::App;
pub use readiness::{AppUiSource, ReadinessPolicy, wait_for_app_ready};
pub use remote::Key;
pub use screenshot::Screenshot;
pub use session::Session;
pub use snapshot::UiSnapshot;
pub use ui::{Bounds, Location, Selector, Size, UiNode, Viewport};

pub use rokuly_api::{DeviceCredentials, ParamValue, QueryParams};
