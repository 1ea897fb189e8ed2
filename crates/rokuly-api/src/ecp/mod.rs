// ECP endpoint methods
//
// Each submodule adds inherent methods to `EcpClient`. Control-port calls
// return the raw `EcpResponse` so callers choose how to read the body and
// how to treat the status.

pub mod control;
pub mod dev;
pub mod query;

pub use dev::{ARCHIVE_FIELD, SCREENSHOT_FALLBACK_PATH, SUBMIT_FIELD, screenshot_path_from_inspect};
