//! Mimetypes the raw recorder can produce.

use crate::models::audio_format::{AudioFormat, MIMETYPE_L16, MIMETYPE_L8};
use crate::traits::device_access::DeviceAccess;

/// Base mimetypes (without parameters) in rough order of priority.
pub const SUPPORTED_TYPES: [&str; 2] = [MIMETYPE_L8, MIMETYPE_L16];

/// All supported base mimetypes, or none if the audio subsystem is absent.
///
/// Parameters are never listed: `audio/L8` is supported, but a session
/// needs at least `audio/L8;rate=<hz>`.
pub fn supported_types(device_access: &dyn DeviceAccess) -> Vec<&'static str> {
    if !device_access.is_available() {
        return Vec::new();
    }
    SUPPORTED_TYPES.to_vec()
}

/// Whether a session could be created for `mimetype` (parameters included).
pub fn is_supported_type(device_access: &dyn DeviceAccess, mimetype: &str) -> bool {
    device_access.is_available() && AudioFormat::parse(mimetype).is_some()
}
