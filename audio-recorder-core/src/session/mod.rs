pub mod device_guard;
pub mod recorder;
pub mod registry;
