pub mod device_access;
pub mod output_stream;
pub mod recorder_delegate;
