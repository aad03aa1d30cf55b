use crate::traits::device_access::DeviceSource;

/// Owned handle on a granted audio input.
///
/// Releasing (explicitly or on drop) runs the teardown sequence exactly
/// once: detach the processing hook, disconnect the source, stop every
/// hardware track, then drop the source.
pub struct DeviceSubscription {
    source: Option<Box<dyn DeviceSource>>,
}

impl DeviceSubscription {
    pub fn new(source: Box<dyn DeviceSource>) -> Self {
        Self {
            source: Some(source),
        }
    }

    pub fn is_active(&self) -> bool {
        self.source.is_some()
    }

    /// Tear down the audio input now.
    pub fn release(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        let Some(mut source) = self.source.take() else {
            return;
        };

        source.disconnect_hook();
        source.disconnect();

        let tracks = source.tracks();
        for track in &tracks {
            track.stop();
        }
        drop(source);

        log::debug!("audio input released ({} tracks stopped)", tracks.len());
    }
}

impl Drop for DeviceSubscription {
    fn drop(&mut self) {
        self.teardown();
    }
}
