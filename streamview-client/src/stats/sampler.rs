use streamview_core::StatsSample;

/// Derives inbound bitrate from consecutive counter readings.
///
/// Only the immediately preceding sample is kept; a new one always replaces
/// it, whether or not a bitrate could be derived.
#[derive(Debug, Default, Clone)]
pub struct StatsSampler {
    prev: Option<StatsSample>,
}

impl StatsSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the bitrate in kbps between the previous sample and `sample`,
    /// or `None` when there is no previous sample or the result is not
    /// positive.
    pub fn sample(&mut self, sample: StatsSample) -> Option<u32> {
        let prev = self.prev.replace(sample)?;
        bitrate_kbps(&prev, &sample)
    }

    /// Drops the previous sample.
    pub fn reset(&mut self) {
        self.prev = None;
    }
}

pub fn bitrate_kbps(prev: &StatsSample, now: &StatsSample) -> Option<u32> {
    let elapsed_ms = now.timestamp_ms - prev.timestamp_ms;
    if elapsed_ms <= 0.0 {
        return None;
    }

    let bytes = now.bytes_received as f64 - prev.bytes_received as f64;
    let kbps = (8.0 * bytes / (elapsed_ms / 1000.0) / 1000.0).round();
    if kbps <= 0.0 || !kbps.is_finite() {
        return None;
    }

    Some(kbps.min(u32::MAX as f64) as u32)
}
