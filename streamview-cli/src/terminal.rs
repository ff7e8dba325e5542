use colored::*;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use streamview_client::{
    LogEntry, LogLevel, LogSink, MediaSegment, MediaSource, PresentationSurface, RemoteStream,
};
use tokio::task::JoinHandle;
use tracing::debug;

/// Presentation surface for a terminal: reports what it would render and
/// drains remote RTP so the peer connection keeps flowing.
#[derive(Default)]
pub struct TerminalSurface {
    drains: Mutex<Vec<JoinHandle<()>>>,
    segment_bytes: AtomicU64,
}

impl TerminalSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads RTP off the track until it ends.
    fn drain(&self, stream: &RemoteStream) {
        let Some(track) = stream.track().cloned() else {
            return;
        };
        let handle = tokio::spawn(async move {
            while track.read_rtp().await.is_ok() {}
            debug!("Remote track {} ended", track.id());
        });
        self.drains
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(handle);
    }

    fn stop_drains(&self) {
        let mut drains = self.drains.lock().unwrap_or_else(|e| e.into_inner());
        for handle in drains.drain(..) {
            handle.abort();
        }
    }
}

impl PresentationSurface for TerminalSurface {
    fn supports_native_hls(&self) -> bool {
        false
    }

    fn set_source(&self, source: MediaSource) {
        match source {
            MediaSource::Manifest(url) | MediaSource::SegmentFeed(url) => {
                println!("{} {}", "▶ Playing".green().bold(), url);
            }
            MediaSource::Remote(stream) => {
                println!(
                    "{} remote stream {} ({:?})",
                    "▶ Playing".green().bold(),
                    stream.stream_id,
                    stream.kind
                );
                self.drain(&stream);
            }
        }
    }

    fn add_track(&self, track: RemoteStream) {
        println!("  + {:?} track {}", track.kind, track.track_id);
        self.drain(&track);
    }

    fn clear_source(&self) {
        self.stop_drains();
        self.segment_bytes.store(0, Ordering::Relaxed);
        println!("{}", "■ Stopped".yellow());
    }

    fn append_segment(&self, segment: MediaSegment) {
        let total = self
            .segment_bytes
            .fetch_add(segment.data.len() as u64, Ordering::Relaxed)
            + segment.data.len() as u64;
        println!(
            "  segment #{} {:.1}s {} bytes (total {})",
            segment.sequence,
            segment.duration.as_secs_f32(),
            segment.data.len(),
            total
        );
    }

    fn set_overlay(&self, message: Option<&str>) {
        if let Some(message) = message {
            println!("{}", format!("[{message}]").dimmed());
        }
    }
}

/// Prints controller log lines with their level colored.
pub struct TerminalLog;

impl LogSink for TerminalLog {
    fn write(&self, entry: &LogEntry) {
        let level = match entry.level {
            LogLevel::Debug => return,
            LogLevel::Info => "INFO".cyan(),
            LogLevel::Warn => "WARN".yellow(),
            LogLevel::Error => "ERROR".red().bold(),
        };
        println!(
            "{} {} {}",
            entry.timestamp.format("%H:%M:%S").to_string().dimmed(),
            level,
            entry.message
        );
    }
}
