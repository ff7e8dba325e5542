use std::sync::Mutex;
use streamview_client::{MediaKind, MediaSegment, MediaSource, PresentationSurface, RemoteStream};

/// What the controller did to the surface, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    Manifest(String),
    Remote(String),
    Track(String, MediaKind),
    SegmentFeed(String),
    Clear,
    Segment(u64),
    Overlay(Option<String>),
}

/// Surface that records every call.
pub struct MockSurface {
    native_hls: bool,
    calls: Mutex<Vec<SurfaceCall>>,
    remote_track_kinds: Mutex<Vec<(String, MediaKind)>>,
    segments: Mutex<Vec<MediaSegment>>,
}

impl MockSurface {
    pub fn new() -> Self {
        Self::with_native_hls(false)
    }

    pub fn with_native_hls(native_hls: bool) -> Self {
        Self {
            native_hls,
            calls: Mutex::new(Vec::new()),
            remote_track_kinds: Mutex::new(Vec::new()),
            segments: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| **c == SurfaceCall::Clear)
            .count()
    }

    pub fn remote_bindings(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                SurfaceCall::Remote(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    /// Stream id and kind of every track handed over, bound one first.
    pub fn remote_tracks(&self) -> Vec<(String, MediaKind)> {
        self.remote_track_kinds.lock().unwrap().clone()
    }

    pub fn last_overlay(&self) -> Option<Option<String>> {
        self.calls().into_iter().rev().find_map(|c| match c {
            SurfaceCall::Overlay(text) => Some(text),
            _ => None,
        })
    }

    pub fn segments(&self) -> Vec<MediaSegment> {
        self.segments.lock().unwrap().clone()
    }
}

impl PresentationSurface for MockSurface {
    fn supports_native_hls(&self) -> bool {
        self.native_hls
    }

    fn set_source(&self, source: MediaSource) {
        let call = match source {
            MediaSource::Manifest(url) => SurfaceCall::Manifest(url.to_string()),
            MediaSource::Remote(stream) => {
                self.remote_track_kinds
                    .lock()
                    .unwrap()
                    .push((stream.stream_id.clone(), stream.kind));
                SurfaceCall::Remote(stream.stream_id)
            }
            MediaSource::SegmentFeed(url) => SurfaceCall::SegmentFeed(url.to_string()),
        };
        self.calls.lock().unwrap().push(call);
    }

    fn add_track(&self, track: RemoteStream) {
        self.remote_track_kinds
            .lock()
            .unwrap()
            .push((track.stream_id.clone(), track.kind));
        self.calls
            .lock()
            .unwrap()
            .push(SurfaceCall::Track(track.stream_id, track.kind));
    }

    fn clear_source(&self) {
        self.calls.lock().unwrap().push(SurfaceCall::Clear);
    }

    fn append_segment(&self, segment: MediaSegment) {
        self.calls
            .lock()
            .unwrap()
            .push(SurfaceCall::Segment(segment.sequence));
        self.segments.lock().unwrap().push(segment);
    }

    fn set_overlay(&self, message: Option<&str>) {
        self.calls
            .lock()
            .unwrap()
            .push(SurfaceCall::Overlay(message.map(str::to_string)));
    }
}
