//! Client-side HLS engine for surfaces that cannot play a manifest natively.
//!
//! The engine polls the media playlist, downloads every segment it has not
//! seen yet and appends it to the surface in sequence order.

use crate::error::{EngineError, TransportError};
use crate::presentation::{MediaSegment, PresentationSurface};
use crate::transport::segmented::{EngineEvent, SegmentEngine, SegmentEngineFactory};
use bytes::Bytes;
use hls_m3u8::MediaPlaylist as HlsMediaPlaylist;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use url::Url;

/// Poll interval used until a playlist with a target duration was seen.
const FALLBACK_POLL_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistSegment {
    pub sequence: u64,
    pub uri: String,
    pub duration: Duration,
}

/// The parts of a media playlist the engine acts on.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPlaylist {
    pub target_duration: Duration,
    pub media_sequence: u64,
    pub segments: Vec<PlaylistSegment>,
    pub ended: bool,
}

pub fn parse_media_playlist(input: &str) -> Result<ParsedPlaylist, EngineError> {
    let hls_media = HlsMediaPlaylist::try_from(input)
        .map_err(|e| EngineError::PlaylistParse(e.to_string()))?
        .into_owned();

    let ended = hls_media.has_end_list;
    let media_sequence = hls_media.media_sequence as u64;

    let segments = hls_media
        .segments
        .iter()
        .enumerate()
        .map(|(index, (_idx, seg))| PlaylistSegment {
            sequence: media_sequence + index as u64,
            uri: seg.uri().to_string(),
            duration: seg.duration.duration(),
        })
        .collect();

    Ok(ParsedPlaylist {
        target_duration: hls_media.target_duration,
        media_sequence,
        segments,
        ended,
    })
}

/// Factory for [`HlsPullEngine`] sharing one HTTP client.
#[derive(Clone, Debug)]
pub struct HlsPullEngineFactory {
    client: reqwest::Client,
}

impl HlsPullEngineFactory {
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl SegmentEngineFactory for HlsPullEngineFactory {
    fn start(
        &self,
        manifest: Url,
        surface: Arc<dyn PresentationSurface>,
        events: mpsc::Sender<EngineEvent>,
    ) -> Result<Box<dyn SegmentEngine>, TransportError> {
        let puller = PlaylistPuller {
            client: self.client.clone(),
            manifest,
            surface,
            next_sequence: None,
        };
        let task = tokio::spawn(puller.run(events));
        Ok(Box::new(HlsPullEngine { task }))
    }
}

/// Handle of a running pull loop. Stopping or dropping it aborts the loop.
pub struct HlsPullEngine {
    task: JoinHandle<()>,
}

impl SegmentEngine for HlsPullEngine {
    fn stop(&self) {
        self.task.abort();
    }
}

impl Drop for HlsPullEngine {
    fn drop(&mut self) {
        self.task.abort();
    }
}

struct PlaylistPuller {
    client: reqwest::Client,
    manifest: Url,
    surface: Arc<dyn PresentationSurface>,
    next_sequence: Option<u64>,
}

impl PlaylistPuller {
    async fn run(mut self, events: mpsc::Sender<EngineEvent>) {
        let mut announced = false;
        let mut interval = FALLBACK_POLL_INTERVAL;

        loop {
            match self.fetch_playlist().await {
                Ok(playlist) => {
                    interval = playlist.target_duration.max(Duration::from_millis(100));

                    if !announced {
                        announced = true;
                        info!(
                            "Manifest parsed: {} segments, live={}",
                            playlist.segments.len(),
                            !playlist.ended
                        );
                        let _ = events
                            .send(EngineEvent::ManifestParsed {
                                segments: playlist.segments.len(),
                                live: !playlist.ended,
                            })
                            .await;
                    }

                    match self.append_new_segments(&playlist).await {
                        Ok(()) if playlist.ended => {
                            debug!("Playlist ended at sequence {:?}", self.next_sequence);
                            let _ = events.send(EngineEvent::Ended).await;
                            return;
                        }
                        Ok(()) => {}
                        Err(e) => {
                            warn!("Segment fetch failed: {}", e);
                            let _ = events.send(EngineEvent::Error(e.to_string())).await;
                        }
                    }
                }
                Err(e) => {
                    warn!("Manifest fetch failed: {}", e);
                    let _ = events.send(EngineEvent::Error(e.to_string())).await;
                }
            }

            tokio::time::sleep(interval).await;
        }
    }

    async fn get(&self, url: Url) -> Result<reqwest::Response, EngineError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::HttpStatus {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }
        Ok(response)
    }

    async fn fetch_playlist(&self) -> Result<ParsedPlaylist, EngineError> {
        let body = self.get(self.manifest.clone()).await?.text().await?;
        parse_media_playlist(&body)
    }

    async fn fetch_segment(&self, url: Url) -> Result<Bytes, EngineError> {
        Ok(self.get(url).await?.bytes().await?)
    }

    /// Appends every segment at or after `next_sequence`. Progress is kept per
    /// segment, so a failure resumes from the failed one on the next poll.
    async fn append_new_segments(&mut self, playlist: &ParsedPlaylist) -> Result<(), EngineError> {
        for segment in &playlist.segments {
            if self.next_sequence.is_some_and(|next| segment.sequence < next) {
                continue;
            }

            let uri = self.manifest.join(&segment.uri)?;
            let data = self.fetch_segment(uri.clone()).await?;
            debug!("Appending segment {} ({} bytes)", segment.sequence, data.len());

            self.surface.append_segment(MediaSegment {
                sequence: segment.sequence,
                uri,
                duration: segment.duration,
                data,
            });
            self.next_sequence = Some(segment.sequence + 1);
        }
        Ok(())
    }
}
