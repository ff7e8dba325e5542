use crate::config::ConnectRequest;
use crate::error::ViewerResult;
use crate::presentation::PlaybackEvent;
use tokio::sync::oneshot;

/// Requests sent from [`super::ViewerController`] to the loop.
#[derive(Debug)]
pub(crate) enum ControllerCommand {
    Toggle {
        reply: oneshot::Sender<ViewerResult<()>>,
    },

    Connect {
        request: ConnectRequest,
        reply: oneshot::Sender<ViewerResult<()>>,
    },

    Disconnect {
        reply: oneshot::Sender<()>,
    },

    Playback(PlaybackEvent),

    Shutdown {
        reply: oneshot::Sender<()>,
    },
}
