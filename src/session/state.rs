/// What the session is currently doing. Exactly one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Recording,
    Playing,
    Paused,
}

impl SessionState {
    /// Playing or paused mid-playback
    pub fn is_playback(&self) -> bool {
        matches!(self, Self::Playing | Self::Paused)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Idle => write!(f, "idle"),
            SessionState::Recording => write!(f, "recording"),
            SessionState::Playing => write!(f, "playing"),
            SessionState::Paused => write!(f, "paused"),
        }
    }
}

/// Why a requested transition was ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    EmptyRecording,
    RecordingActive,
    PlaybackActive,
    AlreadyRecording,
    AlreadyPlaying,
    AlreadyPaused,
    NotRecording,
    NotPlaying,
    NotPaused,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            Rejection::EmptyRecording => "nothing has been recorded",
            Rejection::RecordingActive => "stop recording first",
            Rejection::PlaybackActive => "stop playback first",
            Rejection::AlreadyRecording => "already recording",
            Rejection::AlreadyPlaying => "already playing",
            Rejection::AlreadyPaused => "playback is already paused",
            Rejection::NotRecording => "not recording",
            Rejection::NotPlaying => "not playing",
            Rejection::NotPaused => "playback is not paused",
        };
        f.write_str(message)
    }
}

/// Result of a state transition request.
///
/// Invalid transitions are no-ops, reported as `Rejected` rather than errors.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Rejected(Rejection),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}
