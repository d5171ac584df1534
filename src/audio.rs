//! Music control
//!
//! Playback itself happens outside the crate. The mixer owns volume and mute
//! and follows game events to decide which track should be playing; it only
//! talks to the sink when something actually changes.

use crate::settings::VOLUME_STEP;
use crate::sim::GameEvent;

/// Background music tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicTrack {
    /// Menu and regular play
    Theme,
    /// Boss fight
    Boss,
}

/// Whatever actually plays audio
pub trait AudioSink {
    /// Stop the current track and loop `track`
    fn play_track(&mut self, track: MusicTrack);
    /// Apply a gain in decibels
    fn set_gain(&mut self, db: f32);
}

impl<S: AudioSink + ?Sized> AudioSink for Box<S> {
    fn play_track(&mut self, track: MusicTrack) {
        (**self).play_track(track);
    }

    fn set_gain(&mut self, db: f32) {
        (**self).set_gain(db);
    }
}

/// Sink that only logs, for headless runs
#[derive(Debug, Default)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn play_track(&mut self, track: MusicTrack) {
        log::info!("Music: {track:?}");
    }

    fn set_gain(&mut self, db: f32) {
        log::debug!("Music gain {db:.1} dB");
    }
}

/// Quietest gain the volume scale maps to
const MIN_LINEAR: f32 = 0.01;

/// Linear volume to decibels, floored at -40 dB
pub fn volume_to_db(volume: f32) -> f32 {
    20.0 * volume.max(MIN_LINEAR).log10()
}

/// Music state for the session
pub struct Mixer<S: AudioSink> {
    sink: S,
    volume: f32,
    muted: bool,
    current: Option<MusicTrack>,
}

impl<S: AudioSink> Mixer<S> {
    pub fn new(sink: S, volume: f32, muted: bool) -> Self {
        let mut mixer = Self {
            sink,
            volume: volume.clamp(0.0, 1.0),
            muted,
            current: None,
        };
        mixer.apply_gain();
        mixer
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn muted(&self) -> bool {
        self.muted
    }

    pub fn current_track(&self) -> Option<MusicTrack> {
        self.current
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Set volume (0.0 - 1.0)
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        self.apply_gain();
    }

    /// Step volume up or down by one notch
    pub fn adjust(&mut self, up: bool) {
        let delta = if up { VOLUME_STEP } else { -VOLUME_STEP };
        // Snap to the notch grid
        let stepped = ((self.volume + delta) * 10.0).round() / 10.0;
        self.set_volume(stepped);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.apply_gain();
    }

    /// Effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }

    /// Current gain in decibels
    pub fn gain_db(&self) -> f32 {
        volume_to_db(self.effective_volume())
    }

    fn apply_gain(&mut self) {
        let db = self.gain_db();
        self.sink.set_gain(db);
    }

    /// Switch tracks if needed; repeated requests for the playing track are ignored
    pub fn play(&mut self, track: MusicTrack) {
        if self.current == Some(track) {
            return;
        }
        self.current = Some(track);
        self.sink.play_track(track);
    }

    /// React to one simulation event
    pub fn handle(&mut self, event: &GameEvent) {
        match event {
            GameEvent::BossArrived => self.play(MusicTrack::Boss),
            GameEvent::BossDefeated
            | GameEvent::GameOver
            | GameEvent::Restarted
            | GameEvent::Started
            | GameEvent::ReturnedToMenu => self.play(MusicTrack::Theme),
            _ => {}
        }
    }
}
