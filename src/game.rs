//! Session driver
//!
//! Owns the simulation state, menus and music for one play session. Front ends
//! feed it held keys, menu key presses and wall-clock frame time; it runs
//! fixed-step ticks and hands back render frames.

use crate::audio::{AudioSink, Mixer, MusicTrack};
use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::menu::{MainMenu, MenuAction, MenuKey, PauseMenu};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, RenderFrame, TickInput, tick};

/// Longest frame the accumulator will absorb, in seconds
const MAX_FRAME_DT: f32 = 0.1;

pub struct Game {
    pub state: GameState,
    pub main_menu: MainMenu,
    pub pause_menu: PauseMenu,
    settings: Settings,
    mixer: Mixer<Box<dyn AudioSink>>,
    input: TickInput,
    accumulator: f32,
    quit_requested: bool,
}

impl Game {
    pub fn new(seed: u64, settings: Settings, sink: Box<dyn AudioSink>) -> Self {
        let mut mixer = Mixer::new(sink, settings.music_volume, settings.muted);
        mixer.play(MusicTrack::Theme);
        Self {
            state: GameState::new(seed, settings.tuning.clone()),
            main_menu: MainMenu::default(),
            pause_menu: PauseMenu::default(),
            settings,
            mixer,
            input: TickInput::default(),
            accumulator: 0.0,
            quit_requested: false,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn mixer(&self) -> &Mixer<Box<dyn AudioSink>> {
        &self.mixer
    }

    /// Held controls (directions, fire, idle mode); kept until changed
    pub fn input_mut(&mut self) -> &mut TickInput {
        &mut self.input
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Route a menu key to whichever screen currently has focus
    pub fn press(&mut self, key: MenuKey) {
        let action = match self.state.phase {
            GamePhase::Menu => self.main_menu.handle(key),
            GamePhase::Paused => self.pause_menu.handle(key),
            GamePhase::Playing => match key {
                MenuKey::Back => {
                    self.input.pause = true;
                    MenuAction::None
                }
                _ => MenuAction::None,
            },
            GamePhase::GameOver | GamePhase::Won => match key {
                MenuKey::Confirm => {
                    self.input.restart = true;
                    MenuAction::None
                }
                MenuKey::Back => MenuAction::MainMenu,
                _ => MenuAction::None,
            },
        };
        self.dispatch(action);
    }

    fn dispatch(&mut self, action: MenuAction) {
        match action {
            MenuAction::None => {}
            MenuAction::StartGame => self.input.start = true,
            MenuAction::AdjustVolume(up) => {
                self.mixer.adjust(up);
                self.settings.music_volume = self.mixer.volume();
                log::debug!("Music volume {:.1}", self.settings.music_volume);
            }
            MenuAction::Quit => {
                log::info!("Quit requested");
                self.quit_requested = true;
            }
            MenuAction::Resume => self.input.pause = true,
            MenuAction::MainMenu => self.input.to_menu = true,
        }
    }

    /// Set music volume (0.0 - 1.0) and remember it
    pub fn set_volume(&mut self, volume: f32) {
        self.mixer.set_volume(volume);
        self.settings.music_volume = self.mixer.volume();
    }

    /// Toggle mute and remember it
    pub fn toggle_mute(&mut self) {
        self.settings.muted = !self.settings.muted;
        self.mixer.set_muted(self.settings.muted);
    }

    /// Run as many fixed ticks as `dt` seconds of wall time allow
    ///
    /// Returns the number of ticks run.
    pub fn update(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.min(MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.step_once();
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }

    /// Run exactly one tick
    pub fn step_once(&mut self) {
        let input = self.input.clone();
        tick(&mut self.state, &input);

        // Clear one-shot inputs after processing
        self.input.start = false;
        self.input.pause = false;
        self.input.restart = false;
        self.input.to_menu = false;

        for event in self.state.drain_events() {
            self.on_event(&event);
        }
    }

    fn on_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Paused => self.pause_menu = PauseMenu::default(),
            GameEvent::ReturnedToMenu => self.main_menu = MainMenu::default(),
            _ => {}
        }
        self.mixer.handle(event);
    }

    pub fn frame(&self) -> RenderFrame {
        RenderFrame::build(&self.state)
    }
}
