//! Menu navigation
//!
//! Pure selection state for the main and pause menus. Key presses go in,
//! actions for the session driver come out. Drawing is up to the front end.

/// Navigation keys the menus understand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuKey {
    Up,
    Down,
    Left,
    Right,
    Confirm,
    Back,
}

/// What the driver should do after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    None,
    StartGame,
    /// Volume one notch up (`true`) or down
    AdjustVolume(bool),
    Quit,
    Resume,
    MainMenu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainOption {
    PlayGame,
    Controls,
    MusicVolume,
    Credits,
    Exit,
}

impl MainOption {
    pub const ALL: [MainOption; 5] = [
        MainOption::PlayGame,
        MainOption::Controls,
        MainOption::MusicVolume,
        MainOption::Credits,
        MainOption::Exit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MainOption::PlayGame => "PLAY GAME",
            MainOption::Controls => "CONTROLS",
            MainOption::MusicVolume => "MUSIC VOLUME",
            MainOption::Credits => "CREDITS",
            MainOption::Exit => "EXIT",
        }
    }
}

/// Which page of the main menu is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuScreen {
    Main,
    Controls,
    Credits,
    /// "Are you sure?" with NO preselected
    ExitConfirm { yes: bool },
}

#[derive(Debug, Clone)]
pub struct MainMenu {
    pub screen: MenuScreen,
    selected: usize,
}

impl Default for MainMenu {
    fn default() -> Self {
        Self {
            screen: MenuScreen::Main,
            selected: 0,
        }
    }
}

impl MainMenu {
    pub fn selected(&self) -> MainOption {
        MainOption::ALL[self.selected]
    }

    pub fn handle(&mut self, key: MenuKey) -> MenuAction {
        match self.screen {
            MenuScreen::Main => self.handle_main(key),
            MenuScreen::Controls | MenuScreen::Credits => {
                if matches!(key, MenuKey::Back | MenuKey::Confirm) {
                    self.screen = MenuScreen::Main;
                }
                MenuAction::None
            }
            MenuScreen::ExitConfirm { yes } => match key {
                MenuKey::Left => {
                    self.screen = MenuScreen::ExitConfirm { yes: false };
                    MenuAction::None
                }
                MenuKey::Right => {
                    self.screen = MenuScreen::ExitConfirm { yes: true };
                    MenuAction::None
                }
                MenuKey::Confirm if yes => MenuAction::Quit,
                MenuKey::Confirm | MenuKey::Back => {
                    self.screen = MenuScreen::Main;
                    MenuAction::None
                }
                MenuKey::Up | MenuKey::Down => MenuAction::None,
            },
        }
    }

    fn handle_main(&mut self, key: MenuKey) -> MenuAction {
        let count = MainOption::ALL.len();
        match key {
            MenuKey::Up => self.selected = (self.selected + count - 1) % count,
            MenuKey::Down => self.selected = (self.selected + 1) % count,
            MenuKey::Left | MenuKey::Right if self.selected() == MainOption::MusicVolume => {
                return MenuAction::AdjustVolume(key == MenuKey::Right);
            }
            MenuKey::Confirm => match self.selected() {
                MainOption::PlayGame => return MenuAction::StartGame,
                MainOption::Controls => self.screen = MenuScreen::Controls,
                MainOption::Credits => self.screen = MenuScreen::Credits,
                MainOption::Exit => self.screen = MenuScreen::ExitConfirm { yes: false },
                MainOption::MusicVolume => {}
            },
            MenuKey::Left | MenuKey::Right | MenuKey::Back => {}
        }
        MenuAction::None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseOption {
    Resume,
    MainMenu,
}

impl PauseOption {
    pub fn label(self) -> &'static str {
        match self {
            PauseOption::Resume => "RESUME",
            PauseOption::MainMenu => "MAIN MENU",
        }
    }
}

#[derive(Debug, Clone)]
pub struct PauseMenu {
    pub selected: PauseOption,
}

impl Default for PauseMenu {
    fn default() -> Self {
        Self {
            selected: PauseOption::Resume,
        }
    }
}

impl PauseMenu {
    pub fn handle(&mut self, key: MenuKey) -> MenuAction {
        match key {
            // Two entries, so either direction just flips
            MenuKey::Up | MenuKey::Down => {
                self.selected = match self.selected {
                    PauseOption::Resume => PauseOption::MainMenu,
                    PauseOption::MainMenu => PauseOption::Resume,
                };
                MenuAction::None
            }
            MenuKey::Confirm => match self.selected {
                PauseOption::Resume => MenuAction::Resume,
                PauseOption::MainMenu => MenuAction::MainMenu,
            },
            MenuKey::Back => MenuAction::Resume,
            MenuKey::Left | MenuKey::Right => MenuAction::None,
        }
    }
}
