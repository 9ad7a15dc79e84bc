#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure menu system that tracks focus per phase and turns player intents into commands.

use paper_snake_core::{Command, Difficulty, Event, GamePhase, Intent};

/// Payload dispatched when a menu item is confirmed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MenuAction {
    /// Starts a new game with the provided difficulty.
    Start(Difficulty),
    /// Resumes a paused game.
    Resume,
    /// Restarts after a game over.
    Restart,
    /// Returns to the title screen.
    QuitToTitle,
}

impl MenuAction {
    /// Command that carries out the action.
    #[must_use]
    pub const fn command(self) -> Command {
        match self {
            Self::Start(difficulty) => Command::StartGame { difficulty },
            Self::Resume => Command::Resume,
            Self::Restart => Command::Restart,
            Self::QuitToTitle => Command::QuitToTitle,
        }
    }
}

/// Labelled entry of a phase menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MenuItem {
    /// Text shown to the player.
    pub label: &'static str,
    /// Action dispatched on confirmation.
    pub action: MenuAction,
}

const TITLE_ITEMS: [MenuItem; 3] = [
    MenuItem {
        label: "Easy",
        action: MenuAction::Start(Difficulty::Easy),
    },
    MenuItem {
        label: "Medium",
        action: MenuAction::Start(Difficulty::Medium),
    },
    MenuItem {
        label: "Hard",
        action: MenuAction::Start(Difficulty::Hard),
    },
];

const PAUSED_ITEMS: [MenuItem; 2] = [
    MenuItem {
        label: "Resume",
        action: MenuAction::Resume,
    },
    MenuItem {
        label: "Quit to title",
        action: MenuAction::QuitToTitle,
    },
];

const GAME_OVER_ITEMS: [MenuItem; 2] = [
    MenuItem {
        label: "Restart",
        action: MenuAction::Restart,
    },
    MenuItem {
        label: "Quit to title",
        action: MenuAction::QuitToTitle,
    },
];

/// Static menu shown during the provided phase. Playing has no menu.
#[must_use]
pub fn items_for(phase: GamePhase) -> &'static [MenuItem] {
    match phase {
        GamePhase::Title => &TITLE_ITEMS,
        GamePhase::Playing => &[],
        GamePhase::Paused => &PAUSED_ITEMS,
        GamePhase::GameOver => &GAME_OVER_ITEMS,
    }
}

/// Menu state machine mirroring the world's phase.
#[derive(Debug, Default)]
pub struct Menu {
    phase: GamePhase,
    focus: usize,
}

impl Menu {
    /// Creates a menu focused on the first title item.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes world events and player intents, emitting the commands they imply.
    ///
    /// Events are processed first so that intents are interpreted against the
    /// most recent phase.
    pub fn handle(&mut self, events: &[Event], intents: &[Intent], out: &mut Vec<Command>) {
        for event in events {
            if let Event::PhaseChanged { phase } = event {
                self.phase = *phase;
                self.focus = 0;
            }
        }

        for intent in intents {
            self.interpret(*intent, out);
        }
    }

    fn interpret(&mut self, intent: Intent, out: &mut Vec<Command>) {
        match intent {
            Intent::Steer(direction) => out.push(Command::RequestDirection { direction }),
            Intent::PauseToggle => {
                if self.phase.is_running() {
                    out.push(Command::TogglePause);
                }
            }
            Intent::Navigate(offset) => self.navigate(offset),
            Intent::Confirm => {
                if let Some(item) = self.items().get(self.focus) {
                    out.push(item.action.command());
                }
            }
            Intent::SelectDifficulty(difficulty) => {
                if self.phase == GamePhase::Title {
                    out.push(Command::StartGame { difficulty });
                }
            }
            Intent::Restart => {
                if self.phase == GamePhase::GameOver {
                    out.push(Command::Restart);
                }
            }
            Intent::QuitToTitle => {
                if matches!(self.phase, GamePhase::Paused | GamePhase::GameOver) {
                    out.push(Command::QuitToTitle);
                }
            }
            Intent::MuteToggle => {}
        }
    }

    /// Moves the focus by `offset`, wrapping around the current item count.
    pub fn navigate(&mut self, offset: i32) {
        let count = self.items().len();
        if count == 0 {
            return;
        }
        let count = i64::try_from(count).unwrap_or(i64::MAX);
        let current = i64::try_from(self.focus).unwrap_or(0);
        let next = (current + i64::from(offset)).rem_euclid(count);
        self.focus = usize::try_from(next).unwrap_or(0);
    }

    /// Index of the focused item.
    #[must_use]
    pub fn focus(&self) -> usize {
        self.focus
    }

    /// Phase the menu currently mirrors.
    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Items of the current phase's menu.
    #[must_use]
    pub fn items(&self) -> &'static [MenuItem] {
        items_for(self.phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paper_snake_core::Direction;

    fn menu_in(phase: GamePhase) -> Menu {
        let mut menu = Menu::new();
        let mut commands = Vec::new();
        menu.handle(&[Event::PhaseChanged { phase }], &[], &mut commands);
        menu
    }

    fn commands_for(menu: &mut Menu, intents: &[Intent]) -> Vec<Command> {
        let mut commands = Vec::new();
        menu.handle(&[], intents, &mut commands);
        commands
    }

    #[test]
    fn navigation_wraps_on_title() {
        let mut menu = Menu::new();
        menu.navigate(1);
        menu.navigate(1);
        assert_eq!(menu.focus(), 2);
        menu.navigate(1);
        assert_eq!(menu.focus(), 0);
    }

    #[test]
    fn negative_navigation_wraps_backwards() {
        let mut menu = menu_in(GamePhase::Paused);
        menu.navigate(-1);
        assert_eq!(menu.focus(), 1);
        menu.navigate(-3);
        assert_eq!(menu.focus(), 0);
    }

    #[test]
    fn phase_change_resets_focus() {
        let mut menu = Menu::new();
        menu.navigate(2);
        let mut commands = Vec::new();
        menu.handle(
            &[Event::PhaseChanged {
                phase: GamePhase::GameOver,
            }],
            &[],
            &mut commands,
        );
        assert_eq!(menu.focus(), 0);
        assert_eq!(menu.items()[0].action, MenuAction::Restart);
    }

    #[test]
    fn confirm_dispatches_focused_item() {
        let mut menu = Menu::new();
        let commands = commands_for(&mut menu, &[Intent::Navigate(2), Intent::Confirm]);
        assert_eq!(
            commands,
            vec![Command::StartGame {
                difficulty: Difficulty::Hard
            }]
        );
    }

    #[test]
    fn playing_has_no_menu() {
        let mut menu = menu_in(GamePhase::Playing);
        assert!(menu.items().is_empty());
        assert!(commands_for(&mut menu, &[Intent::Navigate(1), Intent::Confirm]).is_empty());
        assert_eq!(menu.focus(), 0);
    }

    #[test]
    fn pause_toggle_only_while_running() {
        let mut title = Menu::new();
        assert!(commands_for(&mut title, &[Intent::PauseToggle]).is_empty());

        let mut playing = menu_in(GamePhase::Playing);
        assert_eq!(
            commands_for(&mut playing, &[Intent::PauseToggle]),
            vec![Command::TogglePause]
        );

        let mut paused = menu_in(GamePhase::Paused);
        assert_eq!(
            commands_for(&mut paused, &[Intent::PauseToggle]),
            vec![Command::TogglePause]
        );
    }

    #[test]
    fn direct_intents_respect_phase() {
        let mut playing = menu_in(GamePhase::Playing);
        assert!(commands_for(
            &mut playing,
            &[
                Intent::Restart,
                Intent::QuitToTitle,
                Intent::SelectDifficulty(Difficulty::Easy),
                Intent::MuteToggle,
            ]
        )
        .is_empty());

        let mut over = menu_in(GamePhase::GameOver);
        assert_eq!(
            commands_for(&mut over, &[Intent::Restart, Intent::QuitToTitle]),
            vec![Command::Restart, Command::QuitToTitle]
        );

        let mut title = Menu::new();
        assert_eq!(
            commands_for(&mut title, &[Intent::SelectDifficulty(Difficulty::Easy)]),
            vec![Command::StartGame {
                difficulty: Difficulty::Easy
            }]
        );
    }

    #[test]
    fn steering_is_forwarded() {
        let mut menu = menu_in(GamePhase::Playing);
        assert_eq!(
            commands_for(&mut menu, &[Intent::Steer(Direction::Up)]),
            vec![Command::RequestDirection {
                direction: Direction::Up
            }]
        );
    }
}
