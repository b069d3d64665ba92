#![forbid(unsafe_code)]

//! Keyboard navigation to command mapping.
//!
//! Hosts translate their own key events into [`NavigationKey`] and call
//! [`NavigationKey::command`] to get the command for a stack.
//!
//! | Key                     | Command          |
//! |-------------------------|------------------|
//! | `Cancel`, `MoveLeft`    | `Back`           |
//! | `Submit`, `MoveRight`   | `Submit`         |
//! | `Previous` / `Next`     | `Up` / `Down`    |
//! | `PageUp` / `PageDown`   | `PageUp` / `PageDown` |
//! | `Begin` / `End`         | `Top` / `Bottom` |
//! | printable `Char(c)`     | `Search(c)`      |
//! | `SelectAll`, `None`, control chars | nothing |

use stackmenu_core::command::{Command, CommandKind, StackId};

/// Host-neutral navigation key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationKey {
    None,
    Cancel,
    Submit,
    MoveLeft,
    MoveRight,
    Previous,
    Next,
    PageUp,
    PageDown,
    Begin,
    End,
    SelectAll,
    /// A typed character.
    Char(char),
}

impl NavigationKey {
    /// Command kind for this key, if it maps to one.
    #[must_use]
    pub fn command_kind(self) -> Option<CommandKind> {
        let kind = match self {
            Self::None | Self::SelectAll => return None,
            Self::Cancel | Self::MoveLeft => CommandKind::Back,
            Self::Submit | Self::MoveRight => CommandKind::Submit,
            Self::Previous => CommandKind::Up,
            Self::Next => CommandKind::Down,
            Self::PageUp => CommandKind::PageUp,
            Self::PageDown => CommandKind::PageDown,
            Self::Begin => CommandKind::Top,
            Self::End => CommandKind::Bottom,
            Self::Char(c) if c.is_control() => return None,
            Self::Char(c) => CommandKind::Search(c),
        };
        Some(kind)
    }

    /// Command targeting `stack_id`, if this key maps to one.
    #[must_use]
    pub fn command<P>(self, stack_id: &StackId) -> Option<Command<P>> {
        self.command_kind()
            .map(|kind| Command::new(kind, stack_id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directional_keys() {
        assert_eq!(NavigationKey::Previous.command_kind(), Some(CommandKind::Up));
        assert_eq!(NavigationKey::Next.command_kind(), Some(CommandKind::Down));
        assert_eq!(NavigationKey::Begin.command_kind(), Some(CommandKind::Top));
        assert_eq!(NavigationKey::End.command_kind(), Some(CommandKind::Bottom));
    }

    #[test]
    fn back_and_submit_aliases() {
        for key in [NavigationKey::Cancel, NavigationKey::MoveLeft] {
            assert_eq!(key.command_kind(), Some(CommandKind::Back));
        }
        for key in [NavigationKey::Submit, NavigationKey::MoveRight] {
            assert_eq!(key.command_kind(), Some(CommandKind::Submit));
        }
    }

    #[test]
    fn characters_become_search() {
        assert_eq!(
            NavigationKey::Char('b').command_kind(),
            Some(CommandKind::Search('b'))
        );
        assert_eq!(NavigationKey::Char('\0').command_kind(), None);
        assert_eq!(NavigationKey::Char('\u{1b}').command_kind(), None);
    }

    #[test]
    fn ignored_keys() {
        assert!(NavigationKey::None.command_kind().is_none());
        assert!(NavigationKey::SelectAll.command_kind().is_none());
    }

    #[test]
    fn command_targets_stack() {
        let stack: StackId = "menu".into();
        let cmd: Command = NavigationKey::PageDown.command(&stack).unwrap();
        assert_eq!(cmd.kind(), CommandKind::PageDown);
        assert!(cmd.targets(&stack));
    }
}
