use crate::api::types::{LevelId, TokenId};
use crate::core::profile::Avatar;

/// Player intents the presentation layer can send.
/// The UI enqueues them; the game applies them in order on the next tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login { name: String, avatar: Avatar },
    Logout,
    StartLevel(LevelId),
    /// Continue the saved attempt at this level, or start it fresh.
    ResumeLevel(LevelId),
    SelectLetter(TokenId),
    DeselectLetter(TokenId),
    Submit,
    /// Dismiss a wrong result and try the same word again.
    Retry,
    Advance,
    /// Read text aloud (e.g. the "hear the word" button).
    Speak(String),
    /// Wipe the active player's progress.
    Reset,
}

/// A queue of commands.
/// JS writes commands into the queue; Rust drains them each tick.
pub struct CommandQueue {
    commands: Vec<Command>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self {
            commands: Vec::with_capacity(16),
        }
    }

    /// Push a new command (called from JS via wasm-bindgen).
    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Drain all pending commands, oldest first.
    pub fn drain(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain_in_order() {
        let mut q = CommandQueue::new();
        q.push(Command::StartLevel(LevelId(1)));
        q.push(Command::SelectLetter(TokenId(2)));
        q.push(Command::Submit);
        assert!(!q.is_empty());
        let commands = q.drain();
        assert_eq!(
            commands,
            vec![
                Command::StartLevel(LevelId(1)),
                Command::SelectLetter(TokenId(2)),
                Command::Submit,
            ]
        );
        assert!(q.is_empty());
    }

    #[test]
    fn drain_on_empty_queue() {
        let mut q = CommandQueue::default();
        assert!(q.drain().is_empty());
        q.push(Command::Speak("cat".to_string()));
        assert_eq!(q.drain(), vec![Command::Speak("cat".to_string())]);
        assert!(q.drain().is_empty());
    }
}
