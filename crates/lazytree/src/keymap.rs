use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::input::KeyModifiers;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeCommand {
    Up,
    Down,
    PageUp,
    PageDown,
    Top,
    Bottom,
    Collapse,
    Expand,
    Toggle,
}

/// Rebindable keys for tree navigation. Matching is first-command-wins in
/// declaration order.
#[derive(Clone, Debug)]
pub struct TreeBindings {
    pub up: Vec<KeyEvent>,
    pub down: Vec<KeyEvent>,
    pub page_up: Vec<KeyEvent>,
    pub page_down: Vec<KeyEvent>,
    pub top: Vec<KeyEvent>,
    pub bottom: Vec<KeyEvent>,
    pub collapse: Vec<KeyEvent>,
    pub expand: Vec<KeyEvent>,
    pub toggle: Vec<KeyEvent>,
}

impl Default for TreeBindings {
    fn default() -> Self {
        Self {
            up: vec![KeyEvent::new(KeyCode::Up), key_char('k')],
            down: vec![KeyEvent::new(KeyCode::Down), key_char('j')],
            page_up: vec![KeyEvent::new(KeyCode::PageUp), key_ctrl('u')],
            page_down: vec![KeyEvent::new(KeyCode::PageDown), key_ctrl('d')],
            top: vec![KeyEvent::new(KeyCode::Home), key_char('g')],
            bottom: vec![KeyEvent::new(KeyCode::End), key_char('G')],
            collapse: vec![KeyEvent::new(KeyCode::Left), key_char('h')],
            expand: vec![KeyEvent::new(KeyCode::Right), key_char('l')],
            toggle: vec![KeyEvent::new(KeyCode::Enter), key_char(' ')],
        }
    }
}

impl TreeBindings {
    pub fn command_for(&self, key: &KeyEvent) -> Option<TreeCommand> {
        let table = [
            (&self.up, TreeCommand::Up),
            (&self.down, TreeCommand::Down),
            (&self.page_up, TreeCommand::PageUp),
            (&self.page_down, TreeCommand::PageDown),
            (&self.top, TreeCommand::Top),
            (&self.bottom, TreeCommand::Bottom),
            (&self.collapse, TreeCommand::Collapse),
            (&self.expand, TreeCommand::Expand),
            (&self.toggle, TreeCommand::Toggle),
        ];
        for (patterns, command) in table {
            if patterns.iter().any(|p| key_event_matches(p, key)) {
                return Some(command);
            }
        }
        None
    }
}

pub fn key_event_matches(pattern: &KeyEvent, event: &KeyEvent) -> bool {
    pattern.code == event.code && pattern.modifiers == event.modifiers
}

pub fn key_char(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c))
}

pub fn key_ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c)).with_modifiers(KeyModifiers {
        shift: false,
        ctrl: true,
        alt: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bindings_resolve() {
        let bindings = TreeBindings::default();
        assert_eq!(
            bindings.command_for(&key_char('j')),
            Some(TreeCommand::Down)
        );
        assert_eq!(
            bindings.command_for(&KeyEvent::new(KeyCode::Enter)),
            Some(TreeCommand::Toggle)
        );
        assert_eq!(bindings.command_for(&key_char('x')), None);
    }

    #[test]
    fn modifiers_are_matched_exactly() {
        let bindings = TreeBindings::default();
        assert_eq!(
            bindings.command_for(&key_ctrl('d')),
            Some(TreeCommand::PageDown)
        );
        assert_eq!(bindings.command_for(&key_char('d')), None);
        assert_eq!(bindings.command_for(&key_ctrl('k')), None);
    }
}
