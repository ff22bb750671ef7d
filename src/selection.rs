//! Pointer and key driven selection state machine.
//!
//! The machine knows nothing about windows or rendering. Hosts translate their
//! raw input into [`SelectionEvent`]s and draw whatever [`SelectionMachine::rect`]
//! reports.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, SelectionRect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
    };
}

/// Modifier that turns a press inside the selection into a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveModifier {
    #[default]
    Shift,
    Ctrl,
    Alt,
}

impl MoveModifier {
    pub fn is_held(self, modifiers: Modifiers) -> bool {
        match self {
            MoveModifier::Shift => modifiers.shift,
            MoveModifier::Ctrl => modifiers.ctrl,
            MoveModifier::Alt => modifiers.alt,
        }
    }
}

/// Keys the selection reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Space,
    Escape,
    Other,
}

/// Normalized input consumed by the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEvent {
    PointerDown {
        pos: Point,
        button: PointerButton,
        modifiers: Modifiers,
    },
    PointerMove {
        pos: Point,
    },
    PointerUp {
        pos: Point,
        button: PointerButton,
    },
    /// Enter, Space or double-click.
    Confirm,
    /// Escape or secondary click.
    Cancel,
}

impl SelectionEvent {
    pub fn from_key(key: Key) -> Option<Self> {
        match key {
            Key::Enter | Key::Space => Some(SelectionEvent::Confirm),
            Key::Escape => Some(SelectionEvent::Cancel),
            Key::Other => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionState {
    Idle,
    Drawing,
    Selected,
    Moving,
}

/// What the machine wants the session to do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Nothing visible changed.
    Ignored,
    /// The rectangle was created, resized or moved.
    RectChanged(SelectionRect),
    /// A confirm arrived with a usable rectangle; resolve it.
    Confirm(SelectionRect),
    /// The session must end without a crop.
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Drag {
    None,
    Draw {
        anchor: Point,
    },
    Move {
        start_cursor: Point,
        start_origin: Point,
    },
}

#[derive(Debug, Clone)]
pub struct SelectionMachine {
    display_width: u32,
    display_height: u32,
    move_modifier: MoveModifier,
    state: InteractionState,
    rect: Option<SelectionRect>,
    drag: Drag,
}

impl SelectionMachine {
    pub fn new(display_width: u32, display_height: u32, move_modifier: MoveModifier) -> Self {
        Self {
            display_width,
            display_height,
            move_modifier,
            state: InteractionState::Idle,
            rect: None,
            drag: Drag::None,
        }
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn rect(&self) -> Option<SelectionRect> {
        self.rect
    }

    pub fn handle(&mut self, event: SelectionEvent) -> Step {
        match event {
            SelectionEvent::PointerDown {
                pos,
                button: PointerButton::Primary,
                modifiers,
            } => self.press(pos, modifiers),
            SelectionEvent::PointerDown {
                button: PointerButton::Secondary,
                ..
            } => Step::Cancel,
            SelectionEvent::PointerDown { .. } => Step::Ignored,
            SelectionEvent::PointerMove { pos } => self.drag_to(pos),
            SelectionEvent::PointerUp {
                button: PointerButton::Primary,
                ..
            } => self.release(),
            SelectionEvent::PointerUp { .. } => Step::Ignored,
            SelectionEvent::Confirm => match self.rect {
                Some(rect) if !rect.is_degenerate() => Step::Confirm(rect),
                _ => Step::Cancel,
            },
            SelectionEvent::Cancel => Step::Cancel,
        }
    }

    fn press(&mut self, pos: Point, modifiers: Modifiers) -> Step {
        let grab = self
            .rect
            .filter(|rect| rect.contains(pos) && self.move_modifier.is_held(modifiers));

        if let Some(rect) = grab {
            self.state = InteractionState::Moving;
            self.drag = Drag::Move {
                start_cursor: pos,
                start_origin: rect.origin(),
            };
            return Step::Ignored;
        }

        let rect = SelectionRect::from_corners(pos, pos, self.display_width, self.display_height);
        self.state = InteractionState::Drawing;
        self.drag = Drag::Draw { anchor: pos };
        self.rect = Some(rect);
        Step::RectChanged(rect)
    }

    fn drag_to(&mut self, pos: Point) -> Step {
        let next = match (self.drag, self.rect) {
            (Drag::Draw { anchor }, _) => {
                SelectionRect::from_corners(anchor, pos, self.display_width, self.display_height)
            }
            (
                Drag::Move {
                    start_cursor,
                    start_origin,
                },
                Some(rect),
            ) => {
                let origin = Point::new(
                    start_origin.x.saturating_add(pos.x.saturating_sub(start_cursor.x)),
                    start_origin.y.saturating_add(pos.y.saturating_sub(start_cursor.y)),
                );
                rect.moved_to(origin, self.display_width, self.display_height)
            }
            _ => return Step::Ignored,
        };

        if self.rect == Some(next) {
            return Step::Ignored;
        }
        self.rect = Some(next);
        Step::RectChanged(next)
    }

    fn release(&mut self) -> Step {
        if matches!(self.drag, Drag::None) {
            return Step::Ignored;
        }
        self.drag = Drag::None;
        self.state = InteractionState::Selected;
        Step::Ignored
    }
}
