//! Keyboard bindings and their effect on the player controller.

use std::collections::HashMap;

use bevy::prelude::*;

use super::components::{Heading, Player, PlayerController};
use crate::core::EntityState;

/// Something the player can do from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveLeft,
    MoveRight,
    Jump,
    Crouch,
    Run,
    Shoot,
}

/// Key to action mapping.
#[derive(Resource, Debug, Clone)]
pub struct KeyBindings {
    pub bindings: HashMap<KeyCode, InputAction>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let bindings = HashMap::from([
            (KeyCode::ArrowLeft, InputAction::MoveLeft),
            (KeyCode::ArrowRight, InputAction::MoveRight),
            (KeyCode::Space, InputAction::Jump),
            (KeyCode::ArrowDown, InputAction::Crouch),
            (KeyCode::ShiftLeft, InputAction::Run),
            (KeyCode::ShiftRight, InputAction::Run),
            (KeyCode::KeyZ, InputAction::Shoot),
        ]);
        Self { bindings }
    }
}

impl KeyBindings {
    pub fn action(&self, key: KeyCode) -> Option<InputAction> {
        self.bindings.get(&key).copied()
    }
}

/// Apply a key-down of `action`.
pub fn press(controller: &mut PlayerController, action: InputAction) {
    match action {
        InputAction::MoveLeft => controller.start_moving_left(),
        InputAction::MoveRight => controller.start_moving_right(),
        InputAction::Jump => {
            controller.jump();
        }
        InputAction::Crouch => controller.start_crouching(),
        InputAction::Run => controller.start_running(),
        InputAction::Shoot => controller.request_shot(),
    }
}

/// Apply a key-up of `action`.
pub fn release(controller: &mut PlayerController, action: InputAction) {
    match action {
        InputAction::MoveLeft => controller.stop_moving_left(),
        InputAction::MoveRight => controller.stop_moving_right(),
        InputAction::Crouch => controller.stop_crouching(),
        InputAction::Run => controller.stop_running(),
        InputAction::Jump | InputAction::Shoot => {}
    }
}

/// Translate this frame's key presses into controller intents and queued shots.
pub fn handle_keyboard(
    keyboard: Res<ButtonInput<KeyCode>>,
    bindings: Res<KeyBindings>,
    mut player_query: Query<(&mut PlayerController, &EntityState), With<Player>>,
) {
    let Ok((mut controller, body)) = player_query.get_single_mut() else {
        return;
    };
    if !body.active {
        return;
    }

    for key in keyboard.get_just_pressed() {
        if let Some(action) = bindings.action(*key) {
            press(&mut controller, action);
        }
    }

    for key in keyboard.get_just_released() {
        if let Some(action) = bindings.action(*key) {
            release(&mut controller, action);
        }
    }
}

/// Intents implied by the keys held right now.
pub fn held_intent(
    keyboard: &ButtonInput<KeyCode>,
    bindings: &KeyBindings,
) -> (Option<Heading>, bool, bool) {
    let held = |wanted: InputAction| {
        keyboard
            .get_pressed()
            .any(|key| bindings.action(*key) == Some(wanted))
    };

    let heading = if held(InputAction::MoveRight) {
        Some(Heading::Right)
    } else if held(InputAction::MoveLeft) {
        Some(Heading::Left)
    } else {
        None
    };
    (heading, held(InputAction::Run), held(InputAction::Crouch))
}

/// Re-read held keys after a pause. Key-ups that happened while paused were
/// never seen by [`handle_keyboard`].
pub fn sync_held_keys(
    keyboard: Res<ButtonInput<KeyCode>>,
    bindings: Res<KeyBindings>,
    mut player_query: Query<&mut PlayerController, With<Player>>,
) {
    let Ok(mut controller) = player_query.get_single_mut() else {
        return;
    };
    let (heading, running, crouching) = held_intent(&keyboard, &bindings);
    controller.set_intent(heading, running, crouching);
}
