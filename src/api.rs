use std::sync::{Mutex, MutexGuard};

use once_cell::sync::Lazy;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::game::GameInstance;

/// The single running match. The UI drives one game at a time, so the
/// exports operate on a process-global slot.
static GAME: Lazy<Mutex<Option<GameInstance>>> = Lazy::new(|| Mutex::new(None));

fn lock_game() -> Result<MutexGuard<'static, Option<GameInstance>>, JsValue> {
    GAME.lock()
        .map_err(|_| JsValue::from_str("game state lock poisoned"))
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|err| JsValue::from_str(&err.to_string()))
}

fn err_js(message: impl AsRef<str>) -> JsValue {
    JsValue::from_str(message.as_ref())
}

/// Starts a fresh match against the minimax AI and returns the initial
/// state. `level` is the search depth.
#[wasm_bindgen]
pub fn new_game(level: u8) -> Result<JsValue, JsValue> {
    let mut slot = lock_game()?;
    let game = GameInstance::with_minimax(level);
    let state = game.to_game_state();
    *slot = Some(game);
    to_js(&state)
}

/// Plays the human (black) move and returns the updated state.
#[wasm_bindgen]
pub fn player_move(row: u8, col: u8) -> Result<JsValue, JsValue> {
    let mut slot = lock_game()?;
    let game = slot.as_mut().ok_or_else(|| err_js("no game in progress"))?;

    game.place(row, col).map_err(err_js)?;
    to_js(&game.to_game_state())
}

/// Plays the AI (white) turn and returns the updated state.
#[wasm_bindgen]
pub fn ai_move() -> Result<JsValue, JsValue> {
    let mut slot = lock_game()?;
    let game = slot.as_mut().ok_or_else(|| err_js("no game in progress"))?;

    game.do_ai_move().map_err(err_js)?;
    to_js(&game.to_game_state())
}

/// Passes the turn for the current player. The UI calls this when the
/// current side has no legal move.
#[wasm_bindgen]
pub fn pass_turn() -> Result<JsValue, JsValue> {
    let mut slot = lock_game()?;
    let game = slot.as_mut().ok_or_else(|| err_js("no game in progress"))?;

    if game.has_legal_moves_for_current() {
        return Err(err_js("current player has legal moves"));
    }
    game.pass();
    to_js(&game.to_game_state())
}

/// Legal destinations for the current player.
#[wasm_bindgen]
pub fn legal_moves() -> Result<JsValue, JsValue> {
    let slot = lock_game()?;
    let game = slot.as_ref().ok_or_else(|| err_js("no game in progress"))?;

    to_js(&game.get_legal_moves())
}

/// Current state snapshot without acting.
#[wasm_bindgen]
pub fn game_state() -> Result<JsValue, JsValue> {
    let slot = lock_game()?;
    let game = slot.as_ref().ok_or_else(|| err_js("no game in progress"))?;

    to_js(&game.to_game_state())
}

/// Marks the match finished and returns the final tally.
#[wasm_bindgen]
pub fn end_game() -> Result<JsValue, JsValue> {
    let mut slot = lock_game()?;
    let game = slot.as_mut().ok_or_else(|| err_js("no game in progress"))?;

    game.end_game();
    to_js(&game.to_game_result())
}
