use crate::ai::search::Searcher;
use crate::board::Board;
use crate::types::{Color, GameResult, GameState, Position};

pub const PLAYER_BLACK: u8 = 1;
pub const PLAYER_WHITE: u8 = 2;

/// Picks a move for the side to act, or `None` when that side must pass.
///
/// `Send + Sync` because selectors live inside the process-global game
/// slot shared with the WASM layer.
pub trait MoveSelector: Send + Sync {
    fn select_move(&self, board: &Board, color: Color, level: u8) -> Option<Position>;
}

/// Default selector: fixed-depth minimax for whichever side is to act.
#[derive(Debug, Default, Clone, Copy)]
pub struct MinimaxSelector;

impl MoveSelector for MinimaxSelector {
    fn select_move(&self, board: &Board, color: Color, level: u8) -> Option<Position> {
        Searcher::new(color, level).search(board).position
    }
}

/// One match between the human (black) and the AI (white).
pub struct GameInstance {
    board: Board,
    current: Color,
    pub level: u8,
    pub is_game_over: bool,
    pub is_pass: bool,
    pub flipped: Vec<u8>,
    selector: Box<dyn MoveSelector>,
}

impl GameInstance {
    pub fn new(level: u8, selector: Box<dyn MoveSelector>) -> Self {
        Self {
            board: Board::new(),
            current: Color::Black,
            level,
            is_game_over: false,
            is_pass: false,
            flipped: Vec::new(),
            selector,
        }
    }

    pub fn with_minimax(level: u8) -> Self {
        Self::new(level, Box::new(MinimaxSelector))
    }

    pub fn current_player(&self) -> Color {
        self.current
    }

    /// Plays the human move.
    pub fn place(&mut self, row: u8, col: u8) -> Result<(), String> {
        if self.is_game_over {
            return Err("game is already over".to_string());
        }
        if self.current != Color::Black {
            return Err("it is not the player's turn".to_string());
        }

        let pos = position_from(row, col)?;
        self.apply_move(Color::Black, pos)
    }

    pub fn has_legal_moves_for_current(&self) -> bool {
        !self.board.no_moves_available(self.current)
    }

    pub fn pass(&mut self) {
        self.is_pass = true;
        self.flipped.clear();
        self.current = self.current.opponent();
    }

    pub fn end_game(&mut self) {
        self.is_game_over = true;
    }

    /// Lets the selector play the AI turn. The chosen move is re-validated
    /// against the legal mask before it touches the board.
    pub fn do_ai_move(&mut self) -> Result<(), String> {
        if self.is_game_over {
            return Err("game is already over".to_string());
        }
        if self.current != Color::White {
            return Err("it is not AI's turn".to_string());
        }
        if self.board.no_moves_available(Color::White) {
            return Err("AI has no legal moves".to_string());
        }

        let selected = self
            .selector
            .select_move(&self.board, Color::White, self.level)
            .ok_or_else(|| "AI could not select a move".to_string())?;

        if !self.board.is_legal_move(Color::White, selected) {
            return Err("AI selected an illegal move".to_string());
        }

        self.apply_move(Color::White, selected)
    }

    pub fn get_legal_moves(&self) -> Vec<Position> {
        mask_to_indices(self.board.legal_moves(self.current))
            .into_iter()
            .map(Position::from_index)
            .collect()
    }

    pub fn to_game_state(&self) -> GameState {
        let (black_count, white_count) = self.board.count();
        GameState {
            board: self.board.to_array().to_vec(),
            current_player: player_code(self.current),
            black_count,
            white_count,
            is_game_over: self.is_game_over,
            is_pass: self.is_pass,
            flipped: self.flipped.clone(),
        }
    }

    pub fn to_game_result(&self) -> GameResult {
        let (black_count, white_count) = self.board.count();
        GameResult {
            winner: if black_count > white_count {
                PLAYER_BLACK
            } else if white_count > black_count {
                PLAYER_WHITE
            } else {
                0
            },
            black_count,
            white_count,
        }
    }

    fn apply_move(&mut self, color: Color, pos: Position) -> Result<(), String> {
        if !self.board.is_legal_move(color, pos) {
            return Err("illegal move".to_string());
        }

        let flips = self.board.place(color, pos);
        if flips == 0 {
            return Err("illegal move".to_string());
        }

        self.is_pass = false;
        self.flipped = mask_to_indices(flips);
        self.current = color.opponent();

        if self.board.empty_count() == 0 {
            self.end_game();
        }

        Ok(())
    }

    #[cfg(test)]
    fn set_board_for_test(&mut self, board: Board, current: Color) {
        self.board = board;
        self.current = current;
        self.is_game_over = false;
        self.is_pass = false;
        self.flipped.clear();
    }
}

fn player_code(color: Color) -> u8 {
    match color {
        Color::Black => PLAYER_BLACK,
        Color::White => PLAYER_WHITE,
    }
}

fn position_from(row: u8, col: u8) -> Result<Position, String> {
    if row >= 8 || col >= 8 {
        return Err("row/col out of range".to_string());
    }
    Ok(Position { row, col })
}

fn mask_to_indices(mask: u64) -> Vec<u8> {
    let mut bits = mask;
    let mut out = Vec::new();

    while bits != 0 {
        let idx = bits.trailing_zeros() as u8;
        out.push(idx);
        bits &= bits - 1;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_BOARD: u64 = u64::MAX;

    struct FixedMoveSelector {
        pos: Position,
    }

    impl MoveSelector for FixedMoveSelector {
        fn select_move(&self, _board: &Board, _color: Color, _level: u8) -> Option<Position> {
            Some(self.pos)
        }
    }

    fn bit(row: u8, col: u8) -> u64 {
        1u64 << Position { row, col }.index()
    }

    #[test]
    fn initial_state_is_correct() {
        let game = GameInstance::with_minimax(3);
        let state = game.to_game_state();

        assert_eq!(state.current_player, PLAYER_BLACK);
        assert_eq!(state.black_count, 2);
        assert_eq!(state.white_count, 2);
        assert!(!state.is_game_over);
        assert!(!state.is_pass);
        assert!(state.flipped.is_empty());
        assert_eq!(game.get_legal_moves().len(), 4);
    }

    #[test]
    fn t02_illegal_player_move_returns_error() {
        let mut game = GameInstance::with_minimax(1);
        let err = game.place(0, 0).unwrap_err();

        assert!(err.contains("illegal move"));
    }

    #[test]
    fn t03_pass_occurrence_switches_turn() {
        let mut game = GameInstance::with_minimax(1);
        let black = bit(0, 1);
        let white = FULL_BOARD ^ bit(0, 0) ^ black;
        game.set_board_for_test(Board::from_bitboards(black, white), Color::Black);

        assert!(!game.has_legal_moves_for_current());
        game.pass();

        assert_eq!(game.current_player(), Color::White);
        assert!(game.is_pass);
        assert!(game.flipped.is_empty());
        assert!(!game.is_game_over);
        assert!(game.has_legal_moves_for_current());
    }

    #[test]
    fn t04_both_passes_end_game() {
        let mut game = GameInstance::with_minimax(1);
        let black = FULL_BOARD ^ bit(0, 0);
        game.set_board_for_test(Board::from_bitboards(black, 0), Color::Black);

        assert!(!game.has_legal_moves_for_current());
        game.pass();
        assert_eq!(game.current_player(), Color::White);
        assert!(!game.has_legal_moves_for_current());

        game.end_game();
        assert!(game.is_game_over);
    }

    #[test]
    fn t05_full_board_after_move_sets_game_over() {
        let selector = FixedMoveSelector {
            pos: Position { row: 0, col: 0 },
        };
        let mut game = GameInstance::new(1, Box::new(selector));
        let black = bit(0, 1);
        let white = FULL_BOARD ^ bit(0, 0) ^ black;
        game.set_board_for_test(Board::from_bitboards(black, white), Color::White);

        game.do_ai_move().unwrap();
        let state = game.to_game_state();

        assert!(state.is_game_over);
        assert_eq!(state.current_player, PLAYER_BLACK);
        assert_eq!(state.black_count, 0);
        assert_eq!(state.white_count, 64);
        assert_eq!(state.flipped, vec![1]);
    }

    #[test]
    fn minimax_selector_plays_a_legal_ai_move() {
        let mut game = GameInstance::with_minimax(2);
        game.place(2, 3).unwrap();

        game.do_ai_move().unwrap();
        let state = game.to_game_state();

        assert_eq!(state.current_player, PLAYER_BLACK);
        assert_eq!(state.black_count + state.white_count, 6);
        assert!(!state.flipped.is_empty());
    }

    #[test]
    fn ai_refuses_to_move_when_it_must_pass() {
        let mut game = GameInstance::with_minimax(1);
        // White's lone disc is boxed in; the only empty cell captures
        // nothing for white.
        let white = bit(0, 1);
        let black = FULL_BOARD ^ bit(0, 0) ^ white;
        game.set_board_for_test(Board::from_bitboards(black, white), Color::White);

        let err = game.do_ai_move().unwrap_err();
        assert!(err.contains("no legal moves"));
    }

    #[test]
    fn to_game_result_reports_the_disc_majority() {
        let mut game = GameInstance::with_minimax(1);
        let black = bit(0, 0) | bit(0, 1) | bit(0, 2);
        let white = bit(7, 7);
        game.set_board_for_test(Board::from_bitboards(black, white), Color::Black);
        game.end_game();

        let result = game.to_game_result();

        assert_eq!(result.winner, PLAYER_BLACK);
        assert_eq!(result.black_count, 3);
        assert_eq!(result.white_count, 1);
    }
}
