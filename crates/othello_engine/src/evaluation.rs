use othello_core::{Board, Cell, Player, Position};

// Corners can never be flipped once taken, so they anchor the positional terms.
const CORNERS: [(u8, u8); 4] = [(0, 0), (0, 7), (7, 0), (7, 7)];

// Squares touching a corner, including the diagonal "X" square.
const NEAR_CORNER_OFFSETS: [(i8, i8); 8] = [
    (0, 1),
    (1, 0),
    (1, 1),
    (0, -1),
    (-1, 0),
    (-1, -1),
    (1, -1),
    (-1, 1),
];

// Fraction of the board filled at which each phase begins.
const MIDGAME_PHASE: f32 = 0.4;
const ENDGAME_PHASE: f32 = 0.8;

/// Coarse game progress, derived from how full the board is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamePhase {
    Opening,
    Midgame,
    Endgame,
}

impl GamePhase {
    pub fn of(board: &Board) -> Self {
        let filled = board.disc_count() as f32 / 64.0;
        if filled < MIDGAME_PHASE {
            GamePhase::Opening
        } else if filled < ENDGAME_PHASE {
            GamePhase::Midgame
        } else {
            GamePhase::Endgame
        }
    }
}

/// Multipliers for the five evaluation features of one phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureWeights {
    pub material: i32,
    pub mobility: i32,
    pub corners: i32,
    pub edges: i32,
    pub near_corner_penalty: i32,
}

/// One weight set per game phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalWeights {
    pub opening: FeatureWeights,
    pub midgame: FeatureWeights,
    pub endgame: FeatureWeights,
}

impl Default for EvalWeights {
    fn default() -> Self {
        Self {
            // Opening: mobility and corner potential over raw material
            opening: FeatureWeights {
                material: 5,
                mobility: 30,
                corners: 60,
                edges: 10,
                near_corner_penalty: 10,
            },
            midgame: FeatureWeights {
                material: 10,
                mobility: 15,
                corners: 80,
                edges: 20,
                near_corner_penalty: 5,
            },
            // Endgame: discs on the board are what the final count sees
            endgame: FeatureWeights {
                material: 40,
                mobility: 5,
                corners: 100,
                edges: 20,
                near_corner_penalty: 2,
            },
        }
    }
}

impl EvalWeights {
    /// The same weights regardless of phase.
    pub fn uniform(weights: FeatureWeights) -> Self {
        Self {
            opening: weights,
            midgame: weights,
            endgame: weights,
        }
    }

    pub fn for_phase(&self, phase: GamePhase) -> &FeatureWeights {
        match phase {
            GamePhase::Opening => &self.opening,
            GamePhase::Midgame => &self.midgame,
            GamePhase::Endgame => &self.endgame,
        }
    }
}

/// Raw feature differentials, each `side` minus its opponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Features {
    pub material: i32,
    pub mobility: i32,
    pub corners: i32,
    pub edges: i32,
    pub near_corners: i32,
}

impl Features {
    pub fn measure(board: &Board, side: Player) -> Self {
        let opponent = side.opponent();

        let material = board.count(side) as i32 - board.count(opponent) as i32;
        let mobility =
            board.legal_move_count(side) as i32 - board.legal_move_count(opponent) as i32;

        Self {
            material,
            mobility,
            corners: corner_control(board, side),
            edges: edge_control(board, side),
            near_corners: near_corner_exposure(board, side),
        }
    }

    pub fn weigh(&self, weights: &FeatureWeights) -> i32 {
        weights.material * self.material
            + weights.mobility * self.mobility
            + weights.corners * self.corners
            + weights.edges * self.edges
            - weights.near_corner_penalty * self.near_corners
    }
}

/// Scores `board` from `side`'s point of view; positive favours `side`.
pub fn evaluate_position(board: &Board, side: Player, weights: &EvalWeights) -> i32 {
    let phase = GamePhase::of(board);
    Features::measure(board, side).weigh(weights.for_phase(phase))
}

/// +1 for the side's disc, -1 for the opponent's, 0 for empty.
fn ownership(cell: Cell, side: Player) -> i32 {
    match cell.owner() {
        Some(owner) if owner == side => 1,
        Some(_) => -1,
        None => 0,
    }
}

fn corner_control(board: &Board, side: Player) -> i32 {
    CORNERS
        .iter()
        .filter_map(|&(row, col)| Position::new(row, col))
        .map(|pos| ownership(board.get(pos), side))
        .sum()
}

fn edge_control(board: &Board, side: Player) -> i32 {
    let mut score = 0;
    // Top and bottom rows, then left and right columns, corners excluded
    for i in 1..7 {
        for (row, col) in [(0, i), (7, i), (i, 0), (i, 7)] {
            if let Some(pos) = Position::new(row, col) {
                score += ownership(board.get(pos), side);
            }
        }
    }
    score
}

/// Discs beside a corner their owner does not hold, side minus opponent.
fn near_corner_exposure(board: &Board, side: Player) -> i32 {
    let mut score = 0;
    for corner in CORNERS.iter().filter_map(|&(row, col)| Position::new(row, col)) {
        let corner_owner = board.get(corner).owner();
        for &(dr, dc) in NEAR_CORNER_OFFSETS.iter() {
            let Some(pos) = corner.offset(dr, dc) else {
                continue;
            };
            match board.get(pos).owner() {
                Some(owner) if corner_owner != Some(owner) => {
                    score += if owner == side { 1 } else { -1 };
                }
                _ => {}
            }
        }
    }
    score
}
