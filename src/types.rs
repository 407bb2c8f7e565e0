use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const CARDINALS: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub col: i32,
    pub row: i32,
}

impl Position {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    pub fn manhattan(self, other: Position) -> i32 {
        (self.col - other.col).abs() + (self.row - other.row).abs()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerUpKind {
    Pizza,
    Hamburger,
    Superfood,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [
        PowerUpKind::Pizza,
        PowerUpKind::Hamburger,
        PowerUpKind::Superfood,
    ];

    pub fn granted_effects(self) -> &'static [EffectKind] {
        match self {
            PowerUpKind::Superfood => &[EffectKind::Invincible, EffectKind::SpeedBoost],
            PowerUpKind::Pizza | PowerUpKind::Hamburger => &[EffectKind::Invincible],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    Invincible,
    SpeedBoost,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    NotStarted,
    Running,
    Lost,
    Won,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Lost | Phase::Won)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "entity", rename_all = "snake_case")]
pub enum EatenKind {
    Collectible,
    PowerUp {
        kind: PowerUpKind,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEvent {
    EntityEaten {
        kind: EatenKind,
        at: Position,
    },
    EffectStarted {
        kind: EffectKind,
        #[serde(rename = "expiresAtMs")]
        expires_at_ms: u64,
    },
    EffectEnded {
        kind: EffectKind,
    },
    GameOver {
        score: u32,
    },
    GameWon {
        score: u32,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct EffectView {
    pub kind: EffectKind,
    #[serde(rename = "expiresAtMs")]
    pub expires_at_ms: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlayerView {
    pub position: Position,
    pub facing: Direction,
    pub score: u32,
    pub effects: Vec<EffectView>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CollectibleView {
    pub id: u32,
    pub position: Position,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PowerUpView {
    pub id: u32,
    pub position: Position,
    pub kind: PowerUpKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct WandererView {
    pub id: u32,
    pub position: Position,
    pub direction: Direction,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    #[serde(rename = "nowMs")]
    pub now_ms: u64,
    pub cols: i32,
    pub rows: i32,
    pub phase: Phase,
    pub score: u32,
    pub player: PlayerView,
    pub collectibles: Vec<CollectibleView>,
    #[serde(rename = "powerUps")]
    pub power_ups: Vec<PowerUpView>,
    pub wanderers: Vec<WandererView>,
}
