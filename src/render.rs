use crate::types::{Phase, Position, PowerUpKind, Snapshot};

const EMPTY: char = '.';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sprite {
    Collectible,
    PowerUp(PowerUpKind),
    Wanderer,
    Player,
}

impl Sprite {
    pub fn glyph(self) -> char {
        match self {
            Sprite::Collectible => 'o',
            Sprite::PowerUp(PowerUpKind::Pizza) => 'P',
            Sprite::PowerUp(PowerUpKind::Hamburger) => 'H',
            Sprite::PowerUp(PowerUpKind::Superfood) => 'S',
            Sprite::Wanderer => 'W',
            Sprite::Player => '@',
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawInstruction {
    pub sprite: Sprite,
    pub at: Position,
}

pub fn draw_instructions(snapshot: &Snapshot) -> Vec<DrawInstruction> {
    let collectibles = snapshot.collectibles.iter().map(|c| DrawInstruction {
        sprite: Sprite::Collectible,
        at: c.position,
    });
    let power_ups = snapshot.power_ups.iter().map(|p| DrawInstruction {
        sprite: Sprite::PowerUp(p.kind),
        at: p.position,
    });
    let wanderers = snapshot.wanderers.iter().map(|w| DrawInstruction {
        sprite: Sprite::Wanderer,
        at: w.position,
    });
    collectibles
        .chain(power_ups)
        .chain(wanderers)
        .chain(std::iter::once(DrawInstruction {
            sprite: Sprite::Player,
            at: snapshot.player.position,
        }))
        .collect()
}

pub fn render_text(snapshot: &Snapshot) -> String {
    let cols = snapshot.cols.max(0) as usize;
    let rows = snapshot.rows.max(0) as usize;
    let mut cells = vec![vec![EMPTY; cols]; rows];

    for instruction in draw_instructions(snapshot) {
        let cell = usize::try_from(instruction.at.row)
            .ok()
            .and_then(|r| cells.get_mut(r))
            .and_then(|line| {
                usize::try_from(instruction.at.col)
                    .ok()
                    .and_then(|c| line.get_mut(c))
            });
        if let Some(cell) = cell {
            *cell = instruction.sprite.glyph();
        }
    }

    let mut output = String::with_capacity((cols + 1) * (rows + 1) + 64);
    output.push_str(&format!(
        "tick {} | score {} | {} | left {}+{}\n",
        snapshot.tick,
        snapshot.score,
        phase_label(snapshot.phase),
        snapshot.collectibles.len(),
        snapshot.power_ups.len(),
    ));
    for line in cells {
        output.extend(line);
        output.push('\n');
    }
    output
}

fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::NotStarted => "not started",
        Phase::Running => "running",
        Phase::Lost => "lost",
        Phase::Won => "won",
    }
}
