//! Test scaffolding for assembling worlds from glyph grids.
//!
//! Enabled for this crate's own tests and, behind the `fixtures` feature,
//! for downstream crates that need small hand-built levels instead of
//! procedurally generated ones.

use std::time::Duration;

use ore_siege_core::{CellKind, Direction, GridCoord, Health, LevelNumber, Phase, ZombieId};

use crate::{Grid, Player, World, Zombie, STARTING_PLAYER_HEALTH, ZOMBIE_STARTING_HEALTH};

/// Builds a world from rows of cell glyphs with zombies at fixed cells.
///
/// Glyphs: `.` empty, `#` material, `w` water, `l` lava, `o` obsidian,
/// `b` blue ore, `B` double blue ore, `g` green ore.
///
/// # Panics
///
/// Panics when the rows are not square, when a glyph is unknown, or when
/// the player cell lies outside the grid. Fixture input is authored by
/// hand, so malformed input is a test bug.
#[must_use]
pub fn world_from_rows(rows: &[&str], player: GridCoord, zombie_cells: &[GridCoord]) -> World {
    let size = u32::try_from(rows.len()).expect("fixture grid too large");
    let mut grid = Grid::filled(size, CellKind::Empty);
    for (row, line) in rows.iter().enumerate() {
        assert_eq!(
            line.chars().count(),
            rows.len(),
            "fixture row {row} is not {size} glyphs wide"
        );
        for (column, glyph) in line.chars().enumerate() {
            let cell = GridCoord::new(column as u32, row as u32);
            grid.set(cell, kind_for_glyph(glyph));
        }
    }
    assert!(
        player.column() < size && player.row() < size,
        "player cell {player:?} is outside the fixture grid"
    );

    let zombies = zombie_cells
        .iter()
        .enumerate()
        .map(|(index, cell)| Zombie {
            id: ZombieId::new(index as u32),
            cell: *cell,
            health: ZOMBIE_STARTING_HEALTH,
            shocked_until: Duration::ZERO,
            next_attack_at: Duration::ZERO,
            starred: false,
        })
        .collect();

    World {
        grid,
        player: Player {
            cell: player,
            facing: Direction::East,
            health: STARTING_PLAYER_HEALTH,
            materials: 0,
            blue_ore: 0,
            green_ore: 0,
        },
        zombies,
        level: LevelNumber::new(1),
        zombies_defeated: 0,
        phase: Phase::Active,
        clock: Duration::ZERO,
    }
}

/// Stocks the player's inventory directly.
pub fn grant_inventory(world: &mut World, materials: u32, blue_ore: u32, green_ore: u32) {
    world.player.materials = materials;
    world.player.blue_ore = blue_ore;
    world.player.green_ore = green_ore;
}

/// Marks the zombie as the level's hidden reward carrier.
///
/// # Panics
///
/// Panics when the id names no zombie in the fixture.
pub fn star_zombie(world: &mut World, id: ZombieId) {
    let index = world.zombie_index(id).expect("unknown fixture zombie");
    world.zombies[index].starred = true;
}

/// Overrides a zombie's remaining health.
///
/// # Panics
///
/// Panics when the id names no zombie in the fixture.
pub fn set_zombie_health(world: &mut World, id: ZombieId, health: Health) {
    let index = world.zombie_index(id).expect("unknown fixture zombie");
    world.zombies[index].health = health;
}

fn kind_for_glyph(glyph: char) -> CellKind {
    match glyph {
        '.' => CellKind::Empty,
        '#' => CellKind::Material,
        'w' => CellKind::Water,
        'l' => CellKind::Lava,
        'o' => CellKind::Obsidian,
        'b' => CellKind::BlueOre,
        'B' => CellKind::DoubleBlueOre,
        'g' => CellKind::GreenOre,
        other => panic!("unknown fixture glyph {other:?}"),
    }
}
