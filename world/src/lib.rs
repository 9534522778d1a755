#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Ore Siege.
//!
//! The world owns the terrain grid, the player, and the zombie roster for
//! the current level. All mutation flows through [`apply`]; collaborators
//! observe state exclusively through the [`query`] module and the events
//! emitted by command execution.

mod generation;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

use std::time::Duration;

use ore_siege_core::{
    CellKind, Command, Direction, Event, GridCoord, Health, LevelNumber, OreYield, Phase, ZombieId,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::generation::{GenerationParams, GeneratedLevel};

const GRID_SIZE: u32 = 40;
const PLAYER_SPAWN: GridCoord = GridCoord::new(0, 0);
const STARTING_PLAYER_HEALTH: Health = Health::new(5);
const ZOMBIE_STARTING_HEALTH: Health = Health::new(5);
const SHOCK_DURATION: Duration = Duration::from_millis(500);
const ATTACK_COOLDOWN: Duration = Duration::from_millis(500);
const EXIT_BLUE_ORE_COST: u32 = 2;
const DEFAULT_LEVEL_SEED: u64 = 0x51d2_c3a4_97e6_0b1f;

/// Dense square terrain grid stored in row-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Grid {
    size: u32,
    cells: Vec<CellKind>,
}

impl Grid {
    pub(crate) fn filled(size: u32, kind: CellKind) -> Self {
        let capacity = usize::try_from(u64::from(size) * u64::from(size)).unwrap_or(0);
        Self {
            size,
            cells: vec![kind; capacity],
        }
    }

    pub(crate) fn size(&self) -> u32 {
        self.size
    }

    pub(crate) fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub(crate) fn cells(&self) -> &[CellKind] {
        &self.cells
    }

    pub(crate) fn kind(&self, cell: GridCoord) -> Option<CellKind> {
        self.index(cell).and_then(|index| self.cells.get(index).copied())
    }

    /// Writes a cell kind; out-of-bounds writes are silently dropped.
    pub(crate) fn set(&mut self, cell: GridCoord, kind: CellKind) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = kind;
            }
        }
    }

    /// Clears any ore at the cell and reports what it yielded.
    pub(crate) fn collect_ore_at(&mut self, cell: GridCoord) -> OreYield {
        let collected = match self.kind(cell) {
            Some(CellKind::BlueOre) => OreYield::Single,
            Some(CellKind::DoubleBlueOre) => OreYield::Double,
            Some(CellKind::GreenOre) => OreYield::Green,
            _ => return OreYield::None,
        };
        self.set(cell, CellKind::Empty);
        collected
    }

    #[cfg(test)]
    pub(crate) fn count(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|cell| **cell == kind).count()
    }

    pub(crate) fn iter_cells(&self) -> impl Iterator<Item = (GridCoord, CellKind)> + '_ {
        let size = self.size;
        self.cells.iter().enumerate().map(move |(index, kind)| {
            let index = index as u32;
            (GridCoord::new(index % size, index / size), *kind)
        })
    }

    fn index(&self, cell: GridCoord) -> Option<usize> {
        if cell.column() < self.size && cell.row() < self.size {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.size).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

#[derive(Clone, Debug)]
struct Player {
    cell: GridCoord,
    facing: Direction,
    health: Health,
    materials: u32,
    blue_ore: u32,
    green_ore: u32,
}

impl Player {
    fn spawn(cell: GridCoord) -> Self {
        Self {
            cell,
            facing: Direction::East,
            health: STARTING_PLAYER_HEALTH,
            materials: 0,
            blue_ore: 0,
            green_ore: 0,
        }
    }
}

#[derive(Clone, Debug)]
struct Zombie {
    id: ZombieId,
    cell: GridCoord,
    health: Health,
    shocked_until: Duration,
    next_attack_at: Duration,
    starred: bool,
}

impl Zombie {
    fn is_alive(&self) -> bool {
        !self.health.is_zero()
    }

    fn is_shocked(&self, clock: Duration) -> bool {
        clock < self.shocked_until
    }

    fn attack_ready(&self, clock: Duration) -> bool {
        clock >= self.next_attack_at
    }
}

/// Represents the authoritative Ore Siege world state for one level.
#[derive(Debug)]
pub struct World {
    grid: Grid,
    player: Player,
    zombies: Vec<Zombie>,
    level: LevelNumber,
    zombies_defeated: u32,
    phase: Phase,
    clock: Duration,
}

impl World {
    /// Creates a world with level one generated from the built-in seed.
    #[must_use]
    pub fn new() -> Self {
        let mut world = Self {
            grid: Grid::filled(GRID_SIZE, CellKind::Empty),
            player: Player::spawn(PLAYER_SPAWN),
            zombies: Vec::new(),
            level: LevelNumber::new(1),
            zombies_defeated: 0,
            phase: Phase::Active,
            clock: Duration::ZERO,
        };
        world.regenerate(LevelNumber::new(1), DEFAULT_LEVEL_SEED);
        world
    }

    /// Rebuilds terrain and entities for the level. The run-wide defeat
    /// counter survives; player health and inventories reset to starting
    /// values.
    fn regenerate(&mut self, level: LevelNumber, seed: u64) {
        let params = GenerationParams::for_level(GRID_SIZE, level);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let GeneratedLevel {
            grid,
            zombie_spawns,
            starred_index,
        } = generation::generate(params, &mut rng, PLAYER_SPAWN);

        self.grid = grid;
        self.player = Player::spawn(PLAYER_SPAWN);
        self.zombies = zombie_spawns
            .into_iter()
            .enumerate()
            .map(|(index, cell)| Zombie {
                id: ZombieId::new(index as u32),
                cell,
                health: ZOMBIE_STARTING_HEALTH,
                shocked_until: Duration::ZERO,
                next_attack_at: Duration::ZERO,
                starred: index == starred_index,
            })
            .collect();
        self.level = level;
        self.phase = Phase::Active;
    }

    fn living_zombie_at(&self, cell: GridCoord) -> Option<usize> {
        self.zombies
            .iter()
            .position(|zombie| zombie.is_alive() && zombie.cell == cell)
    }

    fn zombie_index(&self, id: ZombieId) -> Option<usize> {
        self.zombies.iter().position(|zombie| zombie.id == id)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Invalid or ill-timed requests are silent no-ops: every command is
/// re-validated against current state, so replaying an already-consumed
/// input never fires twice. Once the level reaches a terminal phase only
/// `GenerateLevel` is honored.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if world.phase.is_terminal() && !matches!(command, Command::GenerateLevel { .. }) {
        return;
    }

    match command {
        Command::GenerateLevel { level, seed } => {
            world.regenerate(level, seed);
            out_events.push(Event::LevelGenerated { level });
        }
        Command::Tick { dt } => {
            world.clock = world.clock.saturating_add(dt);
            out_events.push(Event::TimeAdvanced { dt });
            spread_water(world, out_events);
        }
        Command::MovePlayer { direction } => move_player(world, direction, out_events),
        Command::Interact { direction } => interact(world, direction, out_events),
        Command::PlaceMaterial => place_material(world, out_events),
        Command::PlaceGreenOre => place_green_ore(world, out_events),
        Command::StepZombie { zombie, direction } => step_zombie(world, zombie, direction, out_events),
        Command::ZombieStrike { zombie } => zombie_strike(world, zombie, out_events),
    }
}

/// Environmental hazard growth: every pre-tick water cell floods adjacent
/// empty cells and hardens adjacent lava into obsidian. The pre-tick set is
/// snapshotted first so freshly flooded cells wait for the next tick.
fn spread_water(world: &mut World, out_events: &mut Vec<Event>) {
    let water: Vec<GridCoord> = world
        .grid
        .iter_cells()
        .filter(|(_, kind)| *kind == CellKind::Water)
        .map(|(cell, _)| cell)
        .collect();

    for cell in water {
        for direction in Direction::ALL {
            let Some(neighbor) = cell.offset(direction) else {
                continue;
            };
            match world.grid.kind(neighbor) {
                Some(CellKind::Empty) => {
                    world.grid.set(neighbor, CellKind::Water);
                    out_events.push(Event::WaterSpread { cell: neighbor });
                }
                Some(CellKind::Lava) => {
                    world.grid.set(neighbor, CellKind::Obsidian);
                    out_events.push(Event::LavaHardened { cell: neighbor });
                }
                _ => {}
            }
        }
    }
}

fn move_player(world: &mut World, direction: Direction, out_events: &mut Vec<Event>) {
    let Some(target) = world.player.cell.offset(direction) else {
        return;
    };
    let Some(kind) = world.grid.kind(target) else {
        return;
    };
    if kind.is_solid() || world.living_zombie_at(target).is_some() {
        return;
    }

    let from = world.player.cell;
    world.player.cell = target;
    world.player.facing = direction;
    out_events.push(Event::PlayerMoved { from, to: target });

    if kind.is_lethal() {
        world.player.health = Health::new(0);
        world.phase = Phase::GameOver;
        out_events.push(Event::GameOver { level: world.level });
        return;
    }

    let ore = world.grid.collect_ore_at(target);
    match ore {
        OreYield::None => {}
        OreYield::Single => world.player.blue_ore += 1,
        OreYield::Double => world.player.blue_ore += 2,
        OreYield::Green => world.player.green_ore += 1,
    }
    if ore != OreYield::None {
        out_events.push(Event::OreCollected { cell: target, ore });
    }

    if kind == CellKind::Obsidian && world.player.blue_ore >= EXIT_BLUE_ORE_COST {
        world.phase = Phase::LevelComplete;
        out_events.push(Event::LevelCleared {
            level: world.level,
            next: world.level.next(),
        });
    }
}

fn interact(world: &mut World, direction: Direction, out_events: &mut Vec<Event>) {
    let Some(target) = world.player.cell.offset(direction) else {
        return;
    };
    if world.grid.kind(target).is_none() {
        return;
    }

    if let Some(index) = world.living_zombie_at(target) {
        let clock = world.clock;
        let zombie = &mut world.zombies[index];
        zombie.health = zombie.health.saturating_sub(1);
        zombie.shocked_until = clock.saturating_add(SHOCK_DURATION);
        out_events.push(Event::ZombieShocked {
            zombie: zombie.id,
            health: zombie.health,
        });

        if zombie.health.is_zero() {
            let id = zombie.id;
            let cell = zombie.cell;
            let drop = if zombie.starred {
                CellKind::DoubleBlueOre
            } else {
                CellKind::BlueOre
            };
            world.grid.set(cell, drop);
            world.zombies_defeated += 1;
            out_events.push(Event::ZombieDefeated { zombie: id, cell });
        }
    } else if world.grid.kind(target) == Some(CellKind::Material) {
        world.grid.set(target, CellKind::Empty);
        world.player.materials += 1;
        out_events.push(Event::MaterialMined { cell: target });
    }
}

fn place_material(world: &mut World, out_events: &mut Vec<Event>) {
    if world.player.materials == 0 {
        return;
    }
    let cell = world.player.cell;
    if world.grid.kind(cell) != Some(CellKind::Empty) {
        return;
    }
    world.grid.set(cell, CellKind::Material);
    world.player.materials -= 1;
    out_events.push(Event::MaterialPlaced { cell });
}

fn place_green_ore(world: &mut World, out_events: &mut Vec<Event>) {
    if world.player.green_ore == 0 {
        return;
    }
    let Some(target) = world.player.cell.offset(world.player.facing) else {
        return;
    };
    if world.grid.kind(target) != Some(CellKind::Empty) {
        return;
    }
    world.grid.set(target, CellKind::GreenOre);
    world.player.green_ore -= 1;
    out_events.push(Event::GreenOrePlaced { cell: target });
}

fn step_zombie(
    world: &mut World,
    id: ZombieId,
    direction: Direction,
    out_events: &mut Vec<Event>,
) {
    let Some(index) = world.zombie_index(id) else {
        return;
    };
    let clock = world.clock;
    let (from, target, kind) = {
        let zombie = &world.zombies[index];
        if !zombie.is_alive() || zombie.is_shocked(clock) {
            return;
        }
        let Some(target) = zombie.cell.offset(direction) else {
            return;
        };
        let Some(kind) = world.grid.kind(target) else {
            return;
        };
        // Lava is enterable but lethal; everything else must be walkable.
        if !kind.is_walkable() && !kind.is_lethal() {
            return;
        }
        if target == world.player.cell {
            return;
        }
        (zombie.cell, target, kind)
    };

    world.zombies[index].cell = target;
    out_events.push(Event::ZombieAdvanced {
        zombie: id,
        from,
        to: target,
    });

    if kind.is_lethal() {
        world.zombies[index].health = Health::new(0);
        out_events.push(Event::ZombieIncinerated {
            zombie: id,
            cell: target,
        });
    } else if kind == CellKind::GreenOre {
        world.grid.set(target, CellKind::BlueOre);
        out_events.push(Event::GreenOreTrampled { cell: target });
    }
}

fn zombie_strike(world: &mut World, id: ZombieId, out_events: &mut Vec<Event>) {
    let Some(index) = world.zombie_index(id) else {
        return;
    };
    let clock = world.clock;
    {
        let zombie = &world.zombies[index];
        if !zombie.is_alive() || zombie.is_shocked(clock) || !zombie.attack_ready(clock) {
            return;
        }
        if zombie.cell.chebyshev_distance(world.player.cell) > 1 {
            return;
        }
    }

    world.zombies[index].next_attack_at = clock.saturating_add(ATTACK_COOLDOWN);
    world.player.health = world.player.health.saturating_sub(1);
    out_events.push(Event::PlayerDamaged {
        health: world.player.health,
    });

    if world.player.health.is_zero() {
        world.phase = Phase::GameOver;
        out_events.push(Event::GameOver { level: world.level });
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use ore_siege_core::{
        GridView, LevelNumber, Phase, PlayerSnapshot, ZombieSnapshot, ZombieView,
    };

    use super::World;

    /// Borrowed view over the terrain grid, pulled once per frame by
    /// rendering collaborators.
    #[must_use]
    pub fn grid_view(world: &World) -> GridView<'_> {
        GridView::new(world.grid.cells(), world.grid.size())
    }

    /// Captures the player's current state.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        PlayerSnapshot {
            cell: world.player.cell,
            facing: world.player.facing,
            health: world.player.health,
            materials: world.player.materials,
            blue_ore: world.player.blue_ore,
            green_ore: world.player.green_ore,
        }
    }

    /// Captures the living zombies in deterministic id order.
    ///
    /// The starred reward marker is world-private and absent here.
    #[must_use]
    pub fn zombie_view(world: &World) -> ZombieView {
        let clock = world.clock;
        ZombieView::from_snapshots(
            world
                .zombies
                .iter()
                .filter(|zombie| zombie.is_alive())
                .map(|zombie| ZombieSnapshot {
                    id: zombie.id,
                    cell: zombie.cell,
                    health: zombie.health,
                    shocked: zombie.is_shocked(clock),
                    attack_ready: zombie.attack_ready(clock),
                })
                .collect(),
        )
    }

    /// Current lifecycle state of the level.
    #[must_use]
    pub fn phase(world: &World) -> Phase {
        world.phase
    }

    /// One-based number of the active level.
    #[must_use]
    pub fn level_number(world: &World) -> LevelNumber {
        world.level
    }

    /// Run-wide count of zombies defeated by the player.
    #[must_use]
    pub fn zombies_defeated(world: &World) -> u32 {
        world.zombies_defeated
    }

    /// Accumulated simulation time.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }
}
