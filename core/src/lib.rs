#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Ore Siege engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Terrain classification of a single grid cell.
///
/// The set is closed: every cell holds exactly one kind, and transitions
/// between kinds happen only through the world's command handlers (mining,
/// placement, ore pickup, liquid interaction, combat drops).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Open ground that entities traverse freely.
    Empty,
    /// Solid mineable block that no entity may occupy.
    Material,
    /// Single unit of blue ore dropped by a defeated zombie.
    BlueOre,
    /// Double unit of blue ore dropped by the level's starred zombie.
    DoubleBlueOre,
    /// Green ore that zombies trample into blue ore.
    GreenOre,
    /// Spreading liquid hazard that entities may wade through.
    Water,
    /// Lethal liquid: entering it reduces an entity's health to zero.
    Lava,
    /// Hardened liquid boundary; walkable, and the designated level exit.
    Obsidian,
}

impl CellKind {
    /// Reports whether an entity may occupy a cell of this kind.
    ///
    /// Lava is deliberately excluded: entities *can* enter it, but doing so
    /// is lethal rather than a traversal, so pathfinding never routes
    /// through it.
    #[must_use]
    pub const fn is_walkable(self) -> bool {
        matches!(
            self,
            Self::Empty
                | Self::BlueOre
                | Self::DoubleBlueOre
                | Self::GreenOre
                | Self::Water
                | Self::Obsidian
        )
    }

    /// Reports whether the cell blocks movement entirely.
    #[must_use]
    pub const fn is_solid(self) -> bool {
        matches!(self, Self::Material)
    }

    /// Reports whether entering the cell kills the entering entity.
    #[must_use]
    pub const fn is_lethal(self) -> bool {
        matches!(self, Self::Lava)
    }
}

/// Cardinal movement directions shared by the player and zombies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// All four directions in a fixed canonical order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Derives the direction leading from one cell to an orthogonal
    /// neighbor, or `None` when the cells are not exactly one step apart.
    #[must_use]
    pub fn between(from: GridCoord, to: GridCoord) -> Option<Direction> {
        let column_diff = from.column().abs_diff(to.column());
        let row_diff = from.row().abs_diff(to.row());
        if column_diff + row_diff != 1 {
            return None;
        }

        if column_diff == 1 {
            if to.column() > from.column() {
                Some(Direction::East)
            } else {
                Some(Direction::West)
            }
        } else if to.row() > from.row() {
            Some(Direction::South)
        } else {
            Some(Direction::North)
        }
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    column: u32,
    row: u32,
}

impl GridCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: GridCoord) -> u32 {
        self.column.abs_diff(other.column) + self.row.abs_diff(other.row)
    }

    /// Computes the Chebyshev distance between two cell coordinates.
    ///
    /// Zombie melee reach and green-ore placement exclusion zones are both
    /// expressed in this metric.
    #[must_use]
    pub fn chebyshev_distance(self, other: GridCoord) -> u32 {
        self.column
            .abs_diff(other.column)
            .max(self.row.abs_diff(other.row))
    }

    /// Returns the orthogonal neighbor in the given direction.
    ///
    /// Steps off the north or west edge yield `None`; steps beyond the east
    /// or south edge are left for the grid's own bounds check to reject.
    #[must_use]
    pub fn offset(self, direction: Direction) -> Option<GridCoord> {
        match direction {
            Direction::North => self
                .row
                .checked_sub(1)
                .map(|row| Self::new(self.column, row)),
            Direction::South => self
                .row
                .checked_add(1)
                .map(|row| Self::new(self.column, row)),
            Direction::East => self
                .column
                .checked_add(1)
                .map(|column| Self::new(column, self.row)),
            Direction::West => self
                .column
                .checked_sub(1)
                .map(|column| Self::new(column, self.row)),
        }
    }
}

/// Unique identifier assigned to a zombie within a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ZombieId(u32);

impl ZombieId {
    /// Creates a new zombie identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// One-based level number within a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LevelNumber(u32);

impl LevelNumber {
    /// Creates a new level number wrapper.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the underlying level index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// The level that follows this one.
    #[must_use]
    pub const fn next(&self) -> LevelNumber {
        Self(self.0.saturating_add(1))
    }
}

/// Hit points carried by the player or a zombie.
///
/// Zero is terminal for the entity; arithmetic saturates so health never
/// wraps below zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Health(u32);

impl Health {
    /// Creates a health value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric hit-point count.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Reports whether the entity is defeated.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns the health reduced by the provided amount, saturating at zero.
    #[must_use]
    pub const fn saturating_sub(self, amount: u32) -> Health {
        Self(self.0.saturating_sub(amount))
    }
}

/// What a cell surrendered when the player collected the ore on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OreYield {
    /// The cell held no ore.
    None,
    /// One unit of blue ore.
    Single,
    /// Two units of blue ore.
    Double,
    /// One unit of green ore.
    Green,
}

/// Lifecycle state of the current level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// The level accepts input-driven actions and AI ticks.
    Active,
    /// The player reached the exit; a new level should be generated.
    LevelComplete,
    /// The player died; the run is over.
    GameOver,
}

impl Phase {
    /// Reports whether the level has reached a terminal state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Active)
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Rebuilds the world for the given level using the provided seed.
    GenerateLevel {
        /// Level to generate; difficulty parameters derive from it.
        level: LevelNumber,
        /// Seed feeding every random draw of the generation pipeline.
        seed: u64,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that the player step one cell in the given direction.
    MovePlayer {
        /// Direction of the attempted step.
        direction: Direction,
    },
    /// Requests a context action against the adjacent cell: hit a zombie
    /// standing there, or mine the material block occupying it.
    Interact {
        /// Direction of the targeted adjacent cell.
        direction: Direction,
    },
    /// Requests that the player convert their own cell into a material
    /// block, consuming one unit of mined material.
    PlaceMaterial,
    /// Requests that the player seed green ore into the cell they face,
    /// consuming one unit of green ore.
    PlaceGreenOre,
    /// Requests that a zombie advance a single step in the given direction.
    StepZombie {
        /// Identifier of the zombie attempting to move.
        zombie: ZombieId,
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Requests that a zombie strike the player if within melee reach.
    ZombieStrike {
        /// Identifier of the attacking zombie.
        zombie: ZombieId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that a fresh level finished generating.
    LevelGenerated {
        /// Level that became active.
        level: LevelNumber,
    },
    /// Confirms that the player moved between two cells.
    PlayerMoved {
        /// Cell the player occupied before moving.
        from: GridCoord,
        /// Cell the player occupies after the move.
        to: GridCoord,
    },
    /// Reports ore collected by the player while moving.
    OreCollected {
        /// Cell the ore was collected from.
        cell: GridCoord,
        /// Quantity and kind of the collected ore.
        ore: OreYield,
    },
    /// Confirms that the player mined a material block.
    MaterialMined {
        /// Cell that was cleared.
        cell: GridCoord,
    },
    /// Confirms that the player placed a material block.
    MaterialPlaced {
        /// Cell that now holds the block.
        cell: GridCoord,
    },
    /// Confirms that the player seeded green ore ahead of them.
    GreenOrePlaced {
        /// Cell that now holds the ore.
        cell: GridCoord,
    },
    /// Reports that a zombie strike connected with the player.
    PlayerDamaged {
        /// Player health remaining after the strike.
        health: Health,
    },
    /// Confirms that a zombie advanced between two cells.
    ZombieAdvanced {
        /// Identifier of the zombie that moved.
        zombie: ZombieId,
        /// Cell the zombie occupied before moving.
        from: GridCoord,
        /// Cell the zombie occupies after the move.
        to: GridCoord,
    },
    /// Reports that a player hit landed, stunning the zombie.
    ZombieShocked {
        /// Identifier of the zombie that was hit.
        zombie: ZombieId,
        /// Zombie health remaining after the hit.
        health: Health,
    },
    /// Announces that a zombie was defeated and dropped ore on its cell.
    ZombieDefeated {
        /// Identifier of the defeated zombie.
        zombie: ZombieId,
        /// Cell holding the dropped ore.
        cell: GridCoord,
    },
    /// Announces that a zombie stepped into lava and died without a drop.
    ZombieIncinerated {
        /// Identifier of the incinerated zombie.
        zombie: ZombieId,
        /// Lava cell the zombie stepped onto.
        cell: GridCoord,
    },
    /// Reports that a zombie trampled green ore into blue ore.
    GreenOreTrampled {
        /// Cell whose ore was converted.
        cell: GridCoord,
    },
    /// Reports that water spread into a previously empty cell.
    WaterSpread {
        /// Cell that is now water.
        cell: GridCoord,
    },
    /// Reports that a liquid collision hardened a cell into obsidian.
    LavaHardened {
        /// Cell that is now obsidian.
        cell: GridCoord,
    },
    /// Announces that the player completed the level on the exit tile.
    LevelCleared {
        /// Level that was completed.
        level: LevelNumber,
        /// Level that should be generated next.
        next: LevelNumber,
    },
    /// Announces that the player died and the run is over.
    GameOver {
        /// Level on which the run ended.
        level: LevelNumber,
    },
}

/// Borrowed read-only view over the dense terrain grid.
#[derive(Clone, Copy, Debug)]
pub struct GridView<'a> {
    cells: &'a [CellKind],
    size: u32,
}

impl<'a> GridView<'a> {
    /// Captures a new grid view backed by the provided cell slice.
    ///
    /// The slice is expected to hold `size * size` cells in row-major order.
    #[must_use]
    pub const fn new(cells: &'a [CellKind], size: u32) -> Self {
        Self { cells, size }
    }

    /// Side length of the square grid in cells.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Dense row-major cell slice underlying the view.
    #[must_use]
    pub const fn cells(&self) -> &'a [CellKind] {
        self.cells
    }

    /// Reports whether the coordinate lies inside the grid.
    #[must_use]
    pub const fn in_bounds(&self, cell: GridCoord) -> bool {
        cell.column() < self.size && cell.row() < self.size
    }

    /// Returns the kind of the provided cell, or `None` when out of bounds.
    #[must_use]
    pub fn kind(&self, cell: GridCoord) -> Option<CellKind> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
    }

    fn index(&self, cell: GridCoord) -> Option<usize> {
        if !self.in_bounds(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.size).ok()?;
        Some(row * width + column)
    }
}

/// Immutable representation of the player used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    /// Grid cell currently occupied by the player.
    pub cell: GridCoord,
    /// Direction the player last moved in; targets `PlaceGreenOre`.
    pub facing: Direction,
    /// Remaining hit points.
    pub health: Health,
    /// Mined material blocks held in inventory.
    pub materials: u32,
    /// Blue-ore units held in inventory.
    pub blue_ore: u32,
    /// Green-ore units held in inventory.
    pub green_ore: u32,
}

/// Immutable representation of a single zombie's state used for queries.
///
/// The starred reward marker deliberately has no field here: it must stay
/// invisible to rendering and every other collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZombieSnapshot {
    /// Unique identifier assigned to the zombie.
    pub id: ZombieId,
    /// Grid cell currently occupied by the zombie.
    pub cell: GridCoord,
    /// Remaining hit points; zero means defeated.
    pub health: Health,
    /// Indicates whether the zombie is currently stunned.
    pub shocked: bool,
    /// Indicates whether the zombie's attack cooldown has elapsed.
    pub attack_ready: bool,
}

/// Read-only snapshot describing all zombies within the level.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ZombieView {
    snapshots: Vec<ZombieSnapshot>,
}

impl ZombieView {
    /// Creates a new zombie view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ZombieSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic id order.
    pub fn iter(&self) -> impl Iterator<Item = &ZombieSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ZombieSnapshot> {
        self.snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::{CellKind, Direction, GridCoord, GridView, Health, OreYield, Phase, ZombieId};
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = GridCoord::new(1, 1);
        let destination = GridCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn chebyshev_distance_takes_the_larger_axis() {
        let origin = GridCoord::new(2, 2);
        assert_eq!(origin.chebyshev_distance(GridCoord::new(3, 3)), 1);
        assert_eq!(origin.chebyshev_distance(GridCoord::new(2, 5)), 3);
        assert_eq!(origin.chebyshev_distance(GridCoord::new(0, 1)), 2);
    }

    #[test]
    fn offset_rejects_steps_off_the_origin_edges() {
        let origin = GridCoord::new(0, 0);
        assert_eq!(origin.offset(Direction::North), None);
        assert_eq!(origin.offset(Direction::West), None);
        assert_eq!(origin.offset(Direction::East), Some(GridCoord::new(1, 0)));
        assert_eq!(origin.offset(Direction::South), Some(GridCoord::new(0, 1)));
    }

    #[test]
    fn direction_between_orthogonal_neighbors() {
        let origin = GridCoord::new(3, 3);
        assert_eq!(
            Direction::between(origin, GridCoord::new(3, 2)),
            Some(Direction::North)
        );
        assert_eq!(
            Direction::between(origin, GridCoord::new(4, 3)),
            Some(Direction::East)
        );
        assert_eq!(
            Direction::between(origin, GridCoord::new(3, 4)),
            Some(Direction::South)
        );
        assert_eq!(
            Direction::between(origin, GridCoord::new(2, 3)),
            Some(Direction::West)
        );
        assert_eq!(Direction::between(origin, origin), None);
        assert_eq!(Direction::between(origin, GridCoord::new(4, 4)), None);
    }

    #[test]
    fn walkable_set_excludes_solids_and_lava() {
        assert!(CellKind::Empty.is_walkable());
        assert!(CellKind::BlueOre.is_walkable());
        assert!(CellKind::DoubleBlueOre.is_walkable());
        assert!(CellKind::GreenOre.is_walkable());
        assert!(CellKind::Water.is_walkable());
        assert!(CellKind::Obsidian.is_walkable());
        assert!(!CellKind::Material.is_walkable());
        assert!(!CellKind::Lava.is_walkable());
        assert!(CellKind::Lava.is_lethal());
        assert!(CellKind::Material.is_solid());
    }

    #[test]
    fn health_saturates_at_zero() {
        let health = Health::new(1);
        assert_eq!(health.saturating_sub(3), Health::new(0));
        assert!(health.saturating_sub(3).is_zero());
        assert!(!health.is_zero());
    }

    #[test]
    fn grid_view_indexes_row_major() {
        let cells = vec![
            CellKind::Empty,
            CellKind::Material,
            CellKind::Water,
            CellKind::Lava,
        ];
        let view = GridView::new(&cells, 2);
        assert_eq!(view.kind(GridCoord::new(1, 0)), Some(CellKind::Material));
        assert_eq!(view.kind(GridCoord::new(0, 1)), Some(CellKind::Water));
        assert_eq!(view.kind(GridCoord::new(2, 0)), None);
        assert_eq!(view.kind(GridCoord::new(0, 2)), None);
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn cell_kind_round_trips_through_bincode() {
        assert_round_trip(&CellKind::DoubleBlueOre);
        assert_round_trip(&CellKind::Obsidian);
    }

    #[test]
    fn zombie_id_round_trips_through_bincode() {
        assert_round_trip(&ZombieId::new(42));
    }

    #[test]
    fn ore_yield_round_trips_through_bincode() {
        assert_round_trip(&OreYield::Double);
    }

    #[test]
    fn phase_round_trips_through_bincode() {
        assert_round_trip(&Phase::LevelComplete);
    }

    #[test]
    fn zombie_snapshot_exposes_exactly_the_public_fields() {
        let snapshot = super::ZombieSnapshot {
            id: ZombieId::new(1),
            cell: GridCoord::new(2, 3),
            health: Health::new(5),
            shocked: false,
            attack_ready: true,
        };
        let value = serde_json::to_value(snapshot).expect("serialize");
        let object = value.as_object().expect("snapshot serializes to an object");
        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["attack_ready", "cell", "health", "id", "shocked"]);
    }

    #[test]
    fn terminal_phases_are_flagged() {
        assert!(!Phase::Active.is_terminal());
        assert!(Phase::LevelComplete.is_terminal());
        assert!(Phase::GameOver.is_terminal());
    }
}
