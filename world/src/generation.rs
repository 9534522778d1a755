//! Procedural level generation: liquid pools, material fill, spawns, and ore.

use std::collections::VecDeque;

use ore_siege_core::{CellKind, GridCoord, LevelNumber};
use rand::{seq::SliceRandom, Rng};
use rand_chacha::ChaCha8Rng;

use crate::Grid;

const WATER_POOL_CAP: usize = 50;
const LAVA_POOL_CAP: usize = 30;
const MATERIAL_FILL_PERMILLE: u64 = 950;
const GREEN_ORE_COUNT: usize = 2;
const BASE_ZOMBIE_COUNT: u32 = 1;
const PLACEMENT_ATTEMPTS: usize = 400;
const FILL_ATTEMPT_FACTOR: usize = 8;

/// Tuning parameters resolved from the level number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct GenerationParams {
    pub(crate) grid_size: u32,
    pub(crate) zombie_count: u32,
    pub(crate) water_pool_cap: usize,
    pub(crate) lava_pool_cap: usize,
    pub(crate) green_ore_count: usize,
}

impl GenerationParams {
    /// Difficulty scaling: one extra zombie per level, everything else fixed.
    pub(crate) fn for_level(grid_size: u32, level: LevelNumber) -> Self {
        Self {
            grid_size,
            zombie_count: BASE_ZOMBIE_COUNT.saturating_add(level.get()),
            water_pool_cap: WATER_POOL_CAP,
            lava_pool_cap: LAVA_POOL_CAP,
            green_ore_count: GREEN_ORE_COUNT,
        }
    }
}

/// Result of the generation pipeline: terrain plus entity seeding data.
#[derive(Debug)]
pub(crate) struct GeneratedLevel {
    pub(crate) grid: Grid,
    pub(crate) zombie_spawns: Vec<GridCoord>,
    pub(crate) starred_index: usize,
}

/// Builds a fresh level.
///
/// Order matters: pools first so the material fill works around them,
/// zombie spawns before green ore so the ore exclusion zone is known.
/// Every placement loop is attempt-bounded; exhausting a budget leaves a
/// partially stocked grid rather than looping forever.
pub(crate) fn generate(
    params: GenerationParams,
    rng: &mut ChaCha8Rng,
    player_spawn: GridCoord,
) -> GeneratedLevel {
    let mut grid = Grid::filled(params.grid_size, CellKind::Empty);

    let water_origin = random_cell_in_region(rng, params.grid_size, Region::NorthWest);
    flood_pool(
        &mut grid,
        rng,
        water_origin,
        CellKind::Water,
        params.water_pool_cap,
    );

    let lava_origin = random_cell_in_region(rng, params.grid_size, Region::SouthEast);
    flood_pool(
        &mut grid,
        rng,
        lava_origin,
        CellKind::Lava,
        params.lava_pool_cap,
    );

    fill_materials(&mut grid, rng, player_spawn);

    let zombie_spawns = place_zombie_spawns(&mut grid, rng, params.zombie_count, player_spawn);
    let starred_index = if zombie_spawns.is_empty() {
        0
    } else {
        rng.gen_range(0..zombie_spawns.len())
    };

    place_green_ore(
        &mut grid,
        rng,
        params.green_ore_count,
        player_spawn,
        &zombie_spawns,
    );

    GeneratedLevel {
        grid,
        zombie_spawns,
        starred_index,
    }
}

/// Interior sub-regions used to keep the two pools apart.
#[derive(Clone, Copy, Debug)]
enum Region {
    NorthWest,
    SouthEast,
}

fn random_cell_in_region(rng: &mut ChaCha8Rng, size: u32, region: Region) -> GridCoord {
    let margin = (size / 8).max(1);
    let half = (size / 2).max(margin + 1);
    let (low, high) = match region {
        Region::NorthWest => (margin, half),
        Region::SouthEast => (half, (size.saturating_sub(margin)).max(half + 1)),
    };
    GridCoord::new(rng.gen_range(low..high), rng.gen_range(low..high))
}

/// Breadth-first liquid pool growth, capped at `cap` cells.
///
/// The pool spreads only into `Empty` cells. When the frontier meets the
/// opposite liquid, the met cell hardens into `Obsidian` and that spread
/// path halts: the same rule the live water tick applies.
fn flood_pool(
    grid: &mut Grid,
    rng: &mut ChaCha8Rng,
    origin: GridCoord,
    liquid: CellKind,
    cap: usize,
) {
    let opposite = match liquid {
        CellKind::Water => CellKind::Lava,
        _ => CellKind::Water,
    };

    if grid.kind(origin) != Some(CellKind::Empty) || cap == 0 {
        return;
    }

    grid.set(origin, liquid);
    let mut placed = 1usize;
    let mut queue = VecDeque::new();
    queue.push_back(origin);

    while let Some(cell) = queue.pop_front() {
        let mut neighbors = orthogonal_neighbors(cell, grid.size());
        neighbors.shuffle(rng);

        for neighbor in neighbors {
            match grid.kind(neighbor) {
                Some(CellKind::Empty) if placed < cap => {
                    grid.set(neighbor, liquid);
                    placed += 1;
                    queue.push_back(neighbor);
                }
                Some(kind) if kind == opposite => {
                    grid.set(neighbor, CellKind::Obsidian);
                }
                _ => {}
            }
        }

        if placed >= cap {
            break;
        }
    }
}

/// Converts random empty cells to material until 95% of the initially open
/// ground is filled or the attempt budget runs out. The remaining open
/// cells are what spawn and ore placement work with.
fn fill_materials(grid: &mut Grid, rng: &mut ChaCha8Rng, player_spawn: GridCoord) {
    let area = grid.cell_count();
    let open = grid
        .iter_cells()
        .filter(|(cell, kind)| *kind == CellKind::Empty && *cell != player_spawn)
        .count();
    let target = usize::try_from(open as u64 * MATERIAL_FILL_PERMILLE / 1000).unwrap_or(open);
    let mut attempts = area.saturating_mul(FILL_ATTEMPT_FACTOR);
    let mut placed = 0usize;

    while placed < target && attempts > 0 {
        attempts -= 1;
        let cell = random_cell(rng, grid.size());
        if cell == player_spawn {
            continue;
        }
        if grid.kind(cell) == Some(CellKind::Empty) {
            grid.set(cell, CellKind::Material);
            placed += 1;
        }
    }
}

/// Picks one spawn cell per zombie, preferring walkable cells at least half
/// the grid away from the player. Relaxes the distance requirement when the
/// budget runs out, and carves a cell open as the final fallback.
fn place_zombie_spawns(
    grid: &mut Grid,
    rng: &mut ChaCha8Rng,
    count: u32,
    player_spawn: GridCoord,
) -> Vec<GridCoord> {
    let min_distance = grid.size() / 2;
    let mut spawns: Vec<GridCoord> = Vec::with_capacity(count as usize);

    for _ in 0..count {
        let strict = try_place(rng, grid, PLACEMENT_ATTEMPTS, |grid, cell| {
            cell != player_spawn
                && !spawns.contains(&cell)
                && grid.kind(cell).is_some_and(CellKind::is_walkable)
                && cell.chebyshev_distance(player_spawn) >= min_distance
        });
        let relaxed = strict.or_else(|| {
            try_place(rng, grid, PLACEMENT_ATTEMPTS, |grid, cell| {
                cell != player_spawn
                    && !spawns.contains(&cell)
                    && grid.kind(cell).is_some_and(CellKind::is_walkable)
                    && cell.chebyshev_distance(player_spawn) >= 2
            })
        });
        let spawn = relaxed.unwrap_or_else(|| carve_open_cell(grid, player_spawn, &spawns));
        spawns.push(spawn);
    }

    spawns
}

/// Saturated grid: carve open the unclaimed cell farthest from the origin,
/// so stacked fallbacks still yield distinct spawn cells.
fn carve_open_cell(grid: &mut Grid, player_spawn: GridCoord, taken: &[GridCoord]) -> GridCoord {
    let size = grid.size();
    for row in (0..size).rev() {
        for column in (0..size).rev() {
            let cell = GridCoord::new(column, row);
            if cell != player_spawn && !taken.contains(&cell) {
                grid.set(cell, CellKind::Empty);
                return cell;
            }
        }
    }
    player_spawn
}

/// Seeds green ore on empty cells clear of every zombie spawn's melee zone.
fn place_green_ore(
    grid: &mut Grid,
    rng: &mut ChaCha8Rng,
    count: usize,
    player_spawn: GridCoord,
    zombie_spawns: &[GridCoord],
) {
    for _ in 0..count {
        let chosen = try_place(rng, grid, PLACEMENT_ATTEMPTS, |grid, cell| {
            cell != player_spawn
                && grid.kind(cell) == Some(CellKind::Empty)
                && zombie_spawns
                    .iter()
                    .all(|spawn| spawn.chebyshev_distance(cell) > 1)
        });
        if let Some(cell) = chosen {
            grid.set(cell, CellKind::GreenOre);
        }
    }
}

fn try_place<F>(
    rng: &mut ChaCha8Rng,
    grid: &Grid,
    attempts: usize,
    accept: F,
) -> Option<GridCoord>
where
    F: Fn(&Grid, GridCoord) -> bool,
{
    for _ in 0..attempts {
        let cell = random_cell(rng, grid.size());
        if accept(grid, cell) {
            return Some(cell);
        }
    }
    None
}

fn random_cell(rng: &mut ChaCha8Rng, size: u32) -> GridCoord {
    GridCoord::new(rng.gen_range(0..size), rng.gen_range(0..size))
}

fn orthogonal_neighbors(cell: GridCoord, size: u32) -> Vec<GridCoord> {
    let mut neighbors = Vec::with_capacity(4);
    if let Some(row) = cell.row().checked_sub(1) {
        neighbors.push(GridCoord::new(cell.column(), row));
    }
    if cell.column() + 1 < size {
        neighbors.push(GridCoord::new(cell.column() + 1, cell.row()));
    }
    if cell.row() + 1 < size {
        neighbors.push(GridCoord::new(cell.column(), cell.row() + 1));
    }
    if let Some(column) = cell.column().checked_sub(1) {
        neighbors.push(GridCoord::new(column, cell.row()));
    }
    neighbors
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng(seed: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(seed)
    }

    fn generate_default(seed: u64) -> GeneratedLevel {
        let params = GenerationParams::for_level(40, LevelNumber::new(1));
        generate(params, &mut rng(seed), GridCoord::new(0, 0))
    }

    #[test]
    fn zombie_count_scales_with_level() {
        let first = GenerationParams::for_level(40, LevelNumber::new(1));
        let fifth = GenerationParams::for_level(40, LevelNumber::new(5));
        assert_eq!(first.zombie_count, 2);
        assert_eq!(fifth.zombie_count, 6);
    }

    #[test]
    fn pools_respect_their_caps() {
        for seed in 0..16 {
            let level = generate_default(seed);
            assert!(level.grid.count(CellKind::Water) <= WATER_POOL_CAP);
            assert!(level.grid.count(CellKind::Lava) <= LAVA_POOL_CAP);
        }
    }

    #[test]
    fn terrain_accounts_for_every_cell() {
        let level = generate_default(7);
        let area = level.grid.cell_count();
        let occupied = level.grid.count(CellKind::Water)
            + level.grid.count(CellKind::Lava)
            + level.grid.count(CellKind::Obsidian)
            + level.grid.count(CellKind::Material);
        assert!(occupied <= area);
    }

    #[test]
    fn material_fill_leaves_a_sliver_of_open_ground() {
        for seed in 0..16 {
            let level = generate_default(seed);
            let area = level.grid.cell_count();
            let materials = level.grid.count(CellKind::Material);
            // 95% of the open ground, so roughly 90% of the whole grid
            // once the pools have claimed their corners.
            assert!(materials * 100 >= area * 85, "seed {seed}: {materials}");
            assert!(materials * 1000 <= area * 950, "seed {seed}: {materials}");
            assert!(
                level.grid.count(CellKind::Empty) >= GREEN_ORE_COUNT,
                "seed {seed} left no room for ore"
            );
        }
    }

    #[test]
    fn player_spawn_is_never_filled_with_material() {
        for seed in 0..16 {
            let level = generate_default(seed);
            let spawn_kind = level.grid.kind(GridCoord::new(0, 0));
            assert_ne!(spawn_kind, Some(CellKind::Material), "seed {seed}");
        }
    }

    #[test]
    fn zombie_spawns_are_walkable_and_distinct_from_player() {
        for seed in 0..16 {
            let level = generate_default(seed);
            assert_eq!(level.zombie_spawns.len(), 2);
            assert_ne!(level.zombie_spawns[0], level.zombie_spawns[1], "seed {seed}");
            for spawn in &level.zombie_spawns {
                assert_ne!(*spawn, GridCoord::new(0, 0));
                let kind = level.grid.kind(*spawn).expect("spawn in bounds");
                assert!(kind.is_walkable(), "seed {seed}: spawn on {kind:?}");
            }
        }
    }

    #[test]
    fn starred_index_addresses_a_real_zombie() {
        for seed in 0..16 {
            let level = generate_default(seed);
            assert!(level.starred_index < level.zombie_spawns.len());
        }
    }

    #[test]
    fn green_ore_avoids_zombie_melee_zones() {
        for seed in 0..16 {
            let level = generate_default(seed);
            let ore_cells: Vec<GridCoord> = level
                .grid
                .iter_cells()
                .filter(|(_, kind)| *kind == CellKind::GreenOre)
                .map(|(cell, _)| cell)
                .collect();
            assert_eq!(ore_cells.len(), GREEN_ORE_COUNT, "seed {seed}");
            for ore in ore_cells {
                for spawn in &level.zombie_spawns {
                    assert!(spawn.chebyshev_distance(ore) > 1, "seed {seed}");
                }
            }
        }
    }

    #[test]
    fn green_ore_is_skipped_when_no_cell_clears_the_melee_zones() {
        // A central spawn's melee zone covers the whole grid, so every
        // attempt is rejected and the budget runs out empty-handed.
        let mut grid = Grid::filled(3, CellKind::Empty);
        let mut rng = rng(3);
        place_green_ore(
            &mut grid,
            &mut rng,
            GREEN_ORE_COUNT,
            GridCoord::new(0, 0),
            &[GridCoord::new(1, 1)],
        );
        assert_eq!(grid.count(CellKind::GreenOre), 0);
    }

    #[test]
    fn spawns_stay_distinct_when_candidates_are_scarce() {
        for seed in 0..32 {
            let mut grid = Grid::filled(6, CellKind::Material);
            grid.set(GridCoord::new(2, 2), CellKind::Empty);
            grid.set(GridCoord::new(3, 3), CellKind::Empty);

            let mut rng = rng(seed);
            let spawns = place_zombie_spawns(&mut grid, &mut rng, 2, GridCoord::new(0, 0));

            assert_eq!(spawns.len(), 2, "seed {seed}");
            assert_ne!(spawns[0], spawns[1], "seed {seed}: stacked spawns");
        }
    }

    #[test]
    fn saturated_grid_carves_distinct_spawn_cells() {
        let mut grid = Grid::filled(4, CellKind::Material);
        let mut rng = rng(13);
        let spawns = place_zombie_spawns(&mut grid, &mut rng, 3, GridCoord::new(0, 0));

        assert_eq!(spawns.len(), 3);
        for (index, spawn) in spawns.iter().enumerate() {
            assert_ne!(*spawn, GridCoord::new(0, 0));
            assert_eq!(grid.kind(*spawn), Some(CellKind::Empty));
            for other in &spawns[index + 1..] {
                assert_ne!(spawn, other, "carved spawns must not stack");
            }
        }
    }

    #[test]
    fn generation_is_deterministic_for_equal_seeds() {
        let first = generate_default(0xfeed);
        let second = generate_default(0xfeed);
        assert_eq!(first.grid.cells(), second.grid.cells());
        assert_eq!(first.zombie_spawns, second.zombie_spawns);
        assert_eq!(first.starred_index, second.starred_index);
    }

    #[test]
    fn generation_diverges_across_seeds() {
        let first = generate_default(1);
        let second = generate_default(2);
        assert_ne!(first.grid.cells(), second.grid.cells());
    }

    #[test]
    fn flood_pool_hardens_the_met_liquid_to_obsidian() {
        let mut grid = Grid::filled(6, CellKind::Empty);
        grid.set(GridCoord::new(3, 0), CellKind::Water);
        grid.set(GridCoord::new(3, 1), CellKind::Water);
        grid.set(GridCoord::new(3, 2), CellKind::Water);
        grid.set(GridCoord::new(3, 3), CellKind::Water);
        grid.set(GridCoord::new(3, 4), CellKind::Water);
        grid.set(GridCoord::new(3, 5), CellKind::Water);

        let mut rng = rng(5);
        flood_pool(&mut grid, &mut rng, GridCoord::new(0, 0), CellKind::Lava, 64);

        // The wall of water confines the pool to columns 0..3; every water
        // cell the lava touched is now obsidian, and none became lava.
        for row in 0..6 {
            let kind = grid.kind(GridCoord::new(3, row)).expect("in bounds");
            assert!(
                kind == CellKind::Water || kind == CellKind::Obsidian,
                "row {row}: {kind:?}"
            );
        }
        for row in 0..6 {
            for column in 4..6 {
                assert_eq!(
                    grid.kind(GridCoord::new(column, row)),
                    Some(CellKind::Empty),
                    "lava leaked past the water wall"
                );
            }
        }
    }

    #[test]
    fn flood_pool_never_starts_on_occupied_ground() {
        let mut grid = Grid::filled(4, CellKind::Empty);
        grid.set(GridCoord::new(1, 1), CellKind::Material);
        let mut rng = rng(9);
        flood_pool(&mut grid, &mut rng, GridCoord::new(1, 1), CellKind::Water, 8);
        assert_eq!(grid.count(CellKind::Water), 0);
    }
}
