//! The world-clock grid itself: a small state machine (synced hour + user
//! shift) and the pure computation that turns it into 15 displayed cells.

use crate::config::Config;
use itertools::Itertools;
use log::debug;

/// Number of timezone rows on the screen
pub const ROW_COUNT: usize = 5;
/// Number of hour columns per row
pub const COL_COUNT: usize = 3;

const HOURS_PER_DAY: i32 = 24;

/// Hour offset of each column relative to its row's base hour. The middle
/// column is the row's own hour, flanked by the previous and next.
const COL_OFFSETS: [i32; COL_COUNT] = [-1, 0, 1];

/// The middle column's value decides the shade of all three cells in a row
const REFERENCE_COL: usize = 1;

/// Hours rendered dark, inclusive on both ends: 18:00 through 06:00
const NIGHT_START: i32 = 18;
const NIGHT_END: i32 = 6;

/// One computed cell of the grid
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Cell {
    /// Hour of day, 0-23
    pub hour: u8,
    pub shade: Shade,
}

/// Background/ink polarity of a cell
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Shade {
    /// Dark background, light digits (night in that row's zone)
    Dark,
    /// Light background, dark digits (daytime)
    #[default]
    Light,
}

/// Which way a button press moves the user shift
#[derive(Copy, Clone, Debug)]
pub enum ShiftDirection {
    Up,
    Down,
}

/// All grid state lives here, owned by the main loop. Mutation only ever
/// happens from event dispatch, so there's no locking anywhere.
#[derive(Debug)]
pub struct TimeGrid {
    /// Hour offset of each row from local time, top to bottom
    row_offsets: [i32; ROW_COUNT],
    /// Hour most recently reported by the wall clock
    current_hour: u32,
    /// Hour the grid is anchored to; frozen until the next resync
    hour: u32,
    /// User shift in hours, normalized to [0, 24)
    shift: i32,
}

impl TimeGrid {
    pub fn new(config: &Config, current_hour: u32) -> Self {
        Self {
            row_offsets: config.row_offsets(),
            current_hour,
            hour: current_hour,
            shift: 0,
        }
    }

    /// Cache the latest wall-clock hour. This deliberately does *not* touch
    /// the displayed cells: the grid stays anchored to the hour it was last
    /// synced to until the select button forces a resync.
    pub fn clock_tick(&mut self, hour: u32) {
        if hour != self.current_hour {
            debug!("Wall clock advanced to hour {hour}");
        }
        self.current_hour = hour;
    }

    /// Re-anchor the grid to the latest wall-clock hour. Leaves the user
    /// shift alone.
    pub fn resync(&mut self) {
        self.hour = self.current_hour;
    }

    /// Move the user shift one hour. Down shows later hours, up earlier.
    pub fn adjust_shift(&mut self, direction: ShiftDirection) {
        let delta = match direction {
            ShiftDirection::Down => 1,
            ShiftDirection::Up => -1,
        };
        // rem_euclid keeps the shift in [0, 24) even when the intermediate
        // goes negative; plain % would leak a negative value here
        self.shift = (self.shift + delta).rem_euclid(HOURS_PER_DAY);
        debug!("Shift adjusted to {}h", self.shift);
    }

    /// Drop the user shift and re-anchor to the wall clock
    pub fn reset(&mut self) {
        self.shift = 0;
        self.resync();
        debug!("Shift reset, grid synced to hour {}", self.hour);
    }

    /// Compute a single cell
    pub fn cell(&self, row: usize, col: usize) -> Cell {
        let hour = self.cell_hour(row, COL_OFFSETS[col]);
        let reference = self.cell_hour(row, COL_OFFSETS[REFERENCE_COL]);
        let shade = if reference >= NIGHT_START || reference <= NIGHT_END {
            Shade::Dark
        } else {
            Shade::Light
        };
        Cell {
            hour: hour as u8,
            shade,
        }
    }

    /// Compute all cells, in row-major order
    pub fn cells(&self) -> [[Cell; COL_COUNT]; ROW_COUNT] {
        let mut cells = [[Cell::default(); COL_COUNT]; ROW_COUNT];
        for (row, col) in (0..ROW_COUNT).cartesian_product(0..COL_COUNT) {
            cells[row][col] = self.cell(row, col);
        }
        cells
    }

    fn cell_hour(&self, row: usize, col_offset: i32) -> i32 {
        (self.hour as i32 + self.shift + col_offset + self.row_offsets[row])
            .rem_euclid(HOURS_PER_DAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    /// Build a grid with the given row offsets, synced to `hour`
    fn grid(row_offsets: [i32; ROW_COUNT], hour: u32) -> TimeGrid {
        let rows: IndexMap<String, i32> = row_offsets
            .iter()
            .enumerate()
            .map(|(row, &offset)| (format!("Z{row}"), offset))
            .collect();
        let config = Config {
            display_port: String::new(),
            rows,
        };
        TimeGrid::new(&config, hour)
    }

    #[test]
    fn test_hours_in_range() {
        // Extreme offsets in both directions, every hour, every shift
        let mut grid = grid([-24, -13, 0, 13, 24], 0);
        for hour in 0..24 {
            grid.clock_tick(hour);
            grid.resync();
            for _ in 0..48 {
                grid.adjust_shift(ShiftDirection::Up);
                for row in grid.cells() {
                    for cell in row {
                        assert!(cell.hour < 24, "hour {} out of range", cell.hour);
                    }
                }
            }
        }
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let grid = grid([0, 15, 18, 4, 7], 9);
        assert_eq!(grid.cells(), grid.cells());
    }

    #[test]
    fn test_shift_round_trip() {
        let mut grid = grid([0, 15, 18, 4, 7], 21);
        for _ in 0..24 {
            let shift_before = grid.shift;
            let cells_before = grid.cells();
            grid.adjust_shift(ShiftDirection::Up);
            grid.adjust_shift(ShiftDirection::Down);
            assert_eq!(grid.shift, shift_before);
            assert_eq!(grid.cells(), cells_before);
            // Walk the starting point around the whole range
            grid.adjust_shift(ShiftDirection::Down);
        }
    }

    #[test]
    fn test_shade_boundaries() {
        // Row offsets put the reference hour of each row right at the
        // dark/light boundaries: 18 and 6 are dark, 17 and 7 are light
        let grid = grid([18, 6, 17, 7, 0], 0);
        let cells = grid.cells();
        assert_eq!(cells[0][1].hour, 18);
        assert_eq!(cells[0][1].shade, Shade::Dark);
        assert_eq!(cells[1][1].hour, 6);
        assert_eq!(cells[1][1].shade, Shade::Dark);
        assert_eq!(cells[2][1].hour, 17);
        assert_eq!(cells[2][1].shade, Shade::Light);
        assert_eq!(cells[3][1].hour, 7);
        assert_eq!(cells[3][1].shade, Shade::Light);
    }

    #[test]
    fn test_shade_follows_middle_column() {
        // Reference hour 18: the left neighbor reads 17 but still renders
        // dark, because the row's shade comes from the middle column alone
        let grid = grid([18, 0, 0, 0, 0], 0);
        let row = grid.cells()[0];
        assert_eq!(row[0].hour, 17);
        assert!(row.iter().all(|cell| cell.shade == Shade::Dark));
    }

    #[test]
    fn test_local_row_reads_around_now() {
        let grid = grid([0, 15, 18, 4, 7], 10);
        let row = grid.cells()[0];
        assert_eq!(row.map(|cell| cell.hour), [9, 10, 11]);
        assert_eq!(row[1].shade, Shade::Light);
    }

    #[test]
    fn test_remote_rows() {
        let grid = grid([0, 15, 18, 4, 7], 10);
        let cells = grid.cells();
        // Offset 7: middle cell 17, still daytime
        assert_eq!(cells[4][1].hour, 17);
        assert_eq!(cells[4][1].shade, Shade::Light);
        // Offset 18: middle cell (10 + 18) % 24 = 4, night
        assert_eq!(cells[2][1].hour, 4);
        assert_eq!(cells[2][1].shade, Shade::Dark);
    }

    #[test]
    fn test_shift_wraps_past_midnight() {
        let mut grid = grid([0, 15, 18, 4, 7], 23);
        grid.adjust_shift(ShiftDirection::Down);
        grid.adjust_shift(ShiftDirection::Down);
        // (23 + 2 - 1) % 24 = 0
        assert_eq!(grid.cells()[0][0].hour, 0);
    }

    #[test]
    fn test_tick_leaves_cells_stale() {
        let mut grid = grid([0, 15, 18, 4, 7], 10);
        let before = grid.cells();
        grid.clock_tick(11);
        assert_eq!(grid.cells(), before);
        assert_eq!(grid.current_hour, 11);
        assert_eq!(grid.hour, 10);
    }

    #[test]
    fn test_reset() {
        let mut grid = grid([0, 15, 18, 4, 7], 10);
        grid.adjust_shift(ShiftDirection::Up);
        grid.adjust_shift(ShiftDirection::Up);
        grid.clock_tick(13);
        grid.reset();
        assert_eq!(grid.shift, 0);
        assert_eq!(grid.hour, 13);
        assert_eq!(grid.cells()[0][1].hour, 13);
    }

    #[test]
    fn test_resync_keeps_shift() {
        let mut grid = grid([0, 15, 18, 4, 7], 10);
        grid.adjust_shift(ShiftDirection::Down);
        grid.clock_tick(12);
        grid.resync();
        assert_eq!(grid.hour, 12);
        assert_eq!(grid.shift, 1);
    }
}
