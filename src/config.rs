//! Fixed settings for the board and the score database.

use std::time::Duration;

use crate::snake::{Direction, Point};

#[derive(Clone, Debug)]
pub struct GameConfig {
    /// Playfield width in board units.
    pub width: i32,
    /// Playfield height in board units.
    pub height: i32,
    /// Side of one grid cell; the snake moves one cell per tick.
    pub cell: i32,
    pub ticks_per_second: u32,
    /// Head first.
    pub start_body: Vec<Point>,
    pub start_direction: Direction,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            width: 700,
            height: 500,
            cell: 20,
            ticks_per_second: 5,
            start_body: vec![Point::new(100, 50), Point::new(80, 50), Point::new(60, 50)],
            start_direction: Direction::Right,
        }
    }
}

impl GameConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.ticks_per_second.max(1)))
    }

    pub fn columns(&self) -> i32 {
        self.width / self.cell
    }

    pub fn rows(&self) -> i32 {
        self.height / self.cell
    }

    /// Offset of the snake's lattice inside a cell. The default start head
    /// sits at y = 50, ten units off a multiple of the cell size, and the head
    /// only ever moves by whole cells. Food placed at plain multiples of the
    /// cell would never share a y with the head and could never be eaten, so
    /// food is shifted onto the same lattice.
    pub fn lattice_origin(&self) -> Point {
        let head = self.start_body.first().copied().unwrap_or_default();
        Point::new(head.x.rem_euclid(self.cell), head.y.rem_euclid(self.cell))
    }

    pub fn in_bounds(&self, p: Point) -> bool {
        (0..self.width).contains(&p.x) && (0..self.height).contains(&p.y)
    }

    /// Column and row of the cell holding `p`, if it is on the board.
    pub fn cell_of(&self, p: Point) -> Option<(u16, u16)> {
        let (col, row) = (p.x.div_euclid(self.cell), p.y.div_euclid(self.cell));
        if !(0..self.columns()).contains(&col) || !(0..self.rows()).contains(&row) {
            return None;
        }
        Some((u16::try_from(col).ok()?, u16::try_from(row).ok()?))
    }
}

#[derive(Clone, Debug)]
pub struct StoreConfig {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    pub password: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            host: "localhost".to_string(),
            port: 5432,
            dbname: "snake".to_string(),
            user: "postgres".to_string(),
            password: "postgres".to_string(),
        }
    }
}

impl StoreConfig {
    pub fn to_pg_config(&self) -> postgres::Config {
        let mut config = postgres::Config::new();
        config
            .host(&self.host)
            .port(self.port)
            .dbname(&self.dbname)
            .user(&self.user)
            .password(&self.password);
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_board_is_35_by_25_cells() {
        let config = GameConfig::default();
        assert_eq!(config.columns(), 35);
        assert_eq!(config.rows(), 25);
        assert_eq!(config.tick_interval(), Duration::from_millis(200));
    }

    #[test]
    fn lattice_follows_the_start_head() {
        let config = GameConfig::default();
        assert_eq!(config.lattice_origin(), Point::new(0, 10));
    }

    #[test]
    fn bounds_are_half_open() {
        let config = GameConfig::default();
        assert!(config.in_bounds(Point::new(0, 0)));
        assert!(config.in_bounds(Point::new(680, 490)));
        assert!(!config.in_bounds(Point::new(700, 50)));
        assert!(!config.in_bounds(Point::new(100, 500)));
        assert!(!config.in_bounds(Point::new(-20, 50)));
        assert!(!config.in_bounds(Point::new(100, -10)));
    }

    #[test]
    fn points_map_to_cells() {
        let config = GameConfig::default();
        assert_eq!(config.cell_of(Point::new(100, 50)), Some((5, 2)));
        assert_eq!(config.cell_of(Point::new(680, 490)), Some((34, 24)));
        assert_eq!(config.cell_of(Point::new(700, 50)), None);
        assert_eq!(config.cell_of(Point::new(-20, 50)), None);
    }
}
