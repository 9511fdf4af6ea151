use std::collections::VecDeque;

use Direction::*;
use MoveResult::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    /// Steering priority when several keys are held.
    pub const PRIORITY: [Direction; 4] = [Up, Down, Left, Right];

    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    fn offset(self, step: i32) -> (i32, i32) {
        match self {
            Up => (0, -step),
            Down => (0, step),
            Left => (-step, 0),
            Right => (step, 0),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveResult {
    Ate,
    Moved,
}

#[derive(Clone, Debug)]
pub struct Snake {
    body: VecDeque<Point>, // head first
    direction: Direction,
}

impl Snake {
    pub fn new(body: impl IntoIterator<Item = Point>, direction: Direction) -> Self {
        Snake { body: body.into_iter().collect(), direction }
    }

    pub fn body(&self) -> impl Iterator<Item = &Point> + '_ {
        self.body.iter()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn head(&self) -> Point {
        self.body.front().copied().unwrap_or_default()
    }

    pub fn get_direction(&self) -> Direction {
        self.direction
    }

    /// Ignores a request to reverse onto the neck.
    pub fn set_direction(&mut self, new_direction: Direction) {
        if new_direction != self.direction.opposite() {
            self.direction = new_direction;
        }
    }

    /// Moves one cell. The tail stays in place when the new head lands on `food`.
    pub fn move_step(&mut self, step: i32, food: Point) -> MoveResult {
        let old_head = self.head();
        let (dx, dy) = self.direction.offset(step);
        let new_head = Point::new(old_head.x + dx, old_head.y + dy);

        self.body.push_front(new_head);

        if new_head == food {
            return Ate;
        }

        self.body.pop_back();
        Moved
    }

    pub fn bites_itself(&self) -> bool {
        let head = self.head();
        self.body.iter().skip(1).any(|seg| *seg == head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> Snake {
        Snake::new([Point::new(100, 50), Point::new(80, 50), Point::new(60, 50)], Right)
    }

    #[test]
    fn step_right_drops_the_tail() {
        let mut snake = start();
        let res = snake.move_step(20, Point::new(300, 300));

        assert_eq!(res, Moved);
        let body: Vec<Point> = snake.body().copied().collect();
        assert_eq!(body, vec![Point::new(120, 50), Point::new(100, 50), Point::new(80, 50)]);
    }

    #[test]
    fn eating_keeps_the_tail() {
        let mut snake = start();
        let res = snake.move_step(20, Point::new(120, 50));

        assert_eq!(res, Ate);
        assert_eq!(snake.head(), Point::new(120, 50));
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.body().last(), Some(&Point::new(60, 50)));
    }

    #[test]
    fn reversal_is_ignored() {
        let mut snake = start();
        snake.set_direction(Left);
        assert_eq!(snake.get_direction(), Right);

        snake.set_direction(Up);
        assert_eq!(snake.get_direction(), Up);
        snake.set_direction(Down);
        assert_eq!(snake.get_direction(), Up);
    }

    #[test]
    fn turning_into_the_body_is_a_bite() {
        let mut snake = Snake::new(
            [
                Point::new(40, 0),
                Point::new(20, 0),
                Point::new(20, 20),
                Point::new(40, 20),
                Point::new(60, 20),
            ],
            Down,
        );
        assert!(!snake.bites_itself());

        snake.move_step(20, Point::new(500, 500));
        assert_eq!(snake.head(), Point::new(40, 20));
        assert!(snake.bites_itself());
    }

    #[test]
    fn following_the_tail_is_not_a_bite() {
        // A 2x2 loop: the head moves into the cell the tail just left.
        let mut snake = Snake::new(
            [Point::new(0, 0), Point::new(20, 0), Point::new(20, 20), Point::new(0, 20)],
            Down,
        );
        snake.move_step(20, Point::new(500, 500));
        assert_eq!(snake.head(), Point::new(0, 20));
        assert!(!snake.bites_itself());
    }
}
