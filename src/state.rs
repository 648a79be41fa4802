use std::time::Instant;

use rand::Rng;

use crate::config::{GRID_HEIGHT, GRID_WIDTH, TICK_INTERVAL};
use Direction::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    fn delta(self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }
}

pub struct GameState {
    snake: Vec<Point>, // head first
    direction: Direction,
    last_update: Option<Instant>,
    food: Point,
    game_over: bool,
}

impl GameState {
    pub fn new() -> Self {
        let center = Point::new(GRID_WIDTH / 2, GRID_HEIGHT / 2);
        let mut state = GameState {
            snake: vec![center],
            direction: Right,
            last_update: None,
            food: center,
            game_over: false,
        };
        state.spawn_food();
        state
    }

    /// No reversal guard: steering straight backwards is accepted and runs
    /// the snake into its own neck on the next step.
    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    pub fn tick(&mut self, now: Instant) {
        if self.game_over {
            return;
        }

        if let Some(last) = self.last_update {
            if now.duration_since(last) < TICK_INTERVAL {
                return;
            }
        }

        self.last_update = Some(now);
        self.step();
    }

    fn step(&mut self) {
        let head = self.snake[0];
        let (dx, dy) = self.direction.delta();
        let new_head = Point::new(head.x + dx, head.y + dy);

        if self.is_bad_collision(new_head) {
            // The fatal head is never committed; the board freezes as-is
            self.game_over = true;
            return;
        }

        self.snake.insert(0, new_head);

        if new_head == self.food {
            self.spawn_food();
        } else {
            self.snake.pop();
        }
    }

    // Column 0 counts as a wall while row 0 is playable
    fn is_bad_collision(&self, p: Point) -> bool {
        p.x <= 0
            || p.y < 0
            || p.x >= GRID_WIDTH
            || p.y >= GRID_HEIGHT
            || self.snake.contains(&p)
    }

    fn spawn_food(&mut self) {
        let mut rng = rand::thread_rng();
        self.food = Point::new(
            rng.gen_range(0..GRID_WIDTH),
            rng.gen_range(0..GRID_HEIGHT),
        );
    }

    pub fn snake(&self) -> &[Point] {
        &self.snake
    }

    pub fn food(&self) -> Point {
        self.food
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(snake: Vec<Point>, direction: Direction, food: Point) -> GameState {
        GameState { snake, direction, last_update: None, food, game_over: false }
    }

    fn in_bounds(p: Point) -> bool {
        p.x >= 0 && p.x < GRID_WIDTH && p.y >= 0 && p.y < GRID_HEIGHT
    }

    #[test]
    fn eating_grows_by_one_and_respawns_food() {
        let mut state = state_with(vec![Point::new(5, 5)], Right, Point::new(6, 5));
        state.step();

        assert_eq!(state.snake(), &[Point::new(6, 5), Point::new(5, 5)]);
        assert!(!state.is_game_over());
        assert!(in_bounds(state.food()));
    }

    #[test]
    fn moving_without_food_keeps_length() {
        let mut state = state_with(
            vec![Point::new(5, 5), Point::new(4, 5)],
            Right,
            Point::new(10, 10),
        );
        state.step();

        assert_eq!(state.snake(), &[Point::new(6, 5), Point::new(5, 5)]);
        assert_eq!(state.food(), Point::new(10, 10));
        assert!(!state.is_game_over());
    }

    #[test]
    fn left_wall_is_fatal_from_column_one() {
        // Column 0 already counts as a wall, and the fatal head is not
        // committed: the body keeps its last valid state.
        let mut state = state_with(vec![Point::new(1, 5)], Left, Point::new(10, 10));
        state.step();

        assert!(state.is_game_over());
        assert_eq!(state.snake(), &[Point::new(1, 5)]);
    }

    #[test]
    fn top_row_is_playable_but_leaving_it_is_fatal() {
        // Row 0 is inside the board, unlike column 0.
        let mut state = state_with(vec![Point::new(5, 1)], Up, Point::new(10, 10));
        state.step();
        assert!(!state.is_game_over());
        assert_eq!(state.snake()[0], Point::new(5, 0));

        let mut state = state_with(vec![Point::new(5, 0)], Up, Point::new(10, 10));
        state.step();
        assert!(state.is_game_over());
    }

    #[test]
    fn right_and_bottom_walls_are_fatal() {
        let mut state = state_with(
            vec![Point::new(GRID_WIDTH - 1, 5)],
            Right,
            Point::new(10, 10),
        );
        state.step();
        assert!(state.is_game_over());

        let mut state = state_with(
            vec![Point::new(5, GRID_HEIGHT - 1)],
            Down,
            Point::new(10, 10),
        );
        state.step();
        assert!(state.is_game_over());
    }

    #[test]
    fn reversing_into_own_neck_is_fatal() {
        // There is intentionally no reversal guard: turning straight
        // backwards is legal input and ends the game.
        let mut state = state_with(
            vec![Point::new(5, 5), Point::new(4, 5), Point::new(3, 5)],
            Right,
            Point::new(10, 10),
        );
        state.set_direction(Left);
        state.step();

        assert!(state.is_game_over());
        assert_eq!(state.snake().len(), 3);
    }

    #[test]
    fn direction_requests_overwrite_unconditionally() {
        let mut state = state_with(
            vec![Point::new(5, 5), Point::new(4, 5)],
            Right,
            Point::new(10, 10),
        );
        state.set_direction(Left);
        assert_eq!(state.direction(), Left);
    }

    #[test]
    fn collision_predicate_is_pure() {
        let state = state_with(
            vec![Point::new(5, 5), Point::new(4, 5)],
            Right,
            Point::new(1, 1),
        );
        let p = Point::new(4, 5);

        assert!(state.is_bad_collision(p));
        assert_eq!(state.is_bad_collision(p), state.is_bad_collision(p));
        assert!(!state.is_bad_collision(Point::new(6, 5)));
        assert_eq!(state.snake(), &[Point::new(5, 5), Point::new(4, 5)]);
    }

    #[test]
    fn ticks_are_ignored_after_game_over() {
        let mut state = state_with(vec![Point::new(1, 5)], Left, Point::new(10, 10));
        let t0 = Instant::now();
        state.tick(t0);
        assert!(state.is_game_over());

        let body = state.snake().to_vec();
        let food = state.food();
        for i in 1..10u32 {
            state.tick(t0 + TICK_INTERVAL * i);
        }

        assert!(state.is_game_over());
        assert_eq!(state.snake(), &body[..]);
        assert_eq!(state.food(), food);
    }

    #[test]
    fn tick_gate_swallows_early_frames() {
        let mut state = state_with(vec![Point::new(5, 5)], Right, Point::new(20, 20));
        let t0 = Instant::now();

        // The first tick steps immediately, as there is no previous update.
        state.tick(t0);
        assert_eq!(state.snake()[0], Point::new(6, 5));

        state.tick(t0 + TICK_INTERVAL / 2);
        assert_eq!(state.snake()[0], Point::new(6, 5));

        state.tick(t0 + TICK_INTERVAL);
        assert_eq!(state.snake()[0], Point::new(7, 5));
    }

    #[test]
    fn length_never_shrinks_and_grows_only_on_food() {
        let mut state = state_with(vec![Point::new(2, 5)], Right, Point::new(4, 5));
        let t0 = Instant::now();
        let mut prev_len = state.snake().len();
        let mut ticks = 0u32;

        while !state.is_game_over() {
            let food = state.food();
            ticks += 1;
            state.tick(t0 + TICK_INTERVAL * ticks);

            let len = state.snake().len();
            assert!(len == prev_len || len == prev_len + 1);
            if len == prev_len + 1 {
                assert_eq!(state.snake()[0], food);
            }
            prev_len = len;
        }
    }

    #[test]
    fn new_game_starts_centered_heading_right() {
        let state = GameState::new();

        assert_eq!(
            state.snake(),
            &[Point::new(GRID_WIDTH / 2, GRID_HEIGHT / 2)]
        );
        assert_eq!(state.direction(), Right);
        assert!(!state.is_game_over());
        assert!(in_bounds(state.food()));
    }

    #[test]
    fn spawned_food_is_always_inside_the_grid() {
        let mut state = state_with(vec![Point::new(5, 5)], Right, Point::new(0, 0));
        for _ in 0..200 {
            state.spawn_food();
            assert!(in_bounds(state.food()));
        }
    }
}
