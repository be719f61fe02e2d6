use std::collections::VecDeque;

use Direction::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i16,
    pub y: i16,
}

impl Position {
    pub fn new(x: i16, y: i16) -> Self {
        Position { x, y }
    }

    /// The neighbouring cell one step away in `direction`.
    pub fn moved(self, direction: Direction) -> Position {
        let (dx, dy) = match direction {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        };

        Position::new(self.x + dx, self.y + dy)
    }
}

/// Body segments, head first. Never empty.
pub struct Snake {
    body: VecDeque<Position>,
}

impl Snake {
    pub fn new(start: Position) -> Self {
        let mut body = VecDeque::new();
        body.push_back(start);
        Snake { body }
    }

    pub fn head(&self) -> Position {
        // The body always holds at least one segment
        self.body[0]
    }

    pub fn body(&self) -> impl Iterator<Item = &Position> + '_ {
        self.body.iter()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn contains(&self, pos: &Position) -> bool {
        self.body.contains(pos)
    }

    pub fn move_to(&mut self, new_head: Position) {
        self.body.push_front(new_head);
    }

    pub fn remove_tail(&mut self) {
        if self.body.len() > 1 {
            self.body.pop_back();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Direction; 4] = [Up, Down, Left, Right];

    #[test]
    fn move_changes_exactly_one_coordinate_by_one() {
        let p = Position::new(7, 3);

        for &d in ALL.iter() {
            let q = p.moved(d);
            let (dx, dy) = ((q.x - p.x).abs(), (q.y - p.y).abs());
            assert_eq!(dx + dy, 1, "{:?} moved {:?} to {:?}", d, p, q);
        }

        assert_eq!(p.moved(Up), Position::new(7, 2));
        assert_eq!(p.moved(Down), Position::new(7, 4));
        assert_eq!(p.moved(Left), Position::new(6, 3));
        assert_eq!(p.moved(Right), Position::new(8, 3));
    }

    #[test]
    fn opposite_is_an_involution() {
        for &d in ALL.iter() {
            assert_ne!(d.opposite(), d);
            assert_eq!(d.opposite().opposite(), d);
        }
    }

    #[test]
    fn move_to_prepends_head() {
        let mut snake = Snake::new(Position::new(5, 5));
        snake.move_to(Position::new(6, 5));

        assert_eq!(snake.head(), Position::new(6, 5));
        assert_eq!(snake.body().copied().collect::<Vec<_>>(), vec![Position::new(6, 5), Position::new(5, 5)]);
    }

    #[test]
    fn remove_tail_keeps_one_segment() {
        let mut snake = Snake::new(Position::new(1, 1));
        snake.move_to(Position::new(2, 1));
        snake.move_to(Position::new(3, 1));

        for _ in 0..10 {
            snake.remove_tail();
        }

        assert_eq!(snake.len(), 1);
        assert_eq!(snake.head(), Position::new(3, 1));
    }
}
