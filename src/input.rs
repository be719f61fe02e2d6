use std::time::{Duration, Instant};

use crate::snake::Direction;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Arrow(Direction),
    Interrupt,
}

/// What one polling window decided for the next update.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Poll {
    Keep,
    Steer(Direction),
    Interrupted,
}

pub trait InputSource {
    /// Waits up to `timeout` for a recognised key. `None` once the timeout runs out.
    fn poll_key(&mut self, timeout: Duration) -> crossterm::Result<Option<Key>>;

    /// Blocks until any key is pressed.
    fn wait_any_key(&mut self) -> crossterm::Result<()>;

    fn pause(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// The direction to take when `pressed` arrives while heading `current`,
/// or `None` if it would turn the head back into the neck.
pub fn steer(current: Direction, pressed: Direction) -> Option<Direction> {
    if pressed == current.opposite() {
        None
    } else {
        Some(pressed)
    }
}

/// Drains input for `budget`. The first accepted arrow wins and the rest of
/// the window is consumed without effect.
pub fn poll_window<I: InputSource>(input: &mut I, current: Direction, budget: Duration) -> crossterm::Result<Poll> {
    let started = Instant::now();
    let mut poll = Poll::Keep;

    loop {
        let remaining = match budget.checked_sub(started.elapsed()) {
            Some(left) if left > Duration::from_millis(0) => left,
            _ => break,
        };

        match input.poll_key(remaining)? {
            None => break,
            Some(Key::Interrupt) => return Ok(Poll::Interrupted),
            Some(Key::Arrow(pressed)) => {
                if poll != Poll::Keep {
                    continue;
                }

                if let Some(dir) = steer(current, pressed) {
                    log::debug!("Steering {:?} -> {:?}", current, dir);
                    poll = Poll::Steer(dir);
                }
            }
        }
    }

    Ok(poll)
}

/// Hands out queued keys instantly, then reports the window as elapsed.
#[cfg(test)]
pub struct ScriptedInput {
    keys: std::collections::VecDeque<Key>,
}

#[cfg(test)]
impl ScriptedInput {
    pub fn new(keys: &[Key]) -> Self {
        ScriptedInput { keys: keys.iter().copied().collect() }
    }

    pub fn remaining(&self) -> usize {
        self.keys.len()
    }
}

#[cfg(test)]
impl InputSource for ScriptedInput {
    fn poll_key(&mut self, _timeout: Duration) -> crossterm::Result<Option<Key>> {
        Ok(self.keys.pop_front())
    }

    fn wait_any_key(&mut self) -> crossterm::Result<()> {
        self.keys.pop_front();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snake::Direction::*;

    const BUDGET: Duration = Duration::from_millis(500);

    fn window(current: Direction, keys: &[Key]) -> Poll {
        let mut input = ScriptedInput::new(keys);
        poll_window(&mut input, current, BUDGET).unwrap()
    }

    #[test]
    fn reversal_is_rejected() {
        assert_eq!(steer(Right, Left), None);
        assert_eq!(steer(Left, Right), None);
        assert_eq!(steer(Up, Down), None);
        assert_eq!(steer(Down, Up), None);
    }

    #[test]
    fn perpendicular_and_same_are_accepted() {
        assert_eq!(steer(Right, Up), Some(Up));
        assert_eq!(steer(Right, Down), Some(Down));
        assert_eq!(steer(Right, Right), Some(Right));
        assert_eq!(steer(Up, Left), Some(Left));
        assert_eq!(steer(Up, Right), Some(Right));
    }

    #[test]
    fn no_keys_keeps_direction() {
        assert_eq!(window(Right, &[]), Poll::Keep);
    }

    #[test]
    fn first_accepted_key_wins() {
        let keys = [Key::Arrow(Up), Key::Arrow(Down), Key::Arrow(Left)];
        assert_eq!(window(Right, &keys), Poll::Steer(Up));
    }

    #[test]
    fn rejected_key_does_not_use_up_the_window() {
        let keys = [Key::Arrow(Left), Key::Arrow(Down)];
        assert_eq!(window(Right, &keys), Poll::Steer(Down));
    }

    #[test]
    fn only_reversals_keep_direction() {
        assert_eq!(window(Up, &[Key::Arrow(Down), Key::Arrow(Down)]), Poll::Keep);
    }

    #[test]
    fn later_keys_are_drained() {
        let mut input = ScriptedInput::new(&[Key::Arrow(Up), Key::Arrow(Left), Key::Arrow(Down)]);
        let poll = poll_window(&mut input, Right, BUDGET).unwrap();

        assert_eq!(poll, Poll::Steer(Up));
        assert_eq!(input.remaining(), 0);
    }

    #[test]
    fn interrupt_ends_the_window() {
        let mut input = ScriptedInput::new(&[Key::Arrow(Up), Key::Interrupt, Key::Arrow(Down)]);

        assert_eq!(poll_window(&mut input, Right, BUDGET).unwrap(), Poll::Interrupted);
        assert_eq!(input.remaining(), 1);
    }

    #[test]
    fn zero_budget_reads_nothing() {
        let mut input = ScriptedInput::new(&[Key::Arrow(Up)]);

        assert_eq!(poll_window(&mut input, Right, Duration::from_millis(0)).unwrap(), Poll::Keep);
        assert_eq!(input.remaining(), 1);
    }
}
