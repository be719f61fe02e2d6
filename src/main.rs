mod game;
mod input;
mod term;
mod snake;

use std::io::IsTerminal;

use color_eyre::eyre::WrapErr;

use game::{GameConfig, Outcome, SnakeGame};
use term::TermManager;

pub type TermInt = u16;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    if logging_allowed(std::io::stderr().is_terminal()) {
        pretty_env_logger::init();
    }

    let config = GameConfig::default();
    let mut term = TermManager::new();

    if let Err(e) = term.setup(config.width as TermInt, config.height as TermInt) {
        // Best effort, the setup error is the one worth reporting
        let _ = term.restore();
        return Err(e).wrap_err("Error setting up the terminal");
    }

    let mut game = SnakeGame::new(term, config, rand::thread_rng());

    // The terminal has to be handed back even if the game loop failed
    let played = game.run();
    let restored = game.term_mut().restore();

    if let Some(line) = farewell(&finish(played, restored)?) {
        println!("{}", line);
    }

    Ok(())
}

/// Log lines on the game's own tty would be drawn over the board.
fn logging_allowed(stderr_is_tty: bool) -> bool {
    !stderr_is_tty
}

/// A failed game outranks a failed restore.
fn finish(played: crossterm::Result<Outcome>, restored: crossterm::Result<()>) -> color_eyre::Result<Outcome> {
    let outcome = played.wrap_err("Error while playing")?;
    restored.wrap_err("Error restoring the terminal")?;
    Ok(outcome)
}

/// What is left on the normal screen. A finished game already showed its
/// score on the board, only a quit one still needs reporting.
fn farewell(outcome: &Outcome) -> Option<String> {
    match outcome {
        Outcome::Quit { .. } => Some(format!("Quit, Score: {}", outcome.score())),
        Outcome::GameOver { .. } | Outcome::Won { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn failure(msg: &str) -> crossterm::ErrorKind {
        crossterm::ErrorKind::IoError(io::Error::new(io::ErrorKind::Other, msg.to_string()))
    }

    #[test]
    fn run_error_is_reported_before_restore_error() {
        let err = finish(Err(failure("lost tty")), Err(failure("raw mode"))).unwrap_err();
        assert_eq!(err.to_string(), "Error while playing");
    }

    #[test]
    fn restore_error_surfaces_after_a_clean_game() {
        let err = finish(Ok(Outcome::GameOver { score: 7 }), Err(failure("raw mode"))).unwrap_err();
        assert_eq!(err.to_string(), "Error restoring the terminal");
    }

    #[test]
    fn clean_game_passes_the_outcome_through() {
        let outcome = finish(Ok(Outcome::Won { score: 9 }), Ok(())).unwrap();
        assert_eq!(outcome, Outcome::Won { score: 9 });
    }

    #[test]
    fn finished_games_are_not_reported_twice() {
        assert_eq!(farewell(&Outcome::GameOver { score: 6 }), None);
        assert_eq!(farewell(&Outcome::Won { score: 140 }), None);
        assert_eq!(farewell(&Outcome::Quit { score: 5 }), Some("Quit, Score: 5".to_string()));
    }

    #[test]
    fn logging_stays_off_the_game_tty() {
        assert!(!logging_allowed(true));
        assert!(logging_allowed(false));
    }
}
