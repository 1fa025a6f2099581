use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use house::HideAndSeekGame;
use tracing::{error, info, warn};

use super::bootstrap::AppWiring;

pub(crate) fn run(app: AppWiring) -> ExitCode {
    let AppWiring { paths, mut game } = app;
    info!(saves = %paths.saves_dir.display(), "console_ready");

    let stdin = io::stdin();
    let stdout = io::stdout();
    if let Err(err) = run_console(&mut game, stdin.lock(), stdout.lock()) {
        error!(error = %err, "console_failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Reads commands until `exit` or end of input. Game errors are shown to the
/// player and the loop carries on.
fn run_console(
    game: &mut HideAndSeekGame,
    mut input: impl BufRead,
    mut output: impl Write,
) -> io::Result<()> {
    let mut line = String::new();
    loop {
        match game.status() {
            Ok(status) => writeln!(output, "\n{status}")?,
            Err(err) => writeln!(output, "\n{err}")?,
        }
        write!(output, "{}", game.prompt())?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Ok(());
        }
        let command = line.trim();
        if command.eq_ignore_ascii_case("exit") {
            return Ok(());
        }

        match game.parse_input(command) {
            Ok(message) => writeln!(output, "{message}")?,
            Err(err) => {
                warn!(input = command, kind = ?err.kind(), "command_rejected");
                writeln!(output, "{err}")?;
            }
        }

        if let Some(message) = game.game_over_message() {
            writeln!(output, "\n{message}")?;
            if let Err(err) = game.restart() {
                writeln!(output, "{err}")?;
                return Ok(());
            }
            writeln!(output, "Here's a new game!")?;
        }
    }
}

#[cfg(test)]
mod tests {
    use house::{default_house, FileStore, FixedIndex, MemoryFileStore, SequenceIndex};

    use super::*;

    fn transcript(game: &mut HideAndSeekGame, script: &str) -> String {
        let mut output = Vec::new();
        run_console(game, script.as_bytes(), &mut output).expect("console");
        String::from_utf8(output).expect("utf8")
    }

    fn roster(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn console_plays_until_exit() {
        let mut game = HideAndSeekGame::with_house(
            Box::new(MemoryFileStore::new()),
            Box::new(SequenceIndex::new([7, 5])),
            default_house().expect("house"),
            roster(&["Joe", "Bob"]),
        )
        .expect("game");

        let text = transcript(&mut game, "out\nin\nEast\nnw\ncheck\nup\nexit\n");
        assert!(text.contains("Moving Out"));
        assert!(text.contains("You found 1 opponent hiding next to the stove"));
        assert!(text.contains("You have found 1 of 2 opponents: Joe"));
        assert!(text.contains("Cannot perform action because there is no exit up"));
        assert!(text.contains("6: Which direction do you want to go (or type 'check'): "));
    }

    #[test]
    fn winning_starts_a_new_game() {
        let mut game = HideAndSeekGame::with_house(
            Box::new(MemoryFileStore::new()),
            Box::new(FixedIndex(10)),
            default_house().expect("house"),
            roster(&["Joe"]),
        )
        .expect("game");

        let text = transcript(&mut game, "out\ncheck\n");
        assert!(text.contains("You won the game in 2 moves!"));
        assert!(text.contains("Here's a new game!"));
        assert_eq!(game.state().move_number(), 1);
        assert!(game.state().found().is_empty());
    }

    #[test]
    fn save_writes_through_the_injected_store() {
        let mut game = HideAndSeekGame::with_house(
            Box::new(MemoryFileStore::new()),
            Box::new(FixedIndex(0)),
            default_house().expect("house"),
            roster(&["Joe"]),
        )
        .expect("game");

        let text = transcript(&mut game, "save first\nsave bad/name\n");
        assert!(text.contains("Saved current game to first"));
        assert!(text.contains("bad/name"));
        assert!(game.store().exists("first.game.json"));
    }
}
