use tracing::{debug, info};

use crate::content::{load_house, read_logical, save_file_path, validate_file_name, FileStore};
use crate::error::{HouseError, HouseResult};
use crate::random::IndexSource;
use crate::world::{Direction, HouseGraph, Location};

use super::persistence::{
    parse_saved_game_json, restore_game_state, serialize_saved_game, SavedGame,
};
use super::state::{CheckOutcome, GameState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Check,
    Save(String),
    Load(String),
    /// Start over, optionally in a different house.
    Restart(Option<String>),
}

/// Turns one line of player input into a command. Directions accept any case
/// and the usual abbreviations.
pub fn parse_command(input: &str) -> HouseResult<Command> {
    let trimmed = input.trim();
    let (verb, argument) = match trimmed.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, Some(rest.trim())),
        None => (trimmed, None),
    };
    let required = |what: &str| {
        argument
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .ok_or_else(|| HouseError::InvalidOperation(format!("'{verb}' needs a {what}")))
    };

    match verb.to_ascii_lowercase().as_str() {
        "check" if argument.is_none() => Ok(Command::Check),
        "save" => Ok(Command::Save(required("file name")?)),
        "load" => Ok(Command::Load(required("file name")?)),
        "new" => Ok(Command::Restart(
            argument.filter(|value| !value.is_empty()).map(str::to_string),
        )),
        _ => trimmed
            .parse::<Direction>()
            .map(Command::Move)
            .map_err(|_| {
                HouseError::InvalidOperation(format!("'{trimmed}' is not a valid direction"))
            }),
    }
}

/// One player's session: a house, the actors hidden in it, and the injected
/// file and randomness capabilities.
pub struct HideAndSeekGame {
    store: Box<dyn FileStore>,
    rng: Box<dyn IndexSource>,
    house: HouseGraph,
    roster: Vec<String>,
    state: GameState,
}

impl HideAndSeekGame {
    /// Loads `house_file_name` from `store` and hides `roster` in it.
    pub fn new(
        store: Box<dyn FileStore>,
        rng: Box<dyn IndexSource>,
        house_file_name: &str,
        roster: Vec<String>,
    ) -> HouseResult<Self> {
        let house = load_house(&*store, house_file_name)?;
        Self::with_house(store, rng, house, roster)
    }

    pub fn with_house(
        store: Box<dyn FileStore>,
        mut rng: Box<dyn IndexSource>,
        mut house: HouseGraph,
        roster: Vec<String>,
    ) -> HouseResult<Self> {
        house.validate()?;
        let state = GameState::new_game(&mut house, &roster, &mut *rng)?;
        info!(
            house = house.name(),
            opponent_count = roster.len(),
            "game_started"
        );
        Ok(Self {
            store,
            rng,
            house,
            roster,
            state,
        })
    }

    pub fn house(&self) -> &HouseGraph {
        &self.house
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn store(&self) -> &dyn FileStore {
        &*self.store
    }

    pub fn current_location(&self) -> HouseResult<&Location> {
        self.state.current(&self.house)
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    pub fn run(&mut self, command: Command) -> HouseResult<String> {
        match command {
            Command::Move(direction) => self.move_player(direction),
            Command::Check => self.check(),
            Command::Save(name) => self.save(&name),
            Command::Load(name) => self.load(&name),
            Command::Restart(None) => {
                self.restart()?;
                Ok(format!("Started a new game in {}", self.house.name()))
            }
            Command::Restart(Some(house_file_name)) => {
                self.restart_with(Some(&house_file_name), None)?;
                Ok(format!("Started a new game in {}", self.house.name()))
            }
        }
    }

    pub fn parse_input(&mut self, input: &str) -> HouseResult<String> {
        let command = parse_command(input)?;
        self.run(command)
    }

    pub fn move_player(&mut self, direction: Direction) -> HouseResult<String> {
        let arrived = self.state.move_to(&self.house, direction)?;
        debug!(direction = %direction, location = arrived, "player_moved");
        Ok(format!("Moving {direction}"))
    }

    pub fn check(&mut self) -> HouseResult<String> {
        let message = match self.state.check_current_location(&mut self.house)? {
            CheckOutcome::NoHidingPlace { location } => {
                format!("There is no hiding place in the {location}")
            }
            CheckOutcome::Searched { description, found } => match found.len() {
                0 => format!("Nobody was hiding {description}"),
                1 => format!("You found 1 opponent hiding {description}"),
                count => format!("You found {count} opponents hiding {description}"),
            },
        };
        if self.is_game_over() {
            info!(moves = self.moves_taken(), "game_won");
        }
        Ok(message)
    }

    /// Moves made so far, counting checks.
    pub fn moves_taken(&self) -> u32 {
        self.state.move_number().saturating_sub(1)
    }

    pub fn game_over_message(&self) -> Option<String> {
        self.is_game_over()
            .then(|| format!("You won the game in {} moves!", self.moves_taken()))
    }

    pub fn status(&self) -> HouseResult<String> {
        let here = self.current_location()?;
        let mut lines = vec![format!(
            "You are in the {}. You see the following exits:",
            here.name()
        )];
        for (direction, target) in here.exits() {
            let target = self.house.location(*target)?;
            lines.push(format!(" - the {} is {}", target.name(), direction.describe()));
        }
        if let Some(description) = here.hiding_description() {
            lines.push(format!("Someone could hide {description}"));
        }
        let found = self.state.found();
        if found.is_empty() {
            lines.push("You have not found any opponents".to_string());
        } else {
            let total = self.state.actor_count();
            lines.push(format!(
                "You have found {} of {total} opponent{}: {}",
                found.len(),
                if total == 1 { "" } else { "s" },
                found.join(", ")
            ));
        }
        Ok(lines.join("\n"))
    }

    pub fn prompt(&self) -> String {
        format!(
            "{}: Which direction do you want to go (or type 'check'): ",
            self.state.move_number()
        )
    }

    pub fn save(&mut self, name: &str) -> HouseResult<String> {
        validate_file_name("SaveFileName", name)?;
        let text = serialize_saved_game(&SavedGame::from_state(&self.state))?;
        self.store.write_all(&save_file_path(name), &text)?;
        info!(
            save = name,
            house = self.house.file_name(),
            move_number = self.state.move_number(),
            "game_saved"
        );
        Ok(format!("Saved current game to {name}"))
    }

    /// Restores a saved game, loading its house first when it differs from the
    /// current one. The running game is untouched unless everything validates.
    pub fn load(&mut self, name: &str) -> HouseResult<String> {
        validate_file_name("SaveFileName", name)?;
        let raw = read_logical(&*self.store, name, &save_file_path(name))?;
        let saved = parse_saved_game_json(&raw)?;
        validate_file_name("HouseFileName", &saved.house_file_name)?;

        let mut house = if saved.house_file_name == self.house.file_name() {
            self.house.clone()
        } else {
            load_house(&*self.store, &saved.house_file_name)?
        };
        let state = restore_game_state(&mut house, &saved)?;

        self.roster = state.actors().map(str::to_string).collect();
        self.house = house;
        self.state = state;
        info!(
            save = name,
            house = self.house.file_name(),
            move_number = self.state.move_number(),
            "game_restored"
        );
        Ok(format!("Loaded game from {name}"))
    }

    /// Same house, same opponents, fresh hiding places.
    pub fn restart(&mut self) -> HouseResult<()> {
        self.restart_with(None, None)
    }

    /// Starts over, optionally in another house and/or with another roster.
    pub fn restart_with(
        &mut self,
        house_file_name: Option<&str>,
        roster: Option<Vec<String>>,
    ) -> HouseResult<()> {
        let mut house = match house_file_name {
            Some(file_name) => load_house(&*self.store, file_name)?,
            None => self.house.clone(),
        };
        let roster = roster.unwrap_or_else(|| self.roster.clone());
        let state = GameState::new_game(&mut house, &roster, &mut *self.rng)?;

        self.house = house;
        self.roster = roster;
        self.state = state;
        info!(
            house = self.house.file_name(),
            opponent_count = self.roster.len(),
            "game_restarted"
        );
        Ok(())
    }
}
