use std::collections::HashSet;

use tracing::debug;

use crate::error::{HouseError, HouseResult};
use crate::random::IndexSource;
use crate::world::{require_non_blank, Direction, HouseGraph, Location};

/// What a "check" turned up at the player's location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    NoHidingPlace { location: String },
    Searched {
        description: String,
        found: Vec<String>,
    },
}

/// Progress of one play-through against a particular house.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    house_file_name: String,
    current_location: String,
    move_number: u32,
    hiding_places: Vec<(String, String)>,
    found: Vec<String>,
}

impl GameState {
    /// Hides every actor of `roster` at a random hiding spot (one draw per actor,
    /// in roster order) and puts the player at the entry.
    pub fn new_game(
        house: &mut HouseGraph,
        roster: &[String],
        rng: &mut dyn IndexSource,
    ) -> HouseResult<Self> {
        validate_roster(roster)?;
        house.clear_all_hiding_spots();

        let mut hiding_places = Vec::with_capacity(roster.len());
        for actor in roster {
            let spot = house.random_hiding_spot(rng)?;
            house.hide(spot, actor)?;
            let spot_name = house.location(spot)?.name().to_string();
            debug!(actor = %actor, spot = %spot_name, "opponent_hidden");
            hiding_places.push((actor.clone(), spot_name));
        }

        Ok(Self {
            house_file_name: house.file_name().to_string(),
            current_location: house.entry_location().name().to_string(),
            move_number: 1,
            hiding_places,
            found: Vec::new(),
        })
    }

    /// Builds a state from already validated parts.
    pub(crate) fn from_parts(
        house_file_name: String,
        current_location: String,
        move_number: u32,
        hiding_places: Vec<(String, String)>,
        found: Vec<String>,
    ) -> Self {
        Self {
            house_file_name,
            current_location,
            move_number,
            hiding_places,
            found,
        }
    }

    pub fn house_file_name(&self) -> &str {
        &self.house_file_name
    }

    pub fn current_location(&self) -> &str {
        &self.current_location
    }

    pub fn move_number(&self) -> u32 {
        self.move_number
    }

    /// Every actor with the spot they hid in, found or not, in roster order.
    pub fn hiding_places(&self) -> &[(String, String)] {
        &self.hiding_places
    }

    pub fn actors(&self) -> impl Iterator<Item = &str> + '_ {
        self.hiding_places.iter().map(|(actor, _)| actor.as_str())
    }

    pub fn actor_count(&self) -> usize {
        self.hiding_places.len()
    }

    pub fn found(&self) -> &[String] {
        &self.found
    }

    pub fn is_found(&self, actor: &str) -> bool {
        self.found.iter().any(|found| found == actor)
    }

    pub fn is_game_over(&self) -> bool {
        self.found.len() == self.hiding_places.len()
    }

    pub fn current<'h>(&self, house: &'h HouseGraph) -> HouseResult<&'h Location> {
        house.location_by_name(&self.current_location)
    }

    pub fn move_to(&mut self, house: &HouseGraph, direction: Direction) -> HouseResult<&str> {
        let here = self.current(house)?;
        let Some(target) = here.exit(direction) else {
            return Err(HouseError::InvalidDirection { direction });
        };
        let next_move = self.next_move_number()?;
        self.current_location = house.location(target)?.name().to_string();
        self.move_number = next_move;
        Ok(&self.current_location)
    }

    /// Searches the current location. Counts as a move. Anyone hidden here is
    /// found for good, in the order they hid.
    pub fn check_current_location(&mut self, house: &mut HouseGraph) -> HouseResult<CheckOutcome> {
        let next_move = self.next_move_number()?;
        let here = self.current(house)?;
        let id = here.id();
        let Some(description) = here.hiding_description().map(str::to_string) else {
            self.move_number = next_move;
            return Ok(CheckOutcome::NoHidingPlace {
                location: here.name().to_string(),
            });
        };

        let found = house.take_concealed(id)?;
        self.move_number = next_move;
        for actor in &found {
            if !self.is_found(actor) {
                self.found.push(actor.clone());
            }
        }
        Ok(CheckOutcome::Searched { description, found })
    }

    fn next_move_number(&self) -> HouseResult<u32> {
        self.move_number.checked_add(1).ok_or_else(|| {
            HouseError::InvalidOperation(format!(
                "move number {} cannot be advanced any further",
                self.move_number
            ))
        })
    }
}

pub(crate) fn validate_roster(roster: &[String]) -> HouseResult<()> {
    if roster.is_empty() {
        return Err(HouseError::invalid_value(
            "OpponentsAndHidingLocations",
            "[]",
            "a game needs at least one opponent",
        ));
    }
    let mut seen = HashSet::new();
    for actor in roster {
        require_non_blank("Opponent", actor)?;
        if !seen.insert(actor.as_str()) {
            return Err(HouseError::invalid_value(
                "Opponent",
                actor,
                "opponent names must be unique",
            ));
        }
    }
    Ok(())
}
