use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::content::{require_fields, validate_file_name};
use crate::error::{HouseError, HouseResult};
use crate::world::{require_non_blank, HouseGraph};

use super::state::GameState;

const SAVED_GAME_REQUIRED_FIELDS: [&str; 5] = [
    "HouseFileName",
    "PlayerLocation",
    "MoveNumber",
    "OpponentsAndHidingLocations",
    "FoundOpponents",
];

/// On-disk shape of a saved game. Field order is the canonical output order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SavedGame {
    pub house_file_name: String,
    pub player_location: String,
    pub move_number: u32,
    #[serde(with = "crate::content::ordered_pairs")]
    pub opponents_and_hiding_locations: Vec<(String, String)>,
    pub found_opponents: Vec<String>,
}

impl SavedGame {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            house_file_name: state.house_file_name().to_string(),
            player_location: state.current_location().to_string(),
            move_number: state.move_number(),
            opponents_and_hiding_locations: state.hiding_places().to_vec(),
            found_opponents: state.found().to_vec(),
        }
    }
}

pub fn parse_saved_game_json(raw: &str) -> HouseResult<SavedGame> {
    let value =
        serde_json::from_str::<Value>(raw).map_err(|error| HouseError::from_json(&error))?;
    require_fields(&value, &SAVED_GAME_REQUIRED_FIELDS)?;
    serde_path_to_error::deserialize(value).map_err(HouseError::from_json_path)
}

pub fn serialize_saved_game(saved: &SavedGame) -> HouseResult<String> {
    serde_json::to_string(saved)
        .map_err(|error| HouseError::format(format!("failed to encode saved game json: {error}")))
}

/// Validates `saved` against `house` and, when everything resolves, re-hides
/// the actors that are still at large. Nothing is touched on failure.
pub fn restore_game_state(house: &mut HouseGraph, saved: &SavedGame) -> HouseResult<GameState> {
    validate_saved_game(house, saved)?;

    house.clear_all_hiding_spots();
    let found = saved
        .found_opponents
        .iter()
        .map(String::as_str)
        .collect::<HashSet<_>>();
    for (actor, spot_name) in &saved.opponents_and_hiding_locations {
        if found.contains(actor.as_str()) {
            continue;
        }
        let spot = house.hiding_spot_by_name(spot_name)?.id();
        house.hide(spot, actor)?;
    }

    Ok(GameState::from_parts(
        saved.house_file_name.clone(),
        saved.player_location.clone(),
        saved.move_number,
        saved.opponents_and_hiding_locations.clone(),
        saved.found_opponents.clone(),
    ))
}

fn validate_saved_game(house: &HouseGraph, saved: &SavedGame) -> HouseResult<()> {
    validate_file_name("HouseFileName", &saved.house_file_name)?;
    if saved.house_file_name != house.file_name() {
        return Err(HouseError::invalid_value(
            "HouseFileName",
            &saved.house_file_name,
            format!("the loaded house is '{}'", house.file_name()),
        ));
    }
    if saved.move_number == 0 {
        return Err(HouseError::invalid_value(
            "MoveNumber",
            "0",
            "move numbers start at 1",
        ));
    }
    if !house.location_exists(&saved.player_location) {
        return Err(HouseError::unresolved(
            "PlayerLocation",
            &saved.player_location,
            "location in House",
        ));
    }

    if saved.opponents_and_hiding_locations.is_empty() {
        return Err(HouseError::invalid_value(
            "OpponentsAndHidingLocations",
            "{}",
            "a saved game needs at least one opponent",
        ));
    }
    let mut actors = HashSet::new();
    for (actor, spot) in &saved.opponents_and_hiding_locations {
        if !house.hiding_spot_exists(spot) {
            return Err(HouseError::unresolved(
                format!("OpponentsAndHidingLocations.{actor}"),
                spot,
                "hiding spot in House",
            ));
        }
        require_non_blank("OpponentsAndHidingLocations", actor)?;
        if !actors.insert(actor.as_str()) {
            return Err(HouseError::invalid_value(
                "OpponentsAndHidingLocations",
                actor,
                "an opponent can only hide once",
            ));
        }
    }

    let mut found = HashSet::new();
    for actor in &saved.found_opponents {
        if !actors.contains(actor.as_str()) {
            return Err(HouseError::unresolved(
                "FoundOpponents",
                actor,
                "opponent in OpponentsAndHidingLocations",
            ));
        }
        if !found.insert(actor.as_str()) {
            return Err(HouseError::invalid_value(
                "FoundOpponents",
                actor,
                "an opponent can only be found once",
            ));
        }
    }
    Ok(())
}
