use std::collections::HashSet;

use serde_json::Value;
use tracing::{info, warn};

use crate::error::{HouseError, HouseResult};
use crate::world::{no_exits, require_non_blank, Direction, HouseGraph, LocationKind};

use super::store::{house_file_path, read_logical, validate_file_name, FileStore};
use super::types::{HouseRecord, HOUSE_REQUIRED_FIELDS};

/// Reads `<file_name>.house.json` from `store` and builds the house it describes.
pub fn load_house(store: &dyn FileStore, file_name: &str) -> HouseResult<HouseGraph> {
    validate_file_name("HouseFileName", file_name)?;
    let raw = read_logical(store, file_name, &house_file_path(file_name))?;
    let house = parse_house_json(&raw)?;
    if house.file_name() != file_name {
        warn!(
            requested = file_name,
            declared = house.file_name(),
            "house_file_name_mismatch"
        );
    }
    Ok(house)
}

/// Parses, validates, and links a serialized house. Each stage must pass before
/// the next one runs, so the error reported is always the earliest problem.
pub fn parse_house_json(raw: &str) -> HouseResult<HouseGraph> {
    let value = parse_structure(raw)?;
    let record = decode_record(value)?;
    let directions = parse_directions(&record)?;
    validate_field_values(&record)?;
    validate_structure(&record)?;
    let house = link(&record, &directions)?;
    info!(
        house = house.name(),
        file_name = house.file_name(),
        location_count = house.location_count(),
        hiding_spot_count = house.hiding_spots().count(),
        "house_loaded"
    );
    Ok(house)
}

fn parse_structure(raw: &str) -> HouseResult<Value> {
    let value =
        serde_json::from_str::<Value>(raw).map_err(|error| HouseError::from_json(&error))?;
    if !value.is_object() {
        return Err(HouseError::format(
            "a house must be a JSON object at the top level",
        ));
    }
    Ok(value)
}

fn decode_record(value: Value) -> HouseResult<HouseRecord> {
    require_fields(&value, &HOUSE_REQUIRED_FIELDS)?;
    serde_path_to_error::deserialize(value).map_err(HouseError::from_json_path)
}

pub(crate) fn require_fields(value: &Value, fields: &[&str]) -> HouseResult<()> {
    let Some(object) = value.as_object() else {
        return Err(HouseError::format("expected a JSON object"));
    };
    match fields.iter().find(|field| !object.contains_key(**field)) {
        Some(missing) => Err(HouseError::missing_field(missing)),
        None => Ok(()),
    }
}

/// Per-location directions, plain locations first, in the same order as the records.
fn parse_directions(record: &HouseRecord) -> HouseResult<Vec<Vec<Direction>>> {
    location_exits(record)
        .map(|(name, exits)| {
            exits
                .iter()
                .map(|(token, _)| {
                    Direction::from_token(token).ok_or_else(|| {
                        HouseError::format(format!(
                            "'{token}' in the exits of {name} is not a valid direction"
                        ))
                    })
                })
                .collect::<HouseResult<Vec<_>>>()
        })
        .collect()
}

fn validate_field_values(record: &HouseRecord) -> HouseResult<()> {
    require_non_blank("Name", &record.name)?;
    validate_file_name("HouseFileName", &record.house_file_name)?;
    require_non_blank("PlayerStartingPoint", &record.player_starting_point)?;

    let mut seen = HashSet::new();
    for (name, _) in location_exits(record) {
        require_non_blank("Name", name)?;
        if !seen.insert(name) {
            return Err(HouseError::invalid_value(
                "Name",
                name,
                "location names must be unique within a house",
            ));
        }
    }
    for spot in &record.locations_with_hiding_places {
        if spot.hiding_place.trim().is_empty() {
            return Err(HouseError::invalid_value(
                "HidingPlace",
                &spot.hiding_place,
                format!("hiding place of {} must not be empty or whitespace", spot.name),
            ));
        }
    }
    Ok(())
}

fn validate_structure(record: &HouseRecord) -> HouseResult<()> {
    if record.locations_with_hiding_places.is_empty() {
        return Err(HouseError::invalid_value(
            "LocationsWithHidingPlaces",
            "[]",
            "a house needs at least one hiding place",
        ));
    }
    match location_exits(record).find(|(_, exits)| exits.is_empty()) {
        Some((name, _)) => Err(no_exits(name)),
        None => Ok(()),
    }
}

fn link(record: &HouseRecord, directions: &[Vec<Direction>]) -> HouseResult<HouseGraph> {
    let mut house = HouseGraph::unlinked(&record.name, &record.house_file_name);
    for location in &record.locations_without_hiding_places {
        house.insert(&location.name, LocationKind::Plain)?;
    }
    for spot in &record.locations_with_hiding_places {
        house.insert(
            &spot.name,
            LocationKind::HidingSpot {
                description: spot.hiding_place.clone(),
                concealed: Vec::new(),
            },
        )?;
    }

    for ((name, exits), parsed) in location_exits(record).zip(directions) {
        let from = house
            .id_of(name)
            .ok_or_else(|| HouseError::unresolved("House", name, "location list"))?;
        for ((_, target), direction) in exits.iter().zip(parsed) {
            let to = house.id_of(target).ok_or_else(|| {
                HouseError::unresolved(name, target, format!("exit {direction}"))
            })?;
            house.connect(from, *direction, to)?;
        }
    }

    let entry = house.id_of(&record.player_starting_point).ok_or_else(|| {
        HouseError::unresolved(
            "House",
            &record.player_starting_point,
            "PlayerStartingPoint",
        )
    })?;
    house.set_entry(entry);
    Ok(house)
}

fn location_exits(
    record: &HouseRecord,
) -> impl Iterator<Item = (&str, &[(String, String)])> + '_ {
    record
        .locations_without_hiding_places
        .iter()
        .map(|location| (location.name.as_str(), location.exits.as_slice()))
        .chain(
            record
                .locations_with_hiding_places
                .iter()
                .map(|spot| (spot.name.as_str(), spot.exits.as_slice())),
        )
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use serde_json::json;

    use super::*;
    use crate::content::MemoryFileStore;
    use crate::error::ErrorKind;
    use crate::world::Location;

    fn fixture_text(name: &str) -> String {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("assets")
            .join("houses")
            .join(house_file_path(name));
        fs::read_to_string(path).expect("fixture")
    }

    fn sample_value() -> Value {
        json!({
            "Name": "Cottage",
            "HouseFileName": "Cottage",
            "PlayerStartingPoint": "Porch",
            "LocationsWithoutHidingPlaces": [
                { "Name": "Porch", "Exits": { "In": "Hall", "East": "Shed" } },
                { "Name": "Hall", "Exits": { "Out": "Porch", "North": "Closet" } }
            ],
            "LocationsWithHidingPlaces": [
                { "HidingPlace": "behind the coats", "Name": "Closet", "Exits": { "South": "Hall" } },
                { "HidingPlace": "under a tarp", "Name": "Shed", "Exits": { "West": "Porch" } }
            ]
        })
    }

    fn parse_value(value: &Value) -> HouseResult<HouseGraph> {
        parse_house_json(&serde_json::to_string(value).expect("json"))
    }

    #[test]
    fn valid_house_links_forward_references() {
        let house = parse_value(&sample_value()).expect("house");
        assert_eq!(house.name(), "Cottage");
        assert_eq!(house.entry_location().name(), "Porch");
        let porch = house.entry_location();
        let hall = house.location_by_name("Hall").expect("hall");
        let shed = house.hiding_spot_by_name("Shed").expect("shed");
        assert_eq!(porch.exits(), &[(Direction::In, hall.id()), (Direction::East, shed.id())]);
        assert_eq!(shed.hiding_description(), Some("under a tarp"));
    }

    #[test]
    fn every_exit_resolves_inside_the_house() {
        let house = parse_house_json(&fixture_text("DefaultHouse")).expect("house");
        for location in house.locations() {
            for (_, target) in location.exits() {
                assert!(house.get(*target).is_some(), "{} dangles", location.name());
            }
        }
    }

    #[test]
    fn malformed_json_reports_position() {
        let error = parse_house_json("{\n  \"Name\": \"Cottage\",\n  oops\n}").expect_err("bad json");
        assert_eq!(error.kind(), ErrorKind::Format);
        match error {
            HouseError::Format {
                location: Some(location),
                ..
            } => assert_eq!(location.line, 3),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn non_object_document_is_a_format_error() {
        let error = parse_house_json("[1, 2]").expect_err("array");
        assert_eq!(error.kind(), ErrorKind::Format);
    }

    #[test]
    fn missing_top_level_fields_are_named() {
        for field in HOUSE_REQUIRED_FIELDS {
            let mut value = sample_value();
            value.as_object_mut().expect("object").remove(field);
            let error = parse_value(&value).expect_err(field);
            assert_eq!(error.kind(), ErrorKind::MissingField, "{field}");
            match error {
                HouseError::MissingField { field: reported } => assert_eq!(reported, field),
                other => panic!("unexpected error {other:?}"),
            }
        }
    }

    #[test]
    fn wrong_token_types_report_the_json_path() {
        let mut value = sample_value();
        value["LocationsWithoutHidingPlaces"][1]["Name"] = json!(42);
        let error = parse_value(&value).expect_err("number name");
        assert_eq!(error.kind(), ErrorKind::Format);
        assert!(error
            .to_string()
            .contains("LocationsWithoutHidingPlaces[1].Name"));
    }

    #[test]
    fn unknown_direction_token_is_named() {
        let mut value = sample_value();
        value["LocationsWithHidingPlaces"][0]["Exits"] = json!({ "Sideways": "Hall" });
        let error = parse_value(&value).expect_err("bad direction");
        assert_eq!(error.kind(), ErrorKind::Format);
        assert!(error.to_string().contains("Sideways"));
        assert!(error.to_string().contains("Closet"));
    }

    #[test]
    fn direction_tokens_are_checked_before_field_values() {
        let mut value = sample_value();
        value["Name"] = json!("  ");
        value["LocationsWithHidingPlaces"][0]["Exits"] = json!({ "north": "Hall" });
        let error = parse_value(&value).expect_err("both broken");
        assert_eq!(error.kind(), ErrorKind::Format);
    }

    #[test]
    fn blank_values_name_the_field() {
        let cases = [
            ("/Name", "Name"),
            ("/HouseFileName", "HouseFileName"),
            ("/PlayerStartingPoint", "PlayerStartingPoint"),
            ("/LocationsWithoutHidingPlaces/0/Name", "Name"),
            ("/LocationsWithHidingPlaces/1/HidingPlace", "HidingPlace"),
        ];
        for (pointer, field) in cases {
            let mut value = sample_value();
            *value.pointer_mut(pointer).expect(pointer) = json!(" \t");
            let error = parse_value(&value).expect_err(pointer);
            match error {
                HouseError::InvalidValue { field: reported, .. } => {
                    assert_eq!(reported, field, "{pointer}")
                }
                other => panic!("unexpected error for {pointer}: {other:?}"),
            }
        }
    }

    #[test]
    fn file_name_with_separator_is_invalid() {
        let mut value = sample_value();
        value["HouseFileName"] = json!("houses/Cottage");
        let error = parse_value(&value).expect_err("separator");
        assert_eq!(error.kind(), ErrorKind::InvalidValue);
        assert!(error.to_string().contains("houses/Cottage"));
    }

    #[test]
    fn duplicate_location_names_are_invalid() {
        let mut value = sample_value();
        value["LocationsWithHidingPlaces"][1]["Name"] = json!("Hall");
        let error = parse_value(&value).expect_err("duplicate");
        assert_eq!(error.kind(), ErrorKind::InvalidValue);
    }

    #[test]
    fn empty_hiding_list_is_invalid() {
        let mut value = sample_value();
        value["LocationsWithHidingPlaces"] = json!([]);
        value["LocationsWithoutHidingPlaces"][1]["Exits"] = json!({ "Out": "Porch" });
        value["LocationsWithoutHidingPlaces"][0]["Exits"] = json!({ "In": "Hall" });
        let error = parse_value(&value).expect_err("no hiding places");
        assert_eq!(error.kind(), ErrorKind::InvalidValue);
        assert!(error.to_string().contains("LocationsWithHidingPlaces"));
    }

    #[test]
    fn location_without_exits_is_invalid() {
        let mut value = sample_value();
        value["LocationsWithHidingPlaces"][0]["Exits"] = json!({});
        let error = parse_value(&value).expect_err("dead end");
        assert_eq!(error.kind(), ErrorKind::InvalidValue);
        assert!(error.to_string().contains("Closet"));
    }

    #[test]
    fn dangling_exit_names_source_target_and_direction() {
        let mut value = sample_value();
        value["LocationsWithoutHidingPlaces"][1]["Exits"]["Up"] = json!("Attic");
        let error = parse_value(&value).expect_err("dangling");
        match error {
            HouseError::UnresolvedReference {
                source_name,
                target,
                relation,
            } => {
                assert_eq!(source_name, "Hall");
                assert_eq!(target, "Attic");
                assert_eq!(relation, "exit Up");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn unknown_starting_point_is_unresolved() {
        let mut value = sample_value();
        value["PlayerStartingPoint"] = json!("Dungeon");
        let error = parse_value(&value).expect_err("dungeon");
        assert_eq!(error.kind(), ErrorKind::UnresolvedReference);
        match error {
            HouseError::UnresolvedReference { target, .. } => assert_eq!(target, "Dungeon"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn starting_point_may_be_a_hiding_spot() {
        let mut value = sample_value();
        value["PlayerStartingPoint"] = json!("Shed");
        let house = parse_value(&value).expect("house");
        assert!(house.entry_location().is_hiding_spot());
    }

    #[test]
    fn load_house_appends_suffix_and_reports_logical_name() {
        let raw = serde_json::to_string(&sample_value()).expect("json");
        let store = MemoryFileStore::new().with_file("Cottage.house.json", &raw);
        let house = load_house(&store, "Cottage").expect("house");
        assert_eq!(
            house.plain_locations().map(Location::name).collect::<Vec<_>>(),
            vec!["Porch", "Hall"]
        );

        let error = load_house(&store, "Mansion").expect_err("missing");
        assert_eq!(error.kind(), ErrorKind::FileNotFound);
        assert!(error.to_string().contains("'Mansion'"));
        assert!(!error.to_string().contains(".house.json"));
    }

    #[test]
    fn load_house_rejects_illegal_file_names_before_reading() {
        let store = MemoryFileStore::new();
        let error = load_house(&store, "../etc").expect_err("separator");
        assert_eq!(error.kind(), ErrorKind::InvalidValue);
    }

    #[test]
    fn default_house_fixture_loads() {
        let house = parse_house_json(&fixture_text("DefaultHouse")).expect("house");
        assert_eq!(house.location_count(), 14);
        assert_eq!(house.entry_location().name(), "Entry");
        assert_eq!(
            house
                .hiding_spot_by_name("Kitchen")
                .expect("kitchen")
                .hiding_description(),
            Some("next to the stove")
        );
    }
}
