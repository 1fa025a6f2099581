use tracing::info;

use crate::error::{HouseError, HouseResult};
use crate::world::{HouseGraph, Location};

use super::store::{house_file_path, FileStore};
use super::types::{HidingPlaceRecord, HouseRecord, LocationRecord};

/// Canonical compact JSON for `house`: plain locations, then hiding spots, each
/// list in arena order with exits in declaration order.
pub fn serialize_house(house: &HouseGraph) -> HouseResult<String> {
    let record = house_record(house)?;
    serde_json::to_string(&record)
        .map_err(|error| HouseError::format(format!("failed to encode house json: {error}")))
}

/// Writes `<file_name>.house.json` for `house` through `store`.
pub fn save_house(store: &mut dyn FileStore, house: &HouseGraph) -> HouseResult<()> {
    house.validate()?;
    let text = serialize_house(house)?;
    store.write_all(&house_file_path(house.file_name()), &text)?;
    info!(
        house = house.name(),
        file_name = house.file_name(),
        "house_saved"
    );
    Ok(())
}

fn house_record(house: &HouseGraph) -> HouseResult<HouseRecord> {
    let locations_without_hiding_places = house
        .plain_locations()
        .map(|location| {
            Ok(LocationRecord {
                name: location.name().to_string(),
                exits: exit_records(house, location)?,
            })
        })
        .collect::<HouseResult<Vec<_>>>()?;
    let locations_with_hiding_places = house
        .hiding_spots()
        .map(|spot| {
            Ok(HidingPlaceRecord {
                hiding_place: spot.hiding_description().unwrap_or_default().to_string(),
                name: spot.name().to_string(),
                exits: exit_records(house, spot)?,
            })
        })
        .collect::<HouseResult<Vec<_>>>()?;

    Ok(HouseRecord {
        name: house.name().to_string(),
        house_file_name: house.file_name().to_string(),
        player_starting_point: house.entry_location().name().to_string(),
        locations_without_hiding_places,
        locations_with_hiding_places,
    })
}

fn exit_records(house: &HouseGraph, location: &Location) -> HouseResult<Vec<(String, String)>> {
    location
        .exits()
        .iter()
        .map(|(direction, target)| {
            Ok((
                direction.token().to_string(),
                house.location(*target)?.name().to_string(),
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use super::*;
    use crate::content::{load_house, parse_house_json, MemoryFileStore};
    use crate::world::{default_house, Direction, DEFAULT_HOUSE_FILE_NAME};

    fn fixture_text() -> String {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("assets")
            .join("houses")
            .join(house_file_path(DEFAULT_HOUSE_FILE_NAME));
        fs::read_to_string(path).expect("fixture")
    }

    fn topology(house: &HouseGraph) -> Vec<(String, Option<String>, Vec<(Direction, String)>)> {
        house
            .locations()
            .map(|location| {
                let exits = location
                    .exits()
                    .iter()
                    .map(|(direction, target)| {
                        let target = house.location(*target).expect("target");
                        (*direction, target.name().to_string())
                    })
                    .collect();
                (
                    location.name().to_string(),
                    location.hiding_description().map(str::to_string),
                    exits,
                )
            })
            .collect()
    }

    #[test]
    fn programmatic_default_house_serializes_to_the_fixture_bytes() {
        let house = default_house().expect("house");
        let json = serialize_house(&house).expect("json");
        assert_eq!(json, fixture_text().trim_end());
    }

    #[test]
    fn loading_then_serializing_the_fixture_is_byte_exact() {
        let fixture = fixture_text();
        let house = parse_house_json(&fixture).expect("house");
        assert_eq!(serialize_house(&house).expect("json"), fixture.trim_end());
    }

    #[test]
    fn round_trip_preserves_names_topology_and_descriptions() {
        let original = default_house().expect("house");
        let reloaded =
            parse_house_json(&serialize_house(&original).expect("json")).expect("reload");
        assert_eq!(reloaded.name(), original.name());
        assert_eq!(reloaded.file_name(), original.file_name());
        assert_eq!(
            reloaded.entry_location().name(),
            original.entry_location().name()
        );

        let mut expected = topology(&original);
        let mut actual = topology(&reloaded);
        expected.sort();
        actual.sort();
        assert_eq!(actual, expected);
    }

    #[test]
    fn hiding_place_key_comes_first_in_hiding_records() {
        let json = serialize_house(&default_house().expect("house")).expect("json");
        assert!(json.starts_with(
            r#"{"Name":"my house","HouseFileName":"DefaultHouse","PlayerStartingPoint":"Entry","LocationsWithoutHidingPlaces":[{"Name":"Entry","Exits":{"East":"Hallway","Out":"Garage"}}"#
        ));
        assert!(json.contains(
            r#"{"HidingPlace":"next to the stove","Name":"Kitchen","Exits":{"Southeast":"Hallway"}}"#
        ));
    }

    #[test]
    fn save_house_writes_through_the_store() {
        let mut store = MemoryFileStore::new();
        let house = default_house().expect("house");
        save_house(&mut store, &house).expect("save");
        assert!(store.get("DefaultHouse.house.json").is_some());
        let reloaded = load_house(&store, DEFAULT_HOUSE_FILE_NAME).expect("load");
        assert_eq!(reloaded.location_count(), 14);
    }

    #[test]
    fn save_house_refuses_an_incomplete_house() {
        let mut store = MemoryFileStore::new();
        let house = HouseGraph::new("Shack", "Shack", "Door").expect("house");
        assert!(save_house(&mut store, &house).is_err());
        assert_eq!(store.names().count(), 0);
    }
}
