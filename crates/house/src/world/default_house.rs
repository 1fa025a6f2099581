use crate::error::HouseResult;

use super::direction::Direction;
use super::graph::HouseGraph;
use super::location::LocationId;

pub const DEFAULT_HOUSE_FILE_NAME: &str = "DefaultHouse";

/// The stock two-storey house: 14 locations, 11 of them hiding spots, entered
/// through the "Entry". Every passage is declared in both directions.
pub fn default_house() -> HouseResult<HouseGraph> {
    let mut house = HouseGraph::new("my house", DEFAULT_HOUSE_FILE_NAME, "Entry")?;
    let entry = house.entry();

    let hallway = two_way(&mut house, entry, Direction::East, "Hallway", None)?;
    let landing = two_way(&mut house, hallway, Direction::Up, "Landing", None)?;

    let master_bedroom = two_way(
        &mut house,
        landing,
        Direction::Northwest,
        "Master Bedroom",
        Some("in the closet"),
    )?;
    two_way(
        &mut house,
        master_bedroom,
        Direction::East,
        "Master Bath",
        Some("in the bathtub"),
    )?;
    two_way(
        &mut house,
        landing,
        Direction::West,
        "Second Bathroom",
        Some("in the shower"),
    )?;
    two_way(
        &mut house,
        landing,
        Direction::Southeast,
        "Kids Room",
        Some("in the bunk beds"),
    )?;
    two_way(
        &mut house,
        landing,
        Direction::Southwest,
        "Nursery",
        Some("behind the changing table"),
    )?;
    two_way(
        &mut house,
        landing,
        Direction::South,
        "Pantry",
        Some("inside a cabinet"),
    )?;
    two_way(&mut house, landing, Direction::Up, "Attic", Some("in a trunk"))?;

    two_way(
        &mut house,
        hallway,
        Direction::Northwest,
        "Kitchen",
        Some("next to the stove"),
    )?;
    two_way(
        &mut house,
        hallway,
        Direction::North,
        "Bathroom",
        Some("behind the door"),
    )?;
    two_way(
        &mut house,
        hallway,
        Direction::South,
        "Living Room",
        Some("behind the sofa"),
    )?;
    two_way(&mut house, entry, Direction::Out, "Garage", Some("behind the car"))?;

    Ok(house)
}

fn two_way(
    house: &mut HouseGraph,
    from: LocationId,
    direction: Direction,
    name: &str,
    description: Option<&str>,
) -> HouseResult<LocationId> {
    let id = house.add_exit(from, direction, name, description)?;
    house.connect(id, direction.opposite(), from)?;
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Location;

    #[test]
    fn default_house_matches_the_stock_layout() {
        let house = default_house().expect("house");
        house.validate().expect("valid");
        assert_eq!(house.location_count(), 14);
        assert_eq!(house.entry_location().name(), "Entry");
        assert_eq!(
            house.plain_locations().map(Location::name).collect::<Vec<_>>(),
            vec!["Entry", "Hallway", "Landing"]
        );
        assert_eq!(house.hiding_spots().count(), 11);
    }

    #[test]
    fn hiding_spot_order_is_upstairs_first() {
        let house = default_house().expect("house");
        let spots = house.hiding_spots().map(Location::name).collect::<Vec<_>>();
        assert_eq!(spots[5], "Pantry");
        assert_eq!(spots[7], "Kitchen");
        assert_eq!(spots[10], "Garage");
    }

    #[test]
    fn garage_leads_back_inside() {
        let house = default_house().expect("house");
        let garage = house.location_by_name("Garage").expect("garage");
        assert_eq!(garage.exit(Direction::In), Some(house.entry()));
        assert_eq!(garage.hiding_description(), Some("behind the car"));
    }
}
