use std::collections::HashMap;

use crate::content::validate_file_name;
use crate::error::{HouseError, HouseResult};
use crate::random::IndexSource;

use super::direction::Direction;
use super::location::{Location, LocationId, LocationKind};

/// A house layout: an arena of locations addressed by `LocationId`, where exits
/// are handles into the same arena.
#[derive(Debug, Clone)]
pub struct HouseGraph {
    name: String,
    file_name: String,
    entry: LocationId,
    locations: Vec<Location>,
    ids_by_name: HashMap<String, LocationId>,
}

impl HouseGraph {
    /// Starts a house whose entry is a plain location named `entry_name`.
    pub fn new(name: &str, file_name: &str, entry_name: &str) -> HouseResult<Self> {
        require_non_blank("Name", name)?;
        validate_file_name("HouseFileName", file_name)?;
        require_non_blank("PlayerStartingPoint", entry_name)?;
        let mut house = Self::unlinked(name, file_name);
        house.entry = house.add_location(entry_name)?;
        Ok(house)
    }

    /// An empty arena for the loader; the entry must be set once nodes exist.
    pub(crate) fn unlinked(name: &str, file_name: &str) -> Self {
        Self {
            name: name.to_string(),
            file_name: file_name.to_string(),
            entry: LocationId(0),
            locations: Vec::new(),
            ids_by_name: HashMap::new(),
        }
    }

    pub(crate) fn set_entry(&mut self, entry: LocationId) {
        self.entry = entry;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn entry(&self) -> LocationId {
        self.entry
    }

    pub fn entry_location(&self) -> &Location {
        &self.locations[self.entry.index()]
    }

    pub fn get(&self, id: LocationId) -> Option<&Location> {
        self.locations.get(id.index())
    }

    pub fn location(&self, id: LocationId) -> HouseResult<&Location> {
        self.get(id).ok_or_else(|| {
            HouseError::not_found(format!("location #{}", id.0), "is not part of this house")
        })
    }

    pub fn id_of(&self, name: &str) -> Option<LocationId> {
        self.ids_by_name.get(name).copied()
    }

    /// All locations in arena order.
    pub fn locations(&self) -> impl Iterator<Item = &Location> + '_ {
        self.locations.iter()
    }

    pub fn plain_locations(&self) -> impl Iterator<Item = &Location> + '_ {
        self.locations
            .iter()
            .filter(|location| !location.is_hiding_spot())
    }

    pub fn hiding_spots(&self) -> impl Iterator<Item = &Location> + '_ {
        self.locations
            .iter()
            .filter(|location| location.is_hiding_spot())
    }

    pub fn location_count(&self) -> usize {
        self.locations.len()
    }

    pub fn location_by_name(&self, name: &str) -> HouseResult<&Location> {
        self.id_of(name)
            .map(|id| &self.locations[id.index()])
            .ok_or_else(|| HouseError::not_found(name, "does not exist in House"))
    }

    pub fn hiding_spot_by_name(&self, name: &str) -> HouseResult<&Location> {
        let location = self.location_by_name(name)?;
        if location.is_hiding_spot() {
            Ok(location)
        } else {
            Err(HouseError::not_found(name, "is not a hiding spot in House"))
        }
    }

    pub fn location_exists(&self, name: &str) -> bool {
        self.ids_by_name.contains_key(name)
    }

    pub fn hiding_spot_exists(&self, name: &str) -> bool {
        self.location_by_name(name)
            .is_ok_and(|location| location.is_hiding_spot())
    }

    pub fn add_location(&mut self, name: &str) -> HouseResult<LocationId> {
        require_non_blank("Name", name)?;
        self.insert(name, LocationKind::Plain)
    }

    pub fn add_hiding_spot(&mut self, name: &str, description: &str) -> HouseResult<LocationId> {
        require_non_blank("Name", name)?;
        require_non_blank("HidingPlace", description)?;
        self.insert(
            name,
            LocationKind::HidingSpot {
                description: description.to_string(),
                concealed: Vec::new(),
            },
        )
    }

    /// One-way exit `from -> to`; an existing exit in that direction is retargeted.
    pub fn connect(
        &mut self,
        from: LocationId,
        direction: Direction,
        to: LocationId,
    ) -> HouseResult<()> {
        self.location(to)?;
        self.location(from)?;
        self.locations[from.index()].set_exit(direction, to);
        Ok(())
    }

    /// Creates a neighbor of `from` and links `from -> neighbor` only. The new
    /// location is a hiding spot when `description` is given.
    pub fn add_exit(
        &mut self,
        from: LocationId,
        direction: Direction,
        new_name: &str,
        description: Option<&str>,
    ) -> HouseResult<LocationId> {
        self.location(from)?;
        let id = match description {
            Some(description) => self.add_hiding_spot(new_name, description)?,
            None => self.add_location(new_name)?,
        };
        self.connect(from, direction, id)?;
        Ok(id)
    }

    pub fn random_exit(
        &self,
        from: LocationId,
        rng: &mut dyn IndexSource,
    ) -> HouseResult<LocationId> {
        let location = self.location(from)?;
        let exits = location.exits();
        if exits.is_empty() {
            return Err(HouseError::InvalidOperation(format!(
                "the {} has no exits",
                location.name()
            )));
        }
        let index = checked_index(rng, exits.len())?;
        Ok(exits[index].1)
    }

    pub fn random_hiding_spot(&self, rng: &mut dyn IndexSource) -> HouseResult<LocationId> {
        let spots = self.hiding_spots().map(Location::id).collect::<Vec<_>>();
        if spots.is_empty() {
            return Err(HouseError::InvalidOperation(format!(
                "{} has no hiding spots",
                self.name
            )));
        }
        let index = checked_index(rng, spots.len())?;
        Ok(spots[index])
    }

    pub fn clear_all_hiding_spots(&mut self) {
        for location in &mut self.locations {
            if let Some(concealed) = location.concealed_mut() {
                concealed.clear();
            }
        }
    }

    pub fn hide(&mut self, spot: LocationId, actor: &str) -> HouseResult<()> {
        self.concealed_at(spot)?.push(actor.to_string());
        Ok(())
    }

    /// Empties the spot and hands back whoever was hidden there, in hiding order.
    pub fn take_concealed(&mut self, spot: LocationId) -> HouseResult<Vec<String>> {
        Ok(std::mem::take(self.concealed_at(spot)?))
    }

    /// Checks the invariants a loaded house always satisfies.
    pub fn validate(&self) -> HouseResult<()> {
        if self.hiding_spots().next().is_none() {
            return Err(HouseError::invalid_value(
                "LocationsWithHidingPlaces",
                "[]",
                "a house needs at least one hiding place",
            ));
        }
        for location in &self.locations {
            if location.exits().is_empty() {
                return Err(no_exits(location.name()));
            }
        }
        self.location(self.entry)?;
        Ok(())
    }

    fn concealed_at(&mut self, spot: LocationId) -> HouseResult<&mut Vec<String>> {
        let name = self.location(spot)?.name().to_string();
        self.locations[spot.index()]
            .concealed_mut()
            .ok_or_else(|| HouseError::not_found(name, "is not a hiding spot in House"))
    }

    pub(crate) fn insert(&mut self, name: &str, kind: LocationKind) -> HouseResult<LocationId> {
        if self.ids_by_name.contains_key(name) {
            return Err(HouseError::InvalidOperation(format!(
                "a location named '{name}' already exists in {}",
                self.name
            )));
        }
        let id = LocationId(self.locations.len() as u32);
        self.locations
            .push(Location::new(id, name.to_string(), kind));
        self.ids_by_name.insert(name.to_string(), id);
        Ok(id)
    }
}

pub(crate) fn require_non_blank(field: &str, value: &str) -> HouseResult<()> {
    if value.trim().is_empty() {
        return Err(HouseError::invalid_value(
            field,
            value,
            "must not be empty or whitespace",
        ));
    }
    Ok(())
}

pub(crate) fn no_exits(name: &str) -> HouseError {
    HouseError::invalid_value("Exits", name, "every location needs at least one exit")
}

fn checked_index(rng: &mut dyn IndexSource, len: usize) -> HouseResult<usize> {
    let index = rng.next_index(len);
    if index >= len {
        return Err(HouseError::InvalidOperation(format!(
            "random index {index} is outside 0..{len}"
        )));
    }
    Ok(index)
}
