use std::fmt;

use super::direction::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocationId(pub u32);

impl LocationId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationKind {
    Plain,
    HidingSpot {
        description: String,
        /// Actors currently hidden here, in the order they were hidden.
        concealed: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    id: LocationId,
    name: String,
    kind: LocationKind,
    exits: Vec<(Direction, LocationId)>,
}

impl Location {
    pub(crate) fn new(id: LocationId, name: String, kind: LocationKind) -> Self {
        Self {
            id,
            name,
            kind,
            exits: Vec::new(),
        }
    }

    pub fn id(&self) -> LocationId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &LocationKind {
        &self.kind
    }

    /// Exits in the order they were declared.
    pub fn exits(&self) -> &[(Direction, LocationId)] {
        &self.exits
    }

    pub fn exit(&self, direction: Direction) -> Option<LocationId> {
        self.exits
            .iter()
            .find(|(candidate, _)| *candidate == direction)
            .map(|(_, target)| *target)
    }

    pub fn is_hiding_spot(&self) -> bool {
        matches!(self.kind, LocationKind::HidingSpot { .. })
    }

    pub fn hiding_description(&self) -> Option<&str> {
        match &self.kind {
            LocationKind::HidingSpot { description, .. } => Some(description),
            LocationKind::Plain => None,
        }
    }

    pub fn concealed(&self) -> &[String] {
        match &self.kind {
            LocationKind::HidingSpot { concealed, .. } => concealed,
            LocationKind::Plain => &[],
        }
    }

    pub(crate) fn set_exit(&mut self, direction: Direction, target: LocationId) {
        match self
            .exits
            .iter_mut()
            .find(|(candidate, _)| *candidate == direction)
        {
            Some(slot) => slot.1 = target,
            None => self.exits.push((direction, target)),
        }
    }

    pub(crate) fn concealed_mut(&mut self) -> Option<&mut Vec<String>> {
        match &mut self.kind {
            LocationKind::HidingSpot { concealed, .. } => Some(concealed),
            LocationKind::Plain => None,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relinking_a_direction_keeps_its_position() {
        let mut location = Location::new(LocationId(0), "Hall".to_string(), LocationKind::Plain);
        location.set_exit(Direction::East, LocationId(1));
        location.set_exit(Direction::Up, LocationId(2));
        location.set_exit(Direction::East, LocationId(3));
        assert_eq!(
            location.exits(),
            &[(Direction::East, LocationId(3)), (Direction::Up, LocationId(2))]
        );
        assert_eq!(location.exit(Direction::West), None);
    }

    #[test]
    fn plain_locations_conceal_nobody() {
        let mut location = Location::new(LocationId(0), "Hall".to_string(), LocationKind::Plain);
        assert!(!location.is_hiding_spot());
        assert!(location.concealed().is_empty());
        assert!(location.concealed_mut().is_none());
        assert_eq!(location.hiding_description(), None);
    }
}
