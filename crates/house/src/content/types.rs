use serde::{Deserialize, Serialize};

pub(crate) const HOUSE_REQUIRED_FIELDS: [&str; 5] = [
    "Name",
    "HouseFileName",
    "PlayerStartingPoint",
    "LocationsWithoutHidingPlaces",
    "LocationsWithHidingPlaces",
];

/// On-disk shape of a house layout. Field order is the canonical output order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct HouseRecord {
    pub name: String,
    pub house_file_name: String,
    pub player_starting_point: String,
    pub locations_without_hiding_places: Vec<LocationRecord>,
    pub locations_with_hiding_places: Vec<HidingPlaceRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct LocationRecord {
    pub name: String,
    #[serde(with = "ordered_pairs")]
    pub exits: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct HidingPlaceRecord {
    pub hiding_place: String,
    pub name: String,
    #[serde(with = "ordered_pairs")]
    pub exits: Vec<(String, String)>,
}

/// A JSON object read and written as ordered `(key, value)` string pairs, so
/// document order survives a load/save round trip.
pub(crate) mod ordered_pairs {
    use std::fmt;

    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};

    pub(crate) fn serialize<S: Serializer>(
        pairs: &[(String, String)],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(pairs.len()))?;
        for (key, value) in pairs {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<(String, String)>, D::Error> {
        struct PairsVisitor;

        impl<'de> Visitor<'de> for PairsVisitor {
            type Value = Vec<(String, String)>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object whose values are strings")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut pairs = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some(pair) = access.next_entry::<String, String>()? {
                    pairs.push(pair);
                }
                Ok(pairs)
            }
        }

        deserializer.deserialize_map(PairsVisitor)
    }
}
