mod default_house;
mod direction;
mod graph;
mod location;

pub use default_house::{default_house, DEFAULT_HOUSE_FILE_NAME};
pub use direction::{Direction, UnknownDirection};
pub use graph::HouseGraph;
pub(crate) use graph::{no_exits, require_non_blank};
pub use location::{Location, LocationId, LocationKind};
