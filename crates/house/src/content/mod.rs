mod atomic_io;
mod loader;
mod serializer;
mod store;
mod types;

pub use loader::{load_house, parse_house_json};
pub(crate) use loader::require_fields;
pub use serializer::{save_house, serialize_house};
pub(crate) use store::read_logical;
pub(crate) use types::ordered_pairs;
pub use store::{
    house_file_path, save_file_path, validate_file_name, FileStore, FsFileStore, MemoryFileStore,
    HOUSE_FILE_SUFFIX, SAVE_FILE_SUFFIX,
};
