mod json;
mod species;

pub use self::json::JsonError;
pub use self::species::{parse_species, parse_species_library, SpeciesParseError};
