use json::JsonValue;

use super::json::{JsonError, JsonObject};
use crate::species::SpeciesParams;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpeciesParseError {
	#[error("Could not parse species JSON: {0}")]
	Syntax(String),
	#[error(transparent)]
	Json(#[from] JsonError),
	#[error("Species {name:?}: {field} must not be negative, got {value}")]
	Negative { name: String, field: &'static str, value: f32 },
}

impl From<json::Error> for SpeciesParseError {
	fn from(err: json::Error) -> Self {
		Self::Syntax(err.to_string())
	}
}

/// Parse one species object:
///
/// ```json
/// { "name": "birch", "growthRate": 0.6, "tropismDecay": 1.0, "tropismStrength": 0.3,
///   "thicknessCoefficient": 0.08, "maxAge": 25.0, "agingRate": 1.5 }
/// ```
///
/// `agingRate` is optional and defaults to 1.
pub fn parse_species(text: &str) -> Result<SpeciesParams, SpeciesParseError> {
	let payload = json::parse(text)?;
	deserialize_species(&payload)
}

/// Parse a JSON list of species objects.
pub fn parse_species_library(text: &str) -> Result<Vec<SpeciesParams>, SpeciesParseError> {
	let payload = json::parse(text)?;
	let JsonValue::Array(list) = &payload else {
		return Err(JsonError::ValueIsNotObject(String::from("species list")).into());
	};

	list.iter()
		.enumerate()
		.map(|(index, value)| {
			deserialize_species(value).map_err(|err| match err {
				SpeciesParseError::Json(err) => SpeciesParseError::Json(err.in_list(index)),
				err => err,
			})
		})
		.collect()
}

fn deserialize_species(value: &JsonValue) -> Result<SpeciesParams, SpeciesParseError> {
	let obj = JsonObject::from_value(value, "species")?;

	let species = SpeciesParams {
		name: obj.get_str("name")?.to_owned(),
		growth_rate: obj.get_f32("growthRate")?,
		tropism_decay: obj.get_f32("tropismDecay")?,
		tropism_strength: obj.get_f32("tropismStrength")?,
		thickness_coefficient: obj.get_f32("thicknessCoefficient")?,
		max_age: obj.get_f32("maxAge")?,
		aging_rate: obj.get_opt_f32("agingRate")?.unwrap_or(1.0),
	};

	for (field, value) in [
		("growthRate", species.growth_rate),
		("maxAge", species.max_age),
		("agingRate", species.aging_rate),
	] {
		if value < 0.0 {
			return Err(SpeciesParseError::Negative {
				name: species.name,
				field,
				value,
			});
		}
	}

	tracing::debug!("Parsed species {:?}", species.name);
	Ok(species)
}
