//! Column type to rust type mapping
use crate::sql_tree::{
	Constraint,
	IntWidth,
	TargetType::{self, *},
};

/// Maps a lowercase base type family to a rust type plus the constraints it implies
///
/// Rules are tried in order and the first match wins. `None` means the type has no mapping
pub fn map_type(base_type: &str, max_length: Option<u32>) -> Option<(TargetType, Vec<Constraint>)> {
	let typ = if base_type.contains("blob") || base_type == "varbinary" {
		Bytes
	} else if base_type.contains("char") {
		return Some((Str, max_length.map(Constraint::MaxLength).into_iter().collect()));
	} else if base_type == "date" {
		Date
	} else if base_type == "datetime" {
		DateTime
	} else if base_type == "time" {
		Time
	} else if base_type == "double" || base_type == "long" {
		Decimal
	} else if base_type.contains("int") {
		Integer(int_width(base_type))
	} else {
		match base_type {
			"text" => Str,
			"bool" | "boolean" => Bool,
			"numeric" | "decimal" => Decimal,
			"real" | "float" => Float,
			"timestamptz" => DateTimeUtc,
			_ => return None,
		}
	};
	Some((typ, Vec::new()))
}

fn int_width(base_type: &str) -> IntWidth {
	if base_type.contains("big") {
		IntWidth::I64
	} else if base_type.contains("small") || base_type.contains("tiny") {
		IntWidth::I16
	} else {
		IntWidth::I32
	}
}
