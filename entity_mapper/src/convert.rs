//! Builds entity descriptors out of catalog tables
//!
//! Nothing here touches the database or the file system, see [`output`] for writing
//!
//! [`output`]: ../output/index.html

pub mod keys;
pub mod names;
pub mod types;

use crate::{
	sql_tree::*,
	GenError,
};

/// Describes the entity for `table`
///
/// Gives `Ok(None)` for tables without a primary key. Every column is mapped with a fresh accumulator, nothing is carried over between tables
pub fn build_entity(table: &TableGroup, strip_prefix: &str) -> Result<Option<EntityDescriptor>, GenError> {
	let classification = match keys::classify(table) {
		Some(classification) => classification,
		None => return Ok(None),
	};

	let invalid = |ident: &str| GenError::InvalidIdentifier {
		table: table.name.clone(),
		ident: ident.to_owned(),
	};
	let (normalized, class_name) = names::normalize(&table.name, strip_prefix);
	let class_name = names::class_ident(&class_name).ok_or_else(|| invalid(&class_name))?;
	let module = names::snake_ident(normalized).ok_or_else(|| invalid(normalized))?;

	let mut fields: Vec<FieldDescriptor> = Vec::with_capacity(table.columns.len());
	for (column, mode) in table.columns.iter().zip(classification.modes) {
		let (typ, mut constraints) =
			types::map_type(&column.base_type, column.max_length).ok_or_else(|| GenError::UnmappedType {
				table: table.name.clone(),
				column: column.name.clone(),
				base_type: column.base_type.clone(),
			})?;
		if column.is_unique && !column.is_primary {
			constraints.push(Constraint::Unique);
		}

		let ident = names::snake_ident(&column.name).ok_or_else(|| invalid(&column.name))?;
		if let Some(other) = fields.iter().find(|f| f.ident == ident) {
			return Err(GenError::DuplicateField {
				table: table.name.clone(),
				column: column.name.clone(),
				other: other.column.clone(),
				field: ident.to_string(),
			});
		}

		fields.push(FieldDescriptor {
			column: column.name.clone(),
			ident,
			mode,
			typ,
			constraints,
		});
	}

	Ok(Some(EntityDescriptor {
		source_table: table.name.clone(),
		class_name,
		table: normalized.to_owned(),
		module,
		fields,
		key: classification.key,
	}))
}
