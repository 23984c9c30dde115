//! Primary key classification
use log::warn;

use crate::sql_tree::{ColumnRecord, FieldMode, KeySpec, TableGroup};

/// The mode of every column, in column order, plus how the key is declared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
	pub modes: Vec<FieldMode>,
	pub key: KeySpec,
}

/// Classifies the key of a table
///
/// A single key column becomes the `PrimaryKey` field. With several, every member is `Required` and the key is declared separately.
/// Tables without any key column give `None` and are reported as skipped
pub fn classify(table: &TableGroup) -> Option<Classification> {
	let pk: Vec<&ColumnRecord> = table.pk_columns().collect();
	let key = match pk.len() {
		0 => {
			warn!("skipping table {}: it has no primary key", table.name);
			return None;
		},
		1 => KeySpec::Inline,
		_ => KeySpec::Composite(pk.iter().map(|c| c.name.clone()).collect()),
	};

	let modes = table
		.columns
		.iter()
		.map(|column| {
			if column.is_primary && key == KeySpec::Inline {
				FieldMode::PrimaryKey
			} else if column.is_primary || !column.nullable {
				FieldMode::Required
			} else {
				FieldMode::Optional
			}
		})
		.collect();

	Some(Classification { modes, key })
}
