use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenError {
	/// Connecting or running the catalog query failed, nothing gets written
	#[error("database error: {0}")]
	Sql(#[from] postgres::Error),
	#[error("table `{table}`, column `{column}`: no rust type for base type `{base_type}`")]
	UnmappedType {
		table: String,
		column: String,
		base_type: String,
	},
	#[error("table `{table}`: `{ident}` is not a usable rust identifier")]
	InvalidIdentifier { table: String, ident: String },
	#[error("table `{table}`: columns `{other}` and `{column}` both become field `{field}`")]
	DuplicateField {
		table: String,
		column: String,
		other: String,
		field: String,
	},
	#[error("table `{table}`: {kind} `{name}` is already taken by {other}")]
	Collision {
		table: String,
		kind: &'static str,
		name: String,
		other: String,
	},
	/// Aborts the run, the aggregator is not written
	#[error("failed to write `{}`: {source}", path.display())]
	Write { path: PathBuf, source: io::Error },
}

impl GenError {
	/// Whether the error only concerns a single table and generation can carry on
	pub fn is_table_error(&self) -> bool {
		!matches!(self, GenError::Sql(_) | GenError::Write { .. })
	}
}
