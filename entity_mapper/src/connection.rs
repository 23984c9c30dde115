use log::debug;
use postgres::{Client, NoTls, Statement};

use super::{
	pg_select_types::*,
	sql_tree::ColumnRecord,
	GenError,
};

/// Reads column metadata over a single connection
///
/// The connection is closed when the reader is dropped
pub struct SchemaReader {
	client: Client,
	columns_stmt: Statement,
}

impl SchemaReader {
	/// Connects with a postgres connection string (url or key=value form)
	pub fn connect(params: &str) -> Result<SchemaReader, GenError> {
		let client = Client::connect(params, NoTls)?;
		SchemaReader::new(client)
	}

	pub fn new(mut client: Client) -> Result<SchemaReader, GenError> {
		Ok(SchemaReader {
			columns_stmt: client.prepare(GET_COLUMNS)?,
			client,
		})
	}

	/// All columns of `schema` ordered by table then ordinal position
	///
	/// An unknown or empty schema gives back no rows
	pub fn read(&mut self, schema: &str) -> Result<Vec<ColumnRecord>, GenError> {
		let rows = self
			.client
			.query(&self.columns_stmt, &[&schema])?
			.iter()
			.map(ColumnRecord::from_row)
			.collect::<Result<Vec<_>, _>>()?;
		debug!("read {} columns from schema {}", rows.len(), schema);
		Ok(rows)
	}
}
