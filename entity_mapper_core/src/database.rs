use std::collections::HashMap;

use log::{debug, info};
use postgres::{Client, NoTls};
use thiserror::Error;

use super::{Entity, EntityDef, Extension, ExtensionRegistry, NoExtension, SqlError};

/// Columns of a table visible on the connection's search path
const TABLE_COLUMNS: &str = "SELECT column_name::text
FROM information_schema.columns
WHERE table_name = $1 AND
	table_schema = ANY(current_schemas(false))
ORDER BY ordinal_position";

#[derive(Debug, Error)]
pub enum MappingError {
	#[error("database error: {0}")]
	Sql(#[from] SqlError),
	#[error("mappings need a connection, call bind first")]
	NotBound,
	#[error("mappings are already generated, `{0}` can no longer be declared")]
	AlreadyMapped(String),
	#[error("entity `{0}` is declared twice")]
	DuplicateEntity(String),
	#[error("there is no generated entity called `{0}`")]
	UnknownEntity(String),
	#[error("table `{table}` for entity `{entity}` does not exist")]
	MissingTable { entity: String, table: String },
	#[error("table `{table}` has no column `{column}` used by entity `{entity}`")]
	MissingColumn {
		entity: String,
		table: String,
		column: String,
	},
	#[error("entity `{0}` was never declared")]
	Undeclared(&'static str),
}

/// An entity together with the table name it was bound to
#[derive(Debug, Clone)]
pub struct BoundEntity {
	pub def: EntityDef,
	table: String,
}

impl BoundEntity {
	/// The prefixed table name
	pub fn table(&self) -> &str {
		&self.table
	}
}

/// Binds generated entities to a live database
///
/// Table names are only rewritten when an entity is declared, so the same generated code works with any prefix.
/// The generated `init_mappings` drives the whole sequence:
///
/// ```ignore
/// let mut db = Database::new(extensions);
/// db.declare::<account::Account>(prefix)?;
/// db.bind(params)?;
/// db.generate_mappings()?;
/// ```
pub struct Database {
	entities: Vec<BoundEntity>,
	pending: ExtensionRegistry,
	extensions: HashMap<&'static str, Box<dyn Extension>>,
	client: Option<Client>,
	mapped: bool,
}

impl Database {
	pub fn new(extensions: ExtensionRegistry) -> Self {
		Self {
			entities: Vec::new(),
			pending: extensions,
			extensions: HashMap::new(),
			client: None,
			mapped: false,
		}
	}

	/// Adds `E` to the mapping, bound to `prefix` followed by its declared table name
	pub fn declare<E: Entity>(&mut self, prefix: &str) -> Result<&mut Self, MappingError> {
		let def = E::DEF;
		if self.mapped {
			return Err(MappingError::AlreadyMapped(def.name.to_owned()));
		}
		if self.entities.iter().any(|e| e.def.name == def.name) {
			return Err(MappingError::DuplicateEntity(def.name.to_owned()));
		}
		let table = format!("{}{}", prefix, def.table);
		debug!("declared {} on table {}", def.name, table);
		self.entities.push(BoundEntity { def, table });
		Ok(self)
	}

	/// Connects using a postgres connection string (url or key=value form)
	pub fn bind(&mut self, params: &str) -> Result<(), MappingError> {
		self.bind_client(Client::connect(params, NoTls)?);
		Ok(())
	}

	pub fn bind_client(&mut self, client: Client) {
		self.client = Some(client);
	}

	/// Checks every declared entity against the database and resolves extensions
	///
	/// Calling it again once it succeeded does nothing
	pub fn generate_mappings(&mut self) -> Result<(), MappingError> {
		if self.mapped {
			return Ok(());
		}
		let client = self.client.as_mut().ok_or(MappingError::NotBound)?;
		let stmt = client.prepare(TABLE_COLUMNS)?;
		for entity in &self.entities {
			let columns = client
				.query(&stmt, &[&entity.table])?
				.iter()
				.map(|row| row.try_get(0))
				.collect::<Result<Vec<String>, _>>()?;
			check_columns(entity, &columns)?;
		}
		self.finish_mappings();
		Ok(())
	}

	fn finish_mappings(&mut self) {
		for entity in &self.entities {
			let extension = self.pending.take(entity.def.name);
			extension.on_bind(entity);
			debug!("mapped {}", extension.describe(entity));
			self.extensions.insert(entity.def.name, extension);
		}
		self.mapped = true;
		info!("generated mappings for {} entities", self.entities.len());
	}

	pub fn is_mapped(&self) -> bool {
		self.mapped
	}

	pub fn entities(&self) -> &[BoundEntity] {
		&self.entities
	}

	/// The table `E` is bound to, if it was declared
	pub fn table_of<E: Entity>(&self) -> Option<&str> {
		self.entities
			.iter()
			.find(|e| e.def.name == E::DEF.name)
			.map(BoundEntity::table)
	}

	/// The extension resolved for `entity`, [`NoExtension`] before mappings are generated
	///
	/// [`NoExtension`]: ./struct.NoExtension.html
	pub fn extension(&self, entity: &str) -> &dyn Extension {
		match self.extensions.get(entity) {
			Some(extension) => extension.as_ref(),
			None => &NoExtension,
		}
	}

	pub fn client(&mut self) -> Option<&mut Client> {
		self.client.as_mut()
	}

	/// Loads every row of `E`'s table, ordered by its key
	pub fn select_all<E: Entity>(&mut self) -> Result<Vec<E>, MappingError> {
		let table = self
			.table_of::<E>()
			.ok_or(MappingError::Undeclared(E::DEF.name))?
			.to_owned();
		let client = self.client.as_mut().ok_or(MappingError::NotBound)?;
		let sql = select_sql(&E::DEF, &table);
		client
			.query(sql.as_str(), &[])?
			.iter()
			.map(|row| E::from_row(row).map_err(MappingError::from))
			.collect()
	}
}

impl std::fmt::Debug for Database {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Database")
			.field("entities", &self.entities)
			.field("bound", &self.client.is_some())
			.field("mapped", &self.mapped)
			.finish()
	}
}

fn check_columns(entity: &BoundEntity, columns: &[String]) -> Result<(), MappingError> {
	if columns.is_empty() {
		return Err(MappingError::MissingTable {
			entity: entity.def.name.to_owned(),
			table: entity.table.clone(),
		});
	}
	match entity.def.columns().find(|c| !columns.iter().any(|have| have.as_str() == *c)) {
		Some(missing) => Err(MappingError::MissingColumn {
			entity: entity.def.name.to_owned(),
			table: entity.table.clone(),
			column: missing.to_owned(),
		}),
		None => Ok(()),
	}
}

fn select_sql(def: &EntityDef, table: &str) -> String {
	let columns: Vec<_> = def
		.fields
		.iter()
		.map(|f| match f.cast {
			Some(cast) => format!("{}::{} AS {}", quote_ident(f.column), cast, quote_ident(f.column)),
			None => quote_ident(f.column),
		})
		.collect();
	let key: Vec<_> = def.primary_key().into_iter().map(quote_ident).collect();
	format!(
		"SELECT {} FROM {} ORDER BY {}",
		columns.join(", "),
		quote_ident(table),
		key.join(", ")
	)
}

fn quote_ident(name: &str) -> String {
	format!("\"{}\"", name.replace('"', "\"\""))
}
