#![forbid(unsafe_code)]
//! Runtime support for entity declarations generated by `entity_mapper`
//!
//! Every generated struct derives [`Entity`], which gives it a static [`EntityDef`] describing its table and columns along with a way to build itself from a [`Row`]
//!
//! The generated `mod.rs` declares each entity on a [`Database`], which is where the table-name prefix gets applied and where entities get bound to a live connection
//!
//! Reexports [`postgres::Error`] as SqlError and [`postgres::Row`], plus the `chrono` and `rust_decimal` crates the generated field types refer to
//!
//! [`Entity`]: ./trait.Entity.html
//! [`EntityDef`]: ./struct.EntityDef.html
//! [`Row`]: https://docs.rs/postgres/0.19/postgres/row/struct.Row.html
//! [`Database`]: ./struct.Database.html

// lets the derive's absolute paths resolve inside this crate too
extern crate self as entity_mapper_core;

//reexports
pub use entity_mapper_derive::*;
pub use postgres::{Error as SqlError, Row};

pub use chrono;
pub use rust_decimal;

mod database;
pub use database::{BoundEntity, Database, MappingError};

mod extension;
pub use extension::{Extension, ExtensionRegistry, NoExtension};

/// How a field takes part in its entity's identity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldMode {
	/// The single column key of the table
	PrimaryKey,
	/// Not null; also used for every member of a composite key
	Required,
	Optional,
}

/// Extra column constraints carried over from the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
	MaxLength(u32),
	Unique,
}

/// A single mapped column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
	/// the rust field name
	pub name: &'static str,
	/// the database column name
	pub column: &'static str,
	pub mode: FieldMode,
	pub constraints: &'static [Constraint],
	/// sql type the column is cast to when selected, for columns whose stored type cannot be read into the field type directly
	pub cast: Option<&'static str>,
}

impl FieldDef {
	pub fn is_unique(&self) -> bool {
		self.constraints.contains(&Constraint::Unique)
	}

	pub fn max_length(&self) -> Option<u32> {
		self.constraints.iter().find_map(|c| match c {
			Constraint::MaxLength(len) => Some(*len),
			Constraint::Unique => None,
		})
	}
}

/// Static description of an entity as it was declared
///
/// `table` is the unprefixed table name, the name actually used at runtime is chosen by [`Database::declare`]
///
/// [`Database::declare`]: ./struct.Database.html#method.declare
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityDef {
	pub name: &'static str,
	pub table: &'static str,
	pub fields: &'static [FieldDef],
	/// column names of a multi column key, in declaration order
	pub composite_key: Option<&'static [&'static str]>,
}

impl EntityDef {
	/// Columns making up the identity of the entity, in declaration order
	pub fn primary_key(&self) -> Vec<&'static str> {
		match self.composite_key {
			Some(members) => members.to_vec(),
			None => self
				.fields
				.iter()
				.filter(|f| f.mode == FieldMode::PrimaryKey)
				.map(|f| f.column)
				.collect(),
		}
	}

	/// Looks a field up by its rust name
	pub fn field(&self, name: &str) -> Option<&'static FieldDef> {
		self.fields.iter().find(|f| f.name == name)
	}

	pub fn columns(&self) -> impl Iterator<Item = &'static str> {
		self.fields.iter().map(|f| f.column)
	}
}

/// A table backed type, usually implemented with `#[derive(Entity)]`
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Entity)]
/// #[orm(table = "order_line", composite_key(order_id, line_no))]
/// pub struct OrderLine {
/// 	#[orm(required)]
/// 	pub order_id: i32,
/// 	#[orm(required)]
/// 	pub line_no: i16,
/// 	#[orm(optional, max_length = 40)]
/// 	pub note: Option<String>,
/// }
/// ```
pub trait Entity: Sized {
	const DEF: EntityDef;

	fn from_row(row: &Row) -> Result<Self, SqlError>;
}
