//! A simple model of the catalog rows and of the entities generated from them

use proc_macro2::Ident;

/// One row of column metadata, in catalog order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRecord {
	pub table: String,
	pub nullable: bool,
	pub name: String,
	/// the full declared type, e.g. `character varying(100)`
	pub column_type: String,
	pub is_primary: bool,
	pub is_unique: bool,
	/// member of a non unique index; read but currently unused
	pub is_indexed: bool,
	/// lowercase type family, e.g. `varchar`, `blob`, `date`
	pub base_type: String,
	pub max_length: Option<u32>,
}

/// A table and its columns in ordinal order, never empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableGroup {
	pub name: String,
	pub columns: Vec<ColumnRecord>,
}

impl TableGroup {
	/// Primary key columns in their original order
	pub fn pk_columns(&self) -> impl Iterator<Item = &ColumnRecord> {
		self.columns.iter().filter(|c| c.is_primary)
	}
}

/// Splits catalog rows into tables
///
/// Rows must already be ordered by table then ordinal position, only consecutive rows are grouped together
pub fn group_tables(rows: Vec<ColumnRecord>) -> Vec<TableGroup> {
	let mut tables: Vec<TableGroup> = Vec::new();
	for row in rows {
		match tables.last_mut() {
			Some(table) if table.name == row.table => table.columns.push(row),
			_ => tables.push(TableGroup {
				name: row.table.clone(),
				columns: vec![row],
			}),
		}
	}
	tables
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldMode {
	PrimaryKey,
	Required,
	Optional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntWidth {
	I16,
	I32,
	I64,
}

/// The rust type a column is mapped to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetType {
	Bytes,
	Str,
	Date,
	DateTime,
	Time,
	Decimal,
	Integer(IntWidth),
	Bool,
	Float,
	DateTimeUtc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
	MaxLength(u32),
	Unique,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
	pub column: String,
	pub ident: Ident,
	pub mode: FieldMode,
	pub typ: TargetType,
	pub constraints: Vec<Constraint>,
}

/// How the identity of an entity is declared
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySpec {
	/// carried by the single `PrimaryKey` field
	Inline,
	/// two or more `Required` columns, in column order
	Composite(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDescriptor {
	/// the table name as found in the catalog
	pub source_table: String,
	pub class_name: Ident,
	/// the table name with the prefix removed
	pub table: String,
	pub module: Ident,
	pub fields: Vec<FieldDescriptor>,
	pub key: KeySpec,
}

impl EntityDescriptor {
	pub fn binding(&self) -> EntityBinding {
		EntityBinding {
			class_name: self.class_name.clone(),
			module: self.module.clone(),
			table: self.table.clone(),
		}
	}
}

/// What the aggregator keeps of each generated entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityBinding {
	pub class_name: Ident,
	pub module: Ident,
	pub table: String,
}

/// The aggregating `mod.rs`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleDescriptor {
	pub entities: Vec<EntityBinding>,
}
