#![allow(dead_code)]

use entity_mapper::sql_tree::ColumnRecord;

pub fn column(table: &str, name: &str, base_type: &str) -> ColumnRecord {
	ColumnRecord {
		table: table.to_owned(),
		nullable: false,
		name: name.to_owned(),
		column_type: base_type.to_owned(),
		is_primary: false,
		is_unique: false,
		is_indexed: false,
		base_type: base_type.to_owned(),
		max_length: None,
	}
}

pub fn primary(mut c: ColumnRecord) -> ColumnRecord {
	c.is_primary = true;
	c
}

pub fn nullable(mut c: ColumnRecord) -> ColumnRecord {
	c.nullable = true;
	c
}

pub fn account_rows() -> Vec<ColumnRecord> {
	let mut email = column("test_account", "email", "varchar");
	email.is_unique = true;
	email.max_length = Some(100);
	vec![
		primary(column("test_account", "id", "int")),
		email,
		nullable(column("test_account", "login_count", "int")),
	]
}

pub fn log_rows() -> Vec<ColumnRecord> {
	vec![
		column("test_log", "created", "datetime"),
		nullable(column("test_log", "message", "text")),
	]
}

pub fn order_line_rows() -> Vec<ColumnRecord> {
	let mut note = nullable(column("test_order_line", "Note", "varchar"));
	note.max_length = Some(40);
	vec![
		primary(column("test_order_line", "order_id", "int")),
		primary(column("test_order_line", "line_no", "smallint")),
		note,
	]
}

pub fn catalog() -> Vec<ColumnRecord> {
	let mut rows = account_rows();
	rows.extend(log_rows());
	rows.extend(order_line_rows());
	rows
}

/// One column of every mapped type family
pub fn sample_rows() -> Vec<ColumnRecord> {
	let table = "test_sample";
	vec![
		primary(column(table, "id", "bigint")),
		column(table, "data", "blob"),
		column(table, "day", "date"),
		column(table, "at", "datetime"),
		column(table, "clock", "time"),
		column(table, "amount", "double"),
		column(table, "flag", "boolean"),
		column(table, "ratio", "real"),
		column(table, "seen", "timestamptz"),
		column(table, "type", "tinyint"),
		nullable(column(table, "total", "numeric")),
	]
}

/// Tables named after items the generated code refers to
pub fn shadowing_rows() -> Vec<ColumnRecord> {
	[
		"clone",
		"database",
		"debug",
		"entity",
		"extension",
		"extension_registry",
		"mapping_error",
		"option",
		"result",
		"string",
		"vec",
	]
	.iter()
	.flat_map(|table| {
		vec![
			primary(column(table, "id", "int")),
			nullable(column(table, "name", "text")),
			nullable(column(table, "payload", "blob")),
		]
	})
	.collect()
}
