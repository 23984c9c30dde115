//! The catalog query and the conversion of its rows
use postgres::{Error as SqlError, Row};

use super::sql_tree::ColumnRecord;

/// Column metadata of one schema, ordered by table then ordinal position
///
/// `basetype` is folded into the lowercase type families the type mapping works with.
/// The one byte internal `"char"` type only decodes as `i8` and becomes `single_byte`, which has no mapping
pub const GET_COLUMNS: &str = "SELECT c.table_name::text AS tbl,
	(c.is_nullable = 'YES') AS optional,
	c.column_name::text AS col,
	(c.data_type || COALESCE('(' || c.character_maximum_length || ')', ''))::text AS typ,
	EXISTS (
		SELECT 1
		FROM information_schema.table_constraints tc
		JOIN information_schema.key_column_usage kcu
			ON kcu.constraint_schema = tc.constraint_schema AND
			kcu.constraint_name = tc.constraint_name
		WHERE tc.constraint_type = 'PRIMARY KEY' AND
			tc.table_schema = c.table_schema AND
			tc.table_name = c.table_name AND
			kcu.column_name = c.column_name
	) AS primarii,
	EXISTS (
		SELECT 1
		FROM information_schema.table_constraints tc
		JOIN information_schema.key_column_usage kcu
			ON kcu.constraint_schema = tc.constraint_schema AND
			kcu.constraint_name = tc.constraint_name
		WHERE tc.constraint_type = 'UNIQUE' AND
			tc.table_schema = c.table_schema AND
			tc.table_name = c.table_name AND
			kcu.column_name = c.column_name AND
			(SELECT count(*)
				FROM information_schema.key_column_usage k2
				WHERE k2.constraint_schema = tc.constraint_schema AND
					k2.constraint_name = tc.constraint_name) = 1
	) AS uniquei,
	EXISTS (
		SELECT 1
		FROM pg_catalog.pg_index i
		JOIN pg_catalog.pg_class t ON t.oid = i.indrelid
		JOIN pg_catalog.pg_namespace n ON n.oid = t.relnamespace
		JOIN pg_catalog.pg_attribute a ON a.attrelid = t.oid AND a.attnum = ANY(i.indkey)
		WHERE NOT i.indisunique AND
			n.nspname = c.table_schema AND
			t.relname = c.table_name AND
			a.attname = c.column_name
	) AS non_unique,
	(CASE c.data_type
		WHEN 'character varying' THEN 'varchar'
		WHEN 'character' THEN 'char'
		WHEN '\"char\"' THEN 'single_byte'
		WHEN 'bytea' THEN 'blob'
		WHEN 'timestamp without time zone' THEN 'datetime'
		WHEN 'timestamp with time zone' THEN 'timestamptz'
		WHEN 'time without time zone' THEN 'time'
		WHEN 'double precision' THEN 'double'
		WHEN 'integer' THEN 'int'
		ELSE c.data_type
	END)::text AS basetype,
	c.character_maximum_length::int4 AS maxlen
FROM information_schema.columns c
WHERE c.table_schema = $1
ORDER BY tbl, c.ordinal_position";

impl ColumnRecord {
	pub fn from_row(row: &Row) -> Result<Self, SqlError> {
		let max_length: Option<i32> = row.try_get("maxlen")?;
		Ok(ColumnRecord {
			table: row.try_get("tbl")?,
			nullable: row.try_get("optional")?,
			name: row.try_get("col")?,
			column_type: row.try_get("typ")?,
			is_primary: row.try_get("primarii")?,
			is_unique: row.try_get("uniquei")?,
			is_indexed: row.try_get("non_unique")?,
			base_type: row.try_get("basetype")?,
			max_length: max_length.and_then(|len| u32::try_from(len).ok()),
		})
	}
}
