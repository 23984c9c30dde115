//! Writing the generated module to disk
use std::{
	collections::HashMap,
	fs,
	path::{Path, PathBuf},
};

use log::{error, info};
use proc_macro2::TokenStream;
use syn::ext::IdentExt;

use super::{
	ast_convert::ConvertToAst,
	convert::build_entity,
	format_rust,
	sql_tree::*,
	GenError,
};

/// Content of the helper module, the same for every schema
pub const CLASS_PROPERTY: &str = include_str!("../templates/class_property.rs");

const HELPER_MODULE: &str = "class_property";
const AGGREGATOR_MODULE: &str = "mod";
/// Brought into scope by the aggregator next to the entities
const HELPER_TYPE: &str = "ClassProperty";

/// What a run produced
#[derive(Debug, Default)]
pub struct GenerationReport {
	/// entities written, in table order
	pub generated: Vec<EntityBinding>,
	/// tables without a primary key
	pub skipped: Vec<String>,
	/// tables that could not be generated
	pub failed: Vec<GenError>,
	pub files: Vec<PathBuf>,
}

impl GenerationReport {
	pub fn is_success(&self) -> bool {
		self.failed.is_empty()
	}
}

/// Writes one file per entity, the helper module and the aggregating `mod.rs` into a directory
#[derive(Debug, Clone)]
pub struct Generator {
	out_dir: PathBuf,
	strip_prefix: String,
	format: bool,
}

impl Generator {
	pub fn new(out_dir: impl Into<PathBuf>) -> Self {
		Generator {
			out_dir: out_dir.into(),
			strip_prefix: String::new(),
			format: true,
		}
	}

	/// Prefix removed from table names before naming entities
	pub fn strip_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.strip_prefix = prefix.into();
		self
	}

	/// Whether to run the output through rustfmt
	pub fn format(mut self, format: bool) -> Self {
		self.format = format;
		self
	}

	pub fn out_dir(&self) -> &Path {
		&self.out_dir
	}

	/// Generates everything for the given catalog rows
	///
	/// Rows have to be ordered by table then ordinal position. No rows means nothing is written.
	/// Tables that fail are reported and left out, a failed write stops the run
	pub fn generate(&self, rows: Vec<ColumnRecord>) -> Result<GenerationReport, GenError> {
		let mut report = GenerationReport::default();
		if rows.is_empty() {
			info!("no columns found, nothing to generate");
			return Ok(report);
		}

		fs::create_dir_all(&self.out_dir).map_err(|source| GenError::Write {
			path: self.out_dir.clone(),
			source,
		})?;

		let mut claimed = Claimed::default();
		for table in group_tables(rows) {
			let entity = match build_entity(&table, &self.strip_prefix).and_then(|e| claimed.claim(e)) {
				Ok(Some(entity)) => entity,
				Ok(None) => {
					report.skipped.push(table.name);
					continue;
				},
				Err(e) => {
					error!("{}", e);
					report.failed.push(e);
					continue;
				},
			};

			let header = format!(
				"// @generated by entity_mapper from table `{}`, do not edit",
				entity.source_table
			);
			let path = self.module_path(&entity.module.unraw().to_string());
			self.write(&path, &self.render(&header, entity.to_rust_ast()))?;
			report.files.push(path);
			report.generated.push(entity.binding());
		}

		let path = self.module_path(HELPER_MODULE);
		self.write(&path, CLASS_PROPERTY)?;
		report.files.push(path);

		let module = ModuleDescriptor {
			entities: report.generated.clone(),
		};
		let path = self.module_path(AGGREGATOR_MODULE);
		self.write(&path, &self.render("// @generated by entity_mapper, do not edit", module.to_rust_ast()))?;
		report.files.push(path);

		info!(
			"generated {} entities, skipped {} tables, {} failed",
			report.generated.len(),
			report.skipped.len(),
			report.failed.len()
		);
		Ok(report)
	}

	fn module_path(&self, module: &str) -> PathBuf {
		self.out_dir.join(format!("{}.rs", module))
	}

	fn render(&self, header: &str, tokens: TokenStream) -> String {
		let code = tokens.to_string();
		let code = if self.format {
			format_rust(&code)
		} else {
			code
		};
		format!("{}\n{}\n", header, code.trim_end())
	}

	fn write(&self, path: &Path, contents: &str) -> Result<(), GenError> {
		fs::write(path, contents).map_err(|source| GenError::Write {
			path: path.to_owned(),
			source,
		})?;
		info!("wrote {}", path.display());
		Ok(())
	}
}

/// Class and module names already used during a run, with the table that took them
///
/// Classes and modules share the aggregator's type namespace, so a class may not reuse any module name either
#[derive(Default)]
struct Claimed {
	classes: HashMap<String, String>,
	modules: HashMap<String, String>,
}

impl Claimed {
	/// Claims the names of `entity`, the first table to use a name keeps it
	fn claim(&mut self, entity: Option<EntityDescriptor>) -> Result<Option<EntityDescriptor>, GenError> {
		let entity = match entity {
			Some(entity) => entity,
			None => return Ok(None),
		};
		let class_name = entity.class_name.to_string();
		let module = entity.module.unraw().to_string();
		let collision = |kind: &'static str, name: &str, other: String| GenError::Collision {
			table: entity.source_table.clone(),
			kind,
			name: name.to_owned(),
			other,
		};

		if module == HELPER_MODULE || module == AGGREGATOR_MODULE {
			return Err(collision("module", &module, "a generated module".to_owned()));
		}
		if class_name == HELPER_TYPE {
			return Err(collision("entity", &class_name, "the helper type".to_owned()));
		}
		if let Some(other) = self.classes.get(&class_name).or_else(|| self.modules.get(&class_name)) {
			return Err(collision("entity", &class_name, format!("table `{}`", other)));
		}
		if let Some(other) = self.modules.get(&module).or_else(|| self.classes.get(&module)) {
			return Err(collision("module", &module, format!("table `{}`", other)));
		}
		if class_name == module {
			return Err(collision("entity", &class_name, "its own module".to_owned()));
		}

		self.classes.insert(class_name, entity.source_table.clone());
		self.modules.insert(module, entity.source_table.clone());
		Ok(Some(entity))
	}
}
