use std::{fs, path::Path};

mod common;

use common::*;
use entity_mapper::{
	output::CLASS_PROPERTY,
	sql_tree::ColumnRecord,
	GenError,
	GenerationReport,
	Generator,
};
use syn::{Attribute, Expr, ExprLit, Field, GenericArgument, Item, ItemStruct, Lit, Stmt, Type};
use tempfile::TempDir;

fn generate(rows: Vec<ColumnRecord>) -> (TempDir, GenerationReport) {
	let dir = tempfile::tempdir().unwrap();
	let report = Generator::new(dir.path())
		.strip_prefix("test_")
		.format(false)
		.generate(rows)
		.unwrap();
	(dir, report)
}

fn parse(dir: &Path, module: &str) -> syn::File {
	let code = fs::read_to_string(dir.join(format!("{}.rs", module))).unwrap();
	syn::parse_file(&code).unwrap_or_else(|e| panic!("{}.rs does not parse: {}\n{}", module, e, code))
}

fn find_struct<'a>(file: &'a syn::File, name: &str) -> &'a ItemStruct {
	file.items
		.iter()
		.find_map(|item| match item {
			Item::Struct(s) if s.ident == name => Some(s),
			_ => None,
		})
		.unwrap_or_else(|| panic!("no struct {}", name))
}

/// The arguments of every `#[orm(..)]` attribute, `key=value` or `key(a,b)`
fn orm_args(attrs: &[Attribute]) -> Vec<String> {
	let mut args = Vec::new();
	for attr in attrs.iter().filter(|a| a.path().is_ident("orm")) {
		attr.parse_nested_meta(|meta| {
			let key = meta.path.get_ident().unwrap().to_string();
			if meta.input.peek(syn::Token![=]) {
				let value = match meta.value()?.parse::<Lit>()? {
					Lit::Str(s) => s.value(),
					Lit::Int(i) => i.base10_digits().to_owned(),
					other => panic!("unexpected literal {:?}", other),
				};
				args.push(format!("{}={}", key, value));
			} else if meta.input.peek(syn::token::Paren) {
				let mut members = Vec::new();
				meta.parse_nested_meta(|member| {
					members.push(member.path.get_ident().unwrap().to_string());
					Ok(())
				})?;
				args.push(format!("{}({})", key, members.join(",")));
			} else {
				args.push(key);
			}
			Ok(())
		})
		.unwrap();
	}
	args
}

fn typ(code: &str) -> Type {
	syn::parse_str(code).unwrap()
}

fn assert_field(field: &Field, name: &str, args: &[&str], ty: &str) {
	assert_eq!(field.ident.as_ref().unwrap(), name);
	assert_eq!(orm_args(&field.attrs), args, "attributes of {}", name);
	assert_eq!(field.ty, typ(ty), "type of {}", name);
}

fn entity_names(file: &syn::File) -> Vec<String> {
	let names = file
		.items
		.iter()
		.find_map(|item| match item {
			Item::Const(c) if c.ident == "ENTITY_NAMES" => Some(&*c.expr),
			_ => None,
		})
		.expect("no ENTITY_NAMES");
	let array = match names {
		Expr::Reference(r) => match &*r.expr {
			Expr::Array(array) => array,
			other => panic!("unexpected {:?}", other),
		},
		other => panic!("unexpected {:?}", other),
	};
	array
		.elems
		.iter()
		.map(|e| match e {
			Expr::Lit(ExprLit { lit: Lit::Str(s), .. }) => s.value(),
			other => panic!("unexpected {:?}", other),
		})
		.collect()
}

/// Paths of the entities `init_mappings` declares, e.g. `account::Account`
fn declared(file: &syn::File) -> Vec<String> {
	let init = file
		.items
		.iter()
		.find_map(|item| match item {
			Item::Fn(f) if f.sig.ident == "init_mappings" => Some(f),
			_ => None,
		})
		.expect("no init_mappings");
	init.block
		.stmts
		.iter()
		.filter_map(|stmt| match stmt {
			Stmt::Expr(Expr::Try(t), _) => match &*t.expr {
				Expr::MethodCall(call) if call.method == "declare" => call.turbofish.as_ref(),
				_ => None,
			},
			_ => None,
		})
		.map(|turbofish| match turbofish.args.first() {
			Some(GenericArgument::Type(Type::Path(p))) => p
				.path
				.segments
				.iter()
				.map(|s| s.ident.to_string())
				.collect::<Vec<_>>()
				.join("::"),
			other => panic!("unexpected {:?}", other),
		})
		.collect()
}

#[test]
fn account_entity() {
	let (dir, report) = generate(account_rows());
	assert!(report.is_success());

	let file = parse(dir.path(), "account");
	let account = find_struct(&file, "Account");
	assert_eq!(orm_args(&account.attrs), ["table=account"]);

	let fields: Vec<&Field> = account.fields.iter().collect();
	assert_eq!(fields.len(), 3);
	assert_field(fields[0], "id", &["primary_key"], "i32");
	assert_field(fields[1], "email", &["required", "max_length=100", "unique"], "::std::string::String");
	assert_field(fields[2], "login_count", &["optional"], "::core::option::Option<i32>");

	let code = fs::read_to_string(dir.path().join("account.rs")).unwrap();
	assert!(code.starts_with("// @generated by entity_mapper from table `test_account`"));
}

#[test]
fn composite_key_entity() {
	let (dir, report) = generate(order_line_rows());
	assert!(report.is_success());

	let file = parse(dir.path(), "order_line");
	let order_line = find_struct(&file, "OrderLine");
	assert_eq!(
		orm_args(&order_line.attrs),
		["table=order_line", "composite_key(order_id,line_no)"]
	);

	let fields: Vec<&Field> = order_line.fields.iter().collect();
	assert_field(fields[0], "order_id", &["required"], "i32");
	assert_field(fields[1], "line_no", &["required"], "i16");
	assert_field(
		fields[2],
		"note",
		&["optional", "column=Note", "max_length=40"],
		"::core::option::Option<::std::string::String>",
	);
}

#[test]
fn keyless_tables_are_skipped() {
	let (dir, report) = generate(catalog());
	assert!(report.is_success());
	assert_eq!(report.skipped, ["test_log"]);
	assert!(!dir.path().join("log.rs").exists());

	let generated: Vec<String> = report.generated.iter().map(|e| e.class_name.to_string()).collect();
	assert_eq!(generated, ["Account", "OrderLine"]);
}

#[test]
fn aggregator_declares_every_entity_once() {
	let (dir, report) = generate(catalog());
	assert_eq!(report.files.len(), 4);

	let module = parse(dir.path(), "mod");
	assert_eq!(entity_names(&module), ["Account", "OrderLine"]);
	assert_eq!(declared(&module), ["account::Account", "order_line::OrderLine"]);
	for name in ["init_mappings", "extension_registry"] {
		assert!(
			module
				.items
				.iter()
				.any(|item| matches!(item, Item::Fn(f) if f.sig.ident == name)),
			"no {}",
			name
		);
	}
}

#[test]
fn helper_module_is_written_verbatim() {
	let (dir, _) = generate(account_rows());
	let helper = fs::read_to_string(dir.path().join("class_property.rs")).unwrap();
	assert_eq!(helper, CLASS_PROPERTY);
	find_struct(&parse(dir.path(), "class_property"), "ClassProperty");
}

#[test]
fn output_is_reproducible() {
	let (first, _) = generate(catalog());
	let (second, report) = generate(catalog());
	for path in &report.files {
		let name = path.file_name().unwrap();
		assert_eq!(
			fs::read(first.path().join(name)).unwrap(),
			fs::read(second.path().join(name)).unwrap(),
			"{:?} differs between runs",
			name
		);
	}
}

#[test]
fn rerunning_into_the_same_directory_overwrites() {
	let dir = tempfile::tempdir().unwrap();
	let generator = Generator::new(dir.path()).strip_prefix("test_").format(false);
	generator.generate(catalog()).unwrap();
	let before = fs::read(dir.path().join("mod.rs")).unwrap();
	generator.generate(catalog()).unwrap();
	assert_eq!(fs::read(dir.path().join("mod.rs")).unwrap(), before);
}

#[test]
fn no_rows_writes_nothing() {
	let dir = tempfile::tempdir().unwrap();
	let out = dir.path().join("out");
	let report = Generator::new(&out).generate(Vec::new()).unwrap();
	assert!(report.files.is_empty());
	assert!(report.generated.is_empty());
	assert!(!out.exists());
}

#[test]
fn colliding_names_keep_the_first_table() {
	let mut rows = vec![
		primary(column("account", "id", "bigint")),
		primary(column("test_mod", "id", "int")),
	];
	rows.extend(account_rows());
	let (dir, report) = generate(rows);

	assert_eq!(report.failed.len(), 2);
	assert!(matches!(
		&report.failed[0],
		GenError::Collision { table, kind: "module", name, .. } if table == "test_mod" && name == "mod"
	));
	assert!(matches!(
		&report.failed[1],
		GenError::Collision { table, kind: "entity", name, .. } if table == "test_account" && name == "Account"
	));

	let account = parse(dir.path(), "account");
	assert_field(find_struct(&account, "Account").fields.iter().next().unwrap(), "id", &["primary_key"], "i64");
	assert_eq!(entity_names(&parse(dir.path(), "mod")), ["Account"]);
}

#[test]
fn unmapped_types_only_fail_their_table() {
	let mut rows = account_rows();
	rows.push(primary(column("test_shape", "id", "int")));
	rows.push(column("test_shape", "outline", "geometry"));
	let (dir, report) = generate(rows);

	assert!(!report.is_success());
	assert!(matches!(
		&report.failed[..],
		[GenError::UnmappedType { table, column, base_type }]
			if table == "test_shape" && column == "outline" && base_type == "geometry"
	));
	assert!(!dir.path().join("shape.rs").exists());

	let module = parse(dir.path(), "mod");
	assert_eq!(entity_names(&module), ["Account"]);
	assert_eq!(declared(&module), ["account::Account"]);
}

#[test]
fn field_types() {
	let (dir, report) = generate(sample_rows());
	assert!(report.is_success());

	let file = parse(dir.path(), "sample");
	let expected = [
		("id", "i64"),
		("data", "::std::vec::Vec<u8>"),
		("day", "::entity_mapper_core::chrono::NaiveDate"),
		("at", "::entity_mapper_core::chrono::NaiveDateTime"),
		("clock", "::entity_mapper_core::chrono::NaiveTime"),
		("amount", "::entity_mapper_core::rust_decimal::Decimal"),
		("flag", "bool"),
		("ratio", "f32"),
		("seen", "::entity_mapper_core::chrono::DateTime<::entity_mapper_core::chrono::Utc>"),
		("r#type", "i16"),
		("total", "::core::option::Option<::entity_mapper_core::rust_decimal::Decimal>"),
	];
	let sample = find_struct(&file, "Sample");
	assert_eq!(sample.fields.len(), expected.len());
	for (field, (name, ty)) in sample.fields.iter().zip(expected) {
		assert_eq!(field.ident.as_ref().unwrap(), &syn::parse_str::<syn::Ident>(name).unwrap());
		assert_eq!(field.ty, typ(ty), "type of {}", name);
	}
}

#[test]
fn decimal_fields_are_selected_as_numeric() {
	let (dir, _) = generate(sample_rows());
	let file = parse(dir.path(), "sample");
	for field in &find_struct(&file, "Sample").fields {
		let name = field.ident.as_ref().unwrap();
		let casts = orm_args(&field.attrs).contains(&"cast=numeric".to_owned());
		assert_eq!(casts, name == "amount" || name == "total", "cast on {}", name);
	}
}

#[test]
fn names_of_runtime_items_are_usable_as_tables() {
	let (dir, report) = generate(shadowing_rows());
	assert!(report.is_success(), "{:?}", report.failed);
	assert_eq!(report.generated.len(), 11);

	let entity = parse(dir.path(), "entity");
	assert!(!entity.items.iter().any(|item| matches!(item, Item::Use(_))));
	assert_field(
		find_struct(&entity, "Entity").fields.iter().nth(1).unwrap(),
		"name",
		&["optional"],
		"::core::option::Option<::std::string::String>",
	);

	let module = parse(dir.path(), "mod");
	let reexports: Vec<String> = module
		.items
		.iter()
		.filter_map(|item| match item {
			Item::Use(u) => Some(quote::ToTokens::to_token_stream(&u.tree).to_string().replace(' ', "")),
			_ => None,
		})
		.collect();
	assert!(reexports.contains(&"class_property::ClassProperty".to_owned()));
	assert!(reexports.contains(&"database::Database".to_owned()));
	assert!(!reexports.iter().any(|r| r.starts_with("entity_mapper_core")));
}

#[test]
fn failed_writes_abort_the_run() {
	let file = tempfile::NamedTempFile::new().unwrap();
	let result = Generator::new(file.path()).format(false).generate(account_rows());
	assert!(matches!(result, Err(GenError::Write { .. })));
}
