//! Contains the derive macro for [`Entity`], the trait implemented by every declaration `entity_mapper` generates
//!
//! The struct names its table and each field its role:
//!
//! ```ignore
//! #[derive(Debug, Clone, PartialEq, Entity)]
//! #[orm(table = "account")]
//! pub struct Account {
//! 	#[orm(primary_key)]
//! 	pub id: i32,
//! 	#[orm(required, max_length = 100, unique)]
//! 	pub email: String,
//! 	#[orm(optional, column = "LoginCount")]
//! 	pub login_count: Option<i32>,
//! }
//! ```
//!
//! Multi column keys are named on the struct with `composite_key(field, ..)`, each member being a `required` field
//!
//! `cast = "numeric"` on a field makes `Database::select_all` convert the column in sql before it is read,
//! e.g. `double precision` columns loaded into a `Decimal`
//!
//! [`Entity`]: https://docs.rs/entity_mapper_core/0.1.0/entity_mapper_core/trait.Entity.html

extern crate proc_macro;

use proc_macro2::TokenStream;

use quote::quote;

use syn::{
	ext::IdentExt,
	parse_macro_input,
	spanned::Spanned,
	Data,
	DeriveInput,
	Error,
	Field,
	Fields,
	Ident,
	LitInt,
	LitStr,
	Result,
	Type,
};

#[proc_macro_derive(Entity, attributes(orm))]
/// A derive macro for [`Entity`] reading `#[orm(..)]` attributes
///
/// [`Entity`]: https://docs.rs/entity_mapper_core/0.1.0/entity_mapper_core/trait.Entity.html
pub fn derive_entity(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
	let input = parse_macro_input!(input as DeriveInput);

	expand(&input)
		.unwrap_or_else(Error::into_compile_error)
		.into()
}

#[derive(Clone, Copy, PartialEq)]
enum Mode {
	PrimaryKey,
	Required,
	Optional,
}

struct EntityAttrs {
	table: String,
	composite_key: Option<Vec<Ident>>,
}

struct FieldAttrs {
	ident: Ident,
	column: String,
	mode: Mode,
	max_length: Option<u32>,
	unique: bool,
	cast: Option<String>,
}

fn expand(input: &DeriveInput) -> Result<TokenStream> {
	// get the name of the type we want to implement the trait for
	let name = &input.ident;
	let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

	let attrs = entity_attrs(input)?;
	let fields = match &input.data {
		Data::Struct(data) => match &data.fields {
			Fields::Named(named) => named
				.named
				.iter()
				.map(field_attrs)
				.collect::<Result<Vec<_>>>()?,
			_ => return Err(Error::new(name.span(), "Entity can only be derived for structs with named fields")),
		},
		Data::Enum(_) | Data::Union(_) => {
			return Err(Error::new(name.span(), "Entity can only be derived for structs"));
		},
	};
	check_key(name, &fields, attrs.composite_key.as_deref())?;

	let entity_name = name.unraw().to_string();
	let table = &attrs.table;

	let field_defs = fields.iter().map(|f| {
		let field_name = f.ident.unraw().to_string();
		let column = &f.column;
		let mode = match f.mode {
			Mode::PrimaryKey => quote! { ::entity_mapper_core::FieldMode::PrimaryKey },
			Mode::Required => quote! { ::entity_mapper_core::FieldMode::Required },
			Mode::Optional => quote! { ::entity_mapper_core::FieldMode::Optional },
		};
		let max_length = f.max_length.map(|len| quote! { ::entity_mapper_core::Constraint::MaxLength(#len), });
		let unique = if f.unique {
			quote! { ::entity_mapper_core::Constraint::Unique, }
		} else {
			quote! {}
		};
		let cast = match &f.cast {
			Some(cast) => quote! { ::core::option::Option::Some(#cast) },
			None => quote! { ::core::option::Option::None },
		};
		quote! {
			::entity_mapper_core::FieldDef {
				name: #field_name,
				column: #column,
				mode: #mode,
				constraints: &[#max_length #unique],
				cast: #cast,
			}
		}
	});

	let composite_key = match &attrs.composite_key {
		Some(members) => {
			let columns = members
				.iter()
				.filter_map(|m| fields.iter().find(|f| f.ident.unraw() == m.unraw()))
				.map(|f| &f.column);
			quote! { ::core::option::Option::Some(&[#(#columns),*]) }
		},
		None => quote! { ::core::option::Option::None },
	};

	let loads = fields.iter().map(|f| {
		let ident = &f.ident;
		let column = &f.column;
		quote! { #ident: row.try_get(#column)? }
	});

	Ok(quote! {
		impl #impl_generics ::entity_mapper_core::Entity for #name #ty_generics #where_clause {
			const DEF: ::entity_mapper_core::EntityDef = ::entity_mapper_core::EntityDef {
				name: #entity_name,
				table: #table,
				fields: &[#(#field_defs),*],
				composite_key: #composite_key,
			};

			fn from_row(row: &::entity_mapper_core::Row) -> ::core::result::Result<Self, ::entity_mapper_core::SqlError> {
				::core::result::Result::Ok(Self {
					#(#loads),*
				})
			}
		}
	})
}

fn entity_attrs(input: &DeriveInput) -> Result<EntityAttrs> {
	let mut table = None;
	let mut composite_key = None;

	for attr in input.attrs.iter().filter(|a| a.path().is_ident("orm")) {
		attr.parse_nested_meta(|meta| {
			if meta.path.is_ident("table") {
				let lit: LitStr = meta.value()?.parse()?;
				table = Some(lit.value());
				Ok(())
			} else if meta.path.is_ident("composite_key") {
				let mut members = Vec::new();
				meta.parse_nested_meta(|member| match member.path.get_ident() {
					Some(ident) => {
						members.push(ident.clone());
						Ok(())
					},
					None => Err(member.error("expected a field name")),
				})?;
				composite_key = Some(members);
				Ok(())
			} else {
				Err(meta.error("unsupported orm attribute, expected `table` or `composite_key`"))
			}
		})?;
	}

	let table = table.ok_or_else(|| Error::new(input.ident.span(), "missing #[orm(table = \"...\")]"))?;
	Ok(EntityAttrs { table, composite_key })
}

fn field_attrs(field: &Field) -> Result<FieldAttrs> {
	let ident = field
		.ident
		.clone()
		.ok_or_else(|| Error::new(field.span(), "expected a named field"))?;
	let mut mode = None;
	let mut column = None;
	let mut max_length = None;
	let mut unique = false;
	let mut cast = None;

	for attr in field.attrs.iter().filter(|a| a.path().is_ident("orm")) {
		attr.parse_nested_meta(|meta| {
			let next = if meta.path.is_ident("primary_key") {
				Some(Mode::PrimaryKey)
			} else if meta.path.is_ident("required") {
				Some(Mode::Required)
			} else if meta.path.is_ident("optional") {
				Some(Mode::Optional)
			} else {
				None
			};
			if let Some(next) = next {
				if mode.replace(next).is_some() {
					return Err(meta.error("a field takes only one of `primary_key`, `required` or `optional`"));
				}
				return Ok(());
			}

			if meta.path.is_ident("column") {
				let lit: LitStr = meta.value()?.parse()?;
				column = Some(lit.value());
			} else if meta.path.is_ident("max_length") {
				let lit: LitInt = meta.value()?.parse()?;
				max_length = Some(lit.base10_parse::<u32>()?);
			} else if meta.path.is_ident("unique") {
				unique = true;
			} else if meta.path.is_ident("cast") {
				let lit: LitStr = meta.value()?.parse()?;
				let sql_type = lit.value();
				if sql_type.is_empty() || !sql_type.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ' ') {
					return Err(Error::new(lit.span(), "`cast` takes a plain sql type name"));
				}
				cast = Some(sql_type);
			} else {
				return Err(meta.error("unsupported orm attribute"));
			}
			Ok(())
		})?;
	}

	let is_option = is_option(&field.ty);
	let mode = match mode {
		Some(mode) => mode,
		None if is_option => Mode::Optional,
		None => Mode::Required,
	};
	if mode == Mode::Optional && !is_option {
		return Err(Error::new(field.ty.span(), "optional fields must be typed Option<_>"));
	}

	Ok(FieldAttrs {
		column: column.unwrap_or_else(|| ident.unraw().to_string()),
		ident,
		mode,
		max_length,
		unique,
		cast,
	})
}

fn check_key(name: &Ident, fields: &[FieldAttrs], composite_key: Option<&[Ident]>) -> Result<()> {
	let mut primary = fields.iter().filter(|f| f.mode == Mode::PrimaryKey);

	let members = match composite_key {
		Some(members) => members,
		None => {
			return match (primary.next(), primary.next()) {
				(Some(_), None) => Ok(()),
				(Some(_), Some(second)) => Err(Error::new(
					second.ident.span(),
					"only one field can be `primary_key`, use `composite_key(..)` for multi column keys",
				)),
				(None, _) => Err(Error::new(
					name.span(),
					"entity has no key, mark a field `primary_key` or add `composite_key(..)`",
				)),
			};
		},
	};

	if let Some(pk) = primary.next() {
		return Err(Error::new(pk.ident.span(), "`primary_key` cannot be combined with `composite_key`"));
	}
	if members.len() < 2 {
		return Err(Error::new(name.span(), "`composite_key` needs at least two fields"));
	}
	for member in members {
		match fields.iter().find(|f| f.ident.unraw() == member.unraw()) {
			Some(f) if f.mode == Mode::Required => {},
			Some(_) => return Err(Error::new(member.span(), "composite key members must be `required`")),
			None => return Err(Error::new(member.span(), format!("no field named `{}`", member))),
		}
	}
	Ok(())
}

fn is_option(ty: &Type) -> bool {
	match ty {
		Type::Path(path) => path.qself.is_none()
			&& path
				.path
				.segments
				.last()
				.map_or(false, |segment| segment.ident == "Option"),
		_ => false,
	}
}
