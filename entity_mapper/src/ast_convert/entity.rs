//! Functions for generating entity declarations
use super::{
	super::sql_tree::*,
	ConvertToAst,
};
use proc_macro2::{Literal, TokenStream};
use quote::{quote, ToTokens};
use syn::ext::IdentExt;

impl ConvertToAst for EntityDescriptor {
	/// Renders one entity declaration
	///
	/// Every path is absolute so no table name can shadow what the declaration refers to
	///
	/// ```ignore
	/// #[doc = "Entity for table `test_order_line`."]
	/// #[derive(Debug, Clone, PartialEq, ::entity_mapper_core::Entity)]
	/// // composite_key only shows up for multi column keys
	/// #[orm(table = "order_line", composite_key(order_id, line_no))]
	/// pub struct OrderLine {
	/// 	#[orm(required)]
	/// 	pub order_id: i32,
	/// 	#[orm(required)]
	/// 	pub line_no: i16,
	/// 	// column is only given when it differs from the field name
	/// 	#[orm(optional, column = "Note", max_length = 40)]
	/// 	pub note: ::core::option::Option<::std::string::String>,
	/// 	// decimal fields are selected through a numeric cast
	/// 	#[orm(required, cast = "numeric")]
	/// 	pub price: ::entity_mapper_core::rust_decimal::Decimal,
	/// }
	/// ```
	fn to_rust_ast(&self) -> TokenStream {
		let name = &self.class_name;
		let table = &self.table;
		let doc = format!("Entity for table `{}`.", self.source_table);

		let key = match &self.key {
			KeySpec::Inline => quote! {},
			KeySpec::Composite(columns) => {
				let members = columns
					.iter()
					.filter_map(|column| self.fields.iter().find(|f| &f.column == column))
					.map(|f| &f.ident);
				quote! { , composite_key(#(#members),*) }
			},
		};
		let fields = self.fields.iter().map(field_to_ast);

		quote! {
			#[doc = #doc]
			#[derive(Debug, Clone, PartialEq, ::entity_mapper_core::Entity)]
			#[orm(table = #table #key)]
			pub struct #name {
				#(#fields),*
			}
		}
	}
}

fn field_to_ast(field: &FieldDescriptor) -> TokenStream {
	let mut args = vec![match field.mode {
		FieldMode::PrimaryKey => quote! { primary_key },
		FieldMode::Required => quote! { required },
		FieldMode::Optional => quote! { optional },
	}];
	if field.ident.unraw() != field.column {
		let column = &field.column;
		args.push(quote! { column = #column });
	}
	args.extend(field.constraints.iter().map(|constraint| match constraint {
		Constraint::MaxLength(len) => {
			let len = Literal::u32_unsuffixed(*len);
			quote! { max_length = #len }
		},
		Constraint::Unique => quote! { unique },
	}));
	// Decimal only reads numeric columns
	if field.typ == TargetType::Decimal {
		args.push(quote! { cast = "numeric" });
	}

	let ident = &field.ident;
	let typ = &field.typ;
	let typ = match field.mode {
		FieldMode::Optional => quote! { ::core::option::Option<#typ> },
		FieldMode::PrimaryKey | FieldMode::Required => quote! { #typ },
	};

	quote! {
		#[orm(#(#args),*)]
		pub #ident: #typ
	}
}

impl ToTokens for TargetType {
	fn to_tokens(&self, tokens: &mut TokenStream) {
		use TargetType::*;
		tokens.extend(match self {
			Bytes => quote! { ::std::vec::Vec<u8> },
			Str => quote! { ::std::string::String },
			Date => quote! { ::entity_mapper_core::chrono::NaiveDate },
			DateTime => quote! { ::entity_mapper_core::chrono::NaiveDateTime },
			Time => quote! { ::entity_mapper_core::chrono::NaiveTime },
			Decimal => quote! { ::entity_mapper_core::rust_decimal::Decimal },
			Integer(IntWidth::I16) => quote! { i16 },
			Integer(IntWidth::I32) => quote! { i32 },
			Integer(IntWidth::I64) => quote! { i64 },
			Bool => quote! { bool },
			Float => quote! { f32 },
			DateTimeUtc => quote! { ::entity_mapper_core::chrono::DateTime<::entity_mapper_core::chrono::Utc> },
		});
	}
}
