//! Functions for generating the module binding all entities together
use super::{
	super::sql_tree::*,
	ConvertToAst,
};
use proc_macro2::TokenStream;
use quote::quote;

impl ConvertToAst for ModuleDescriptor {
	/// Renders the `mod.rs` of the generated directory
	///
	/// The table prefix is only known to the program using the entities, so every entity gets one
	/// `declare` statement that applies it when `init_mappings` runs. Runtime items are named by
	/// absolute path, only the entities and `ClassProperty` are brought into scope
	///
	/// ```ignore
	/// pub mod class_property;
	/// pub mod account;
	///
	/// pub use class_property::ClassProperty;
	/// pub use account::Account;
	///
	/// pub const ENTITY_NAMES: &[&str] = &["Account"];
	///
	/// pub fn extension_registry() -> ::entity_mapper_core::ExtensionRegistry { /* .. */ }
	///
	/// pub fn init_mappings(
	/// 	prefix: &str,
	/// 	params: &str,
	/// 	extensions: ::entity_mapper_core::ExtensionRegistry,
	/// ) -> ::core::result::Result<::entity_mapper_core::Database, ::entity_mapper_core::MappingError> {
	/// 	let mut db = ::entity_mapper_core::Database::new(extensions);
	/// 	db.declare::<account::Account>(prefix)?;
	/// 	db.bind(params)?;
	/// 	db.generate_mappings()?;
	/// 	::core::result::Result::Ok(db)
	/// }
	/// ```
	fn to_rust_ast(&self) -> TokenStream {
		let modules = self.entities.iter().map(|e| &e.module);
		let reexports = self.entities.iter().map(|e| {
			let module = &e.module;
			let class_name = &e.class_name;
			quote! { pub use #module::#class_name; }
		});
		let names = self.entities.iter().map(|e| e.class_name.to_string());
		let bindings = self.entities.iter().map(|e| {
			let module = &e.module;
			let class_name = &e.class_name;
			quote! { db.declare::<#module::#class_name>(prefix)?; }
		});

		quote! {
			#![doc = "Entities generated by entity_mapper, bound to a database by [`init_mappings`]."]

			pub mod class_property;
			#(pub mod #modules;)*

			pub use class_property::ClassProperty;
			#(#reexports)*

			/// Every generated entity, the names accepted by [`extension_registry`]
			pub const ENTITY_NAMES: &[&str] = &[#(#names),*];

			/// Registry for attaching extensions to generated entities before [`init_mappings`] runs
			pub fn extension_registry() -> ::entity_mapper_core::ExtensionRegistry {
				::entity_mapper_core::ExtensionRegistry::new(ENTITY_NAMES)
			}

			/// Binds every entity to its table name with `prefix` in front, connects using `params` and checks the tables exist
			pub fn init_mappings(
				prefix: &str,
				params: &str,
				extensions: ::entity_mapper_core::ExtensionRegistry,
			) -> ::core::result::Result<::entity_mapper_core::Database, ::entity_mapper_core::MappingError> {
				let mut db = ::entity_mapper_core::Database::new(extensions);
				#(#bindings)*
				db.bind(params)?;
				db.generate_mappings()?;
				::core::result::Result::Ok(db)
			}
		}
	}
}
