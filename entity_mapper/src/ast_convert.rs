//! Turn the entity descriptors from sql_tree into rust code

mod entity;
mod module;

use proc_macro2::TokenStream;

/// Renders a descriptor as rust tokens
///
/// Rendering is pure, the same descriptor always gives the same tokens
pub trait ConvertToAst {
	fn to_rust_ast(&self) -> TokenStream;

	fn as_string(&self) -> String {
		self.to_rust_ast().to_string()
	}
}
