//! Lazily computed values shared by every instance of an entity type
//!
//! Meant for `static` items inside extensions of the generated entities:
//!
//! ```ignore
//! static TITLE: ClassProperty<String> = ClassProperty::new(|| Account::DEF.name.to_uppercase());
//! ```

use std::{fmt, ops::Deref, sync::OnceLock};

/// A value computed on first access and kept for the rest of the program
pub struct ClassProperty<T> {
	cell: OnceLock<T>,
	init: fn() -> T,
}

impl<T> ClassProperty<T> {
	pub const fn new(init: fn() -> T) -> Self {
		Self {
			cell: OnceLock::new(),
			init,
		}
	}

	/// The value, computing it if this is the first access
	pub fn get(&self) -> &T {
		self.cell.get_or_init(self.init)
	}

	pub fn is_computed(&self) -> bool {
		self.cell.get().is_some()
	}
}

impl<T> Deref for ClassProperty<T> {
	type Target = T;

	fn deref(&self) -> &T {
		self.get()
	}
}

impl<T: fmt::Debug> fmt::Debug for ClassProperty<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("ClassProperty").field(&self.cell.get()).finish()
	}
}
