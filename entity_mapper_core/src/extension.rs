use std::collections::HashMap;

use log::debug;

use super::{BoundEntity, MappingError};

/// Supplementary behaviour attached to a generated entity by name
///
/// Implementations are registered on an [`ExtensionRegistry`] before mappings are generated. Entities without one get [`NoExtension`]
///
/// [`ExtensionRegistry`]: ./struct.ExtensionRegistry.html
/// [`NoExtension`]: ./struct.NoExtension.html
pub trait Extension {
	/// Called once, after the entity's table has been checked against the database
	fn on_bind(&self, _entity: &BoundEntity) {}

	/// Human readable description of the entity
	fn describe(&self, entity: &BoundEntity) -> String {
		format!("{} ({})", entity.def.name, entity.table())
	}
}

/// The extension every entity gets when nothing else was registered for it
#[derive(Debug, Clone, Copy, Default)]
pub struct NoExtension;

impl Extension for NoExtension {}

/// Map from entity name to its extension
///
/// Only names in the list given to [`new`] are accepted. The generated `mod.rs` builds one through its `extension_registry` function
///
/// [`new`]: #method.new
pub struct ExtensionRegistry {
	known: &'static [&'static str],
	extensions: HashMap<String, Box<dyn Extension>>,
}

impl ExtensionRegistry {
	pub fn new(known: &'static [&'static str]) -> Self {
		Self {
			known,
			extensions: HashMap::new(),
		}
	}

	/// Registers `extension` for the entity called `entity`, replacing any earlier one
	pub fn attach<X: Extension + 'static>(&mut self, entity: &str, extension: X) -> Result<&mut Self, MappingError> {
		if !self.known.contains(&entity) {
			return Err(MappingError::UnknownEntity(entity.to_owned()));
		}
		if self.extensions.insert(entity.to_owned(), Box::new(extension)).is_some() {
			debug!("replaced extension for {}", entity);
		}
		Ok(self)
	}

	pub fn contains(&self, entity: &str) -> bool {
		self.extensions.contains_key(entity)
	}

	pub fn len(&self) -> usize {
		self.extensions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.extensions.is_empty()
	}

	/// Removes the extension for `entity`, falling back to [`NoExtension`]
	pub(crate) fn take(&mut self, entity: &str) -> Box<dyn Extension> {
		self.extensions.remove(entity).unwrap_or_else(|| Box::new(NoExtension))
	}
}

impl std::fmt::Debug for ExtensionRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let mut names: Vec<_> = self.extensions.keys().collect();
		names.sort();
		f.debug_struct("ExtensionRegistry")
			.field("known", &self.known)
			.field("extensions", &names)
			.finish()
	}
}
