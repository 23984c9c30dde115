//! Table and column names to rust identifiers
use heck::SnakeCase;
use proc_macro2::Ident;

const RUST_KEYWORDS: [&str; 51] = [
	"abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate", "do", "dyn", "else", "enum",
	"extern", "false", "final", "fn", "for", "gen", "if", "impl", "in", "let", "loop", "macro", "match", "mod", "move",
	"mut", "override", "priv", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true", "try",
	"type", "typeof", "unsafe", "unsized", "use", "virtual", "where", "while",
];

/// Keywords that cannot be written as raw identifiers
const NOT_RAW: [&str; 4] = ["crate", "self", "Self", "super"];

/// Strips `prefix` from the start of `table` (once) and derives the entity name from what is left
///
/// ```
/// use entity_mapper::convert::names::normalize;
///
/// assert_eq!(normalize("test_users", "test_"), ("users", "Users".to_owned()));
/// assert_eq!(normalize("order_line", "test_"), ("order_line", "OrderLine".to_owned()));
/// ```
pub fn normalize<'a>(table: &'a str, prefix: &str) -> (&'a str, String) {
	let normalized = if prefix.is_empty() {
		table
	} else {
		table.strip_prefix(prefix).unwrap_or(table)
	};
	(normalized, class_name(normalized))
}

/// Title cases every `_` separated segment and joins them
///
/// A letter is upper cased when it does not follow another letter, so `user2fa` becomes `User2Fa`
pub fn class_name(table: &str) -> String {
	table
		.split('_')
		.filter(|segment| !segment.is_empty())
		.map(title_case)
		.collect()
}

fn title_case(segment: &str) -> String {
	let mut title = String::with_capacity(segment.len());
	let mut after_letter = false;
	for c in segment.chars() {
		if after_letter {
			title.extend(c.to_lowercase());
		} else {
			title.extend(c.to_uppercase());
		}
		after_letter = is_cased(c);
	}
	title
}

fn is_cased(c: char) -> bool {
	c.is_lowercase() || c.is_uppercase()
}

/// The entity type identifier, `None` if `name` cannot be one
pub fn class_ident(name: &str) -> Option<Ident> {
	syn::parse_str::<Ident>(name).ok()
}

/// A snake case identifier for a column or module name
///
/// Leading digits get a `_` in front and keywords are written raw (or with a trailing `_` where that is not possible)
pub fn snake_ident(name: &str) -> Option<Ident> {
	let mut ident = name.to_snake_case();
	if ident.starts_with(|c: char| c.is_ascii_digit()) {
		ident.insert(0, '_');
	}
	if NOT_RAW.contains(&ident.as_str()) {
		ident.push('_');
	} else if RUST_KEYWORDS.contains(&ident.as_str()) {
		ident.insert_str(0, "r#");
	}
	syn::parse_str::<Ident>(&ident).ok()
}
