use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Reserved id of the empty token.
///
/// It is interned at construction time, so every `Vocabulary` resolves it
/// to the empty string without a lookup. Splitting well-formed text never
/// produces it, only empty fields between consecutive separators do.
pub const EMPTY_TOKEN: usize = 0;

/// Append-only bidirectional mapping between token strings and integer ids.
///
/// Ids are assigned in first-seen order starting right after the reserved
/// empty-token sentinel and stay stable for the lifetime of the vocabulary.
///
/// # Responsibilities
/// - Intern token strings and hand out stable ids
/// - Resolve ids back to their text
/// - Resolve text back to its id, without ever inserting on lookup
///
/// # Invariants
/// - Each distinct string has exactly one id
/// - `EMPTY_TOKEN` is always present and maps to `""`
/// - `token_list` and `token_index` describe the same mapping
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Vocabulary {
	/// Token text indexed by id.
	token_list: Vec<String>,

	/// Token id indexed by text.
	token_index: HashMap<String, usize>,
}

impl Vocabulary {
	/// Creates a vocabulary holding only the empty-token sentinel.
	pub fn new() -> Self {
		let mut bag = Self {
			token_list: Vec::new(),
			token_index: HashMap::new(),
		};
		bag.intern("");
		bag
	}

	/// Interns a token and returns its id.
	///
	/// Idempotent: an already-known token returns its existing id,
	/// otherwise the next sequential id is assigned.
	pub fn intern(&mut self, token: &str) -> usize {
		if let Some(&id) = self.token_index.get(token) {
			return id;
		}

		let id = self.token_list.len();
		self.token_list.push(token.to_owned());
		self.token_index.insert(token.to_owned(), id);
		id
	}

	/// Returns the text of a token id.
	///
	/// The reserved `EMPTY_TOKEN` always resolves to the empty string
	/// without touching the mapping.
	///
	/// # Errors
	/// Returns an error if the id was never assigned.
	pub fn text_of(&self, id: usize) -> Result<&str, String> {
		if id == EMPTY_TOKEN {
			return Ok("");
		}
		self.token_list
			.get(id)
			.map(String::as_str)
			.ok_or_else(|| format!("Unknown token id: {}", id))
	}

	/// Returns the id of a token string.
	///
	/// This is a hard lookup: querying a string that was never interned
	/// is an error, not an insert.
	///
	/// # Errors
	/// Returns an error if the exact string was never interned.
	pub fn id_of(&self, token: &str) -> Result<usize, String> {
		self.token_index
			.get(token)
			.copied()
			.ok_or_else(|| format!("Unknown token: '{}'", token))
	}

	/// Number of interned tokens, sentinel included.
	pub fn len(&self) -> usize {
		self.token_list.len()
	}

	/// Whether an id is currently assigned.
	pub fn contains_id(&self, id: usize) -> bool {
		id < self.token_list.len()
	}
}

impl Default for Vocabulary {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn intern_is_idempotent() {
		let mut bag = Vocabulary::new();

		let first = bag.intern("hello");
		let second = bag.intern("hello");

		assert_eq!(first, second);
		assert_eq!(bag.text_of(first).unwrap(), "hello");
	}

	#[test]
	fn ids_are_assigned_in_first_seen_order() {
		let mut bag = Vocabulary::new();

		assert_eq!(bag.intern("a"), 1);
		assert_eq!(bag.intern("b"), 2);
		assert_eq!(bag.intern("a"), 1);
		assert_eq!(bag.len(), 3);
	}

	#[test]
	fn sentinel_resolves_to_empty_string() {
		let bag = Vocabulary::new();

		assert_eq!(bag.text_of(EMPTY_TOKEN).unwrap(), "");
		assert_eq!(bag.id_of("").unwrap(), EMPTY_TOKEN);
		assert_eq!(bag.len(), 1);
	}

	#[test]
	fn sentinel_is_not_reassigned_by_interning() {
		let mut bag = Vocabulary::new();

		assert_eq!(bag.intern(""), EMPTY_TOKEN);
		assert_eq!(bag.len(), 1);
	}

	#[test]
	fn lookup_of_unseen_string_is_an_error() {
		let bag = Vocabulary::new();

		assert!(bag.id_of("never-seen").is_err());
	}

	#[test]
	fn lookup_of_unassigned_id_is_an_error() {
		let bag = Vocabulary::new();

		assert!(bag.text_of(42).is_err());
	}
}
