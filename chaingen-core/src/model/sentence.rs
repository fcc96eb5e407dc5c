use serde::{Deserialize, Serialize};

use super::vocabulary::Vocabulary;

/// Splits raw text into separator-delimited fields.
///
/// Matches the ingestion splitting rule everywhere it is needed:
/// - An empty input yields no fields
/// - Empty fields between consecutive separators are kept
/// - A trailing separator does not yield a trailing empty field
/// - No trimming, no deduplication
pub(crate) fn split_fields(text: &str, separator: char) -> Vec<&str> {
	if text.is_empty() {
		return Vec::new();
	}

	let mut fields: Vec<&str> = text.split(separator).collect();
	if text.ends_with(separator) {
		fields.pop();
	}
	fields
}

/// An ordered sequence of token ids produced against a vocabulary.
///
/// The sentence owns only the ids. Accessors that produce text take the
/// vocabulary explicitly, so the owning chain stays free to intern new
/// tokens while sentences are alive.
///
/// # Responsibilities
/// - Build the id sequence by splitting raw text on a separator
/// - Grow one token at a time via `append`
/// - Hand out bounded zero-copy views and forward cursors
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Sentence {
	tokens: Vec<usize>,
}

impl Sentence {
	/// Creates an empty sentence.
	pub fn new() -> Self {
		Self { tokens: Vec::new() }
	}

	/// Creates a sentence from an explicit id sequence.
	pub fn from_ids(tokens: Vec<usize>) -> Self {
		Self { tokens }
	}

	/// Creates a sentence by splitting raw text on `separator` and
	/// interning every field.
	///
	/// Empty fields between consecutive separators are interned as the
	/// empty token; a trailing separator produces no field at all.
	pub fn from_text(bag: &mut Vocabulary, text: &str, separator: char) -> Self {
		let tokens = split_fields(text, separator)
			.into_iter()
			.map(|field| bag.intern(field))
			.collect();
		Self { tokens }
	}

	/// Number of tokens in the sentence.
	pub fn len(&self) -> usize {
		self.tokens.len()
	}

	/// Whether the sentence holds no tokens.
	pub fn is_empty(&self) -> bool {
		self.tokens.is_empty()
	}

	/// Token id at `index`.
	pub fn token_id(&self, index: usize) -> usize {
		self.tokens[index]
	}

	/// Token text at `index`, resolved through `bag`.
	pub fn token<'v>(&self, bag: &'v Vocabulary, index: usize) -> &'v str {
		bag.text_of(self.tokens[index]).unwrap_or("")
	}

	/// Overwrites the token id at `index`.
	pub fn set_token_id(&mut self, index: usize, token: usize) {
		self.tokens[index] = token;
	}

	/// Overwrites the token at `index`, interning the text.
	pub fn set_token(&mut self, bag: &mut Vocabulary, index: usize, token: &str) {
		self.tokens[index] = bag.intern(token);
	}

	/// Appends an already-interned token id.
	pub fn append(&mut self, token: usize) {
		self.tokens.push(token);
	}

	/// Interns `token` and appends it.
	pub fn append_text(&mut self, bag: &mut Vocabulary, token: &str) {
		let id = bag.intern(token);
		self.tokens.push(id);
	}

	/// Renders the sentence, joining tokens with a single space.
	///
	/// The original separator is not preserved on output.
	pub fn str(&self, bag: &Vocabulary) -> String {
		self.view().str(bag)
	}

	/// A view over the whole sentence.
	pub fn view(&self) -> SentenceView<'_> {
		SentenceView {
			sentence: self,
			start: 0,
			end: self.tokens.len(),
		}
	}

	/// A bounded view over `[start, end)`.
	///
	/// `None` as `end` means the full remaining length.
	///
	/// # Errors
	/// Returns an error unless `start <= end <= len`.
	pub fn slice(&self, start: usize, end: Option<usize>) -> Result<SentenceView<'_>, String> {
		let end = end.unwrap_or(self.tokens.len());
		if start > end || end > self.tokens.len() {
			return Err(format!(
				"Invalid view bounds [{}, {}) over {} tokens",
				start,
				end,
				self.tokens.len()
			));
		}
		Ok(SentenceView { sentence: self, start, end })
	}

	/// A cursor over the whole sentence.
	pub fn cursor(&self) -> SentenceCursor<'_> {
		self.view().cursor()
	}
}

/// A half-open `[start, end)` window over a sentence.
///
/// Does not copy data: reads are remapped by `start`. The underlying
/// sentence must outlive the view; bounds are validated when the view is
/// created, never afterwards.
#[derive(Clone, Copy, Debug)]
pub struct SentenceView<'s> {
	sentence: &'s Sentence,
	start: usize,
	end: usize,
}

impl<'s> SentenceView<'s> {
	/// First index of the window in the underlying sentence.
	pub fn start(&self) -> usize {
		self.start
	}

	/// One past the last index of the window.
	pub fn end(&self) -> usize {
		self.end
	}

	/// Number of tokens in the window.
	pub fn len(&self) -> usize {
		self.end - self.start
	}

	/// Whether the window is empty.
	pub fn is_empty(&self) -> bool {
		self.start == self.end
	}

	/// Token id at `index`, offset by the window start.
	pub fn token_id(&self, index: usize) -> usize {
		self.sentence.token_id(index + self.start)
	}

	/// Token text at `index`, offset by the window start.
	pub fn token<'v>(&self, bag: &'v Vocabulary, index: usize) -> &'v str {
		self.sentence.token(bag, index + self.start)
	}

	/// The windowed ids as a slice.
	pub fn token_ids(&self) -> &'s [usize] {
		&self.sentence.tokens[self.start..self.end]
	}

	/// Renders the window, joining tokens with a single space.
	pub fn str(&self, bag: &Vocabulary) -> String {
		let mut out = String::new();

		for i in 0..self.len() {
			out.push_str(self.token(bag, i));
			if i + 1 < self.len() {
				out.push(' ');
			}
		}

		out
	}

	/// A cursor over the window.
	pub fn cursor(self) -> SentenceCursor<'s> {
		SentenceCursor { view: self, curr: 0 }
	}
}

/// A forward-only position within a view.
///
/// Produces a lazy, finite, non-restartable walk over `(id, text, index)`
/// triples. `has_next` reports whether a successor position exists without
/// moving, enabling one-token lookahead.
#[derive(Clone, Copy, Debug)]
pub struct SentenceCursor<'s> {
	view: SentenceView<'s>,
	curr: usize,
}

impl<'s> SentenceCursor<'s> {
	/// Whether the cursor is on a valid position.
	pub fn has(&self) -> bool {
		self.curr < self.view.len()
	}

	/// Whether a successor position exists, without moving.
	pub fn has_next(&self) -> bool {
		self.curr + 1 < self.view.len()
	}

	/// Moves one position forward.
	///
	/// Once past the end of the view the cursor is exhausted and cannot
	/// be restarted.
	pub fn advance(&mut self) {
		self.curr += 1;
	}

	/// Token id at the current position.
	///
	/// The cursor must be on a valid position (`has()`).
	pub fn id(&self) -> usize {
		self.view.token_id(self.curr)
	}

	/// Token text at the current position.
	pub fn text<'v>(&self, bag: &'v Vocabulary) -> &'v str {
		self.view.token(bag, self.curr)
	}

	/// Position of the cursor within its view.
	pub fn index(&self) -> usize {
		self.curr
	}

	/// A cursor `offs` positions further ahead on the same view.
	pub fn offset(&self, offs: usize) -> SentenceCursor<'s> {
		SentenceCursor {
			view: self.view,
			curr: self.curr + offs,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn splitting_keeps_interior_empty_fields() {
		assert_eq!(split_fields("a  b", ' '), vec!["a", "", "b"]);
	}

	#[test]
	fn splitting_drops_trailing_empty_field_only() {
		assert_eq!(split_fields("a b ", ' '), vec!["a", "b"]);
		assert_eq!(split_fields(" a", ' '), vec!["", "a"]);
		assert_eq!(split_fields("", ' '), Vec::<&str>::new());
		assert_eq!(split_fields(" ", ' '), vec![""]);
	}

	#[test]
	fn from_text_interns_every_field() {
		let mut bag = Vocabulary::new();
		let sentence = Sentence::from_text(&mut bag, "the cat sat", ' ');

		assert_eq!(sentence.len(), 3);
		assert_eq!(sentence.token(&bag, 0), "the");
		assert_eq!(sentence.token(&bag, 2), "sat");
	}

	#[test]
	fn from_text_supports_other_separators() {
		let mut bag = Vocabulary::new();
		let sentence = Sentence::from_text(&mut bag, "one,two,three", ',');

		assert_eq!(sentence.len(), 3);
		assert_eq!(sentence.token(&bag, 1), "two");
	}

	#[test]
	fn str_joins_with_a_single_space() {
		let mut bag = Vocabulary::new();
		let sentence = Sentence::from_text(&mut bag, "one,two", ',');

		assert_eq!(sentence.str(&bag), "one two");
	}

	#[test]
	fn from_ids_takes_the_sequence_as_is() {
		let mut bag = Vocabulary::new();
		let a = bag.intern("a");
		let b = bag.intern("b");

		let sentence = Sentence::from_ids(vec![a, b, a]);

		assert_eq!(sentence.len(), 3);
		assert_eq!(sentence.str(&bag), "a b a");
	}

	#[test]
	fn tokens_can_be_overwritten_in_place() {
		let mut bag = Vocabulary::new();
		let mut sentence = Sentence::from_text(&mut bag, "a b c", ' ');

		let a = bag.id_of("a").unwrap();
		sentence.set_token_id(2, a);
		sentence.set_token(&mut bag, 1, "z");

		assert_eq!(sentence.str(&bag), "a z a");
		assert_eq!(sentence.len(), 3);
	}

	#[test]
	fn append_grows_by_one() {
		let mut bag = Vocabulary::new();
		let mut sentence = Sentence::new();

		sentence.append_text(&mut bag, "hello");
		let id = bag.id_of("hello").unwrap();
		sentence.append(id);

		assert_eq!(sentence.len(), 2);
		assert_eq!(sentence.str(&bag), "hello hello");
	}

	#[test]
	fn views_remap_indices_without_copying() {
		let mut bag = Vocabulary::new();
		let sentence = Sentence::from_text(&mut bag, "a b c d", ' ');

		let view = sentence.slice(1, Some(3)).unwrap();

		assert_eq!(view.start(), 1);
		assert_eq!(view.end(), 3);
		assert_eq!(view.len(), 2);
		assert!(!view.is_empty());
		assert_eq!(view.token_ids(), &[sentence.token_id(1), sentence.token_id(2)]);
		assert_eq!(view.token(&bag, 0), "b");
		assert_eq!(view.token(&bag, 1), "c");
		assert_eq!(view.str(&bag), "b c");
	}

	#[test]
	fn unbounded_end_means_full_remaining_length() {
		let mut bag = Vocabulary::new();
		let sentence = Sentence::from_text(&mut bag, "a b c", ' ');

		let view = sentence.slice(1, None).unwrap();

		assert_eq!(view.len(), 2);
		assert_eq!(view.str(&bag), "b c");
	}

	#[test]
	fn view_bounds_are_validated_at_construction() {
		let mut bag = Vocabulary::new();
		let sentence = Sentence::from_text(&mut bag, "a b", ' ');

		assert!(sentence.slice(0, Some(3)).is_err());
		assert!(sentence.slice(2, Some(1)).is_err());
	}

	#[test]
	fn cursor_walks_forward_with_lookahead() {
		let mut bag = Vocabulary::new();
		let sentence = Sentence::from_text(&mut bag, "x y z", ' ');

		let mut cursor = sentence.cursor();
		let mut seen = Vec::new();

		while cursor.has() {
			seen.push((cursor.index(), cursor.text(&bag).to_owned(), cursor.has_next()));
			cursor.advance();
		}

		assert_eq!(
			seen,
			vec![
				(0, "x".to_owned(), true),
				(1, "y".to_owned(), true),
				(2, "z".to_owned(), false),
			]
		);
	}

	#[test]
	fn cursor_offset_peeks_the_successor() {
		let mut bag = Vocabulary::new();
		let sentence = Sentence::from_text(&mut bag, "x y", ' ');

		let cursor = sentence.cursor();

		assert_eq!(cursor.offset(1).text(&bag), "y");
		assert_eq!(cursor.index(), 0);
	}
}
