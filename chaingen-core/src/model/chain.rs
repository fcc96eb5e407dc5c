use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::sentence::{Sentence, SentenceView, split_fields};
use super::vocabulary::Vocabulary;

/// Default exponent applied to token frequencies during scoring.
///
/// 0.5 dampens by the square root of the occurrence count.
pub const DEFAULT_FREQUENCY_DAMPING: f64 = 0.5;

/// One recorded observation of a token-to-token transition.
///
/// Created once per observed adjacent token pair during ingestion. The
/// context holds the tokens immediately preceding the transition, oldest
/// first, always ending with the "from" token itself.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Assessor {
	/// Multiplier applied to the context-match score.
	strength: f64,

	/// Preceding token ids, oldest first, "from" token last.
	context: Vec<usize>,
}

impl Assessor {
	/// The strength multiplier supplied at ingestion.
	pub fn strength(&self) -> f64 {
		self.strength
	}

	/// The recorded context, oldest first.
	pub fn context(&self) -> &[usize] {
		&self.context
	}
}

/// The trained model: vocabulary, transition index and frequency table.
///
/// # Responsibilities
/// - Tokenize and ingest example sentences, growing the vocabulary
/// - Record one `Assessor` per observed adjacent token pair
/// - Count token occurrences for frequency damping
/// - Score transition candidates against a query context
///
/// # Invariants
/// - The index and the frequency table only grow; nothing is removed
/// - Every recorded context ends with its transition's "from" token
/// - `window_width` is at least 1 and fixed for the chain's lifetime
///
/// # Notes
/// - The chain is mutated only by ingestion; assessment is read-only.
///   Concurrent ingestion and querying must be serialized by the caller.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Chain {
	/// Token interner; grows only through `ingest`.
	bag: Vocabulary,

	/// `from id -> (to id -> recorded observations)`.
	transitions: HashMap<usize, HashMap<usize, Vec<Assessor>>>,

	/// Occurrence count per token id, final sentence tokens included.
	frequencies: HashMap<usize, usize>,

	/// Maximum number of context positions compared during scoring.
	window_width: usize,

	/// Exponent applied to token frequencies during scoring.
	frequency_damping: f64,
}

impl Chain {
	/// Creates an empty chain with the given context window width.
	///
	/// # Errors
	/// Returns an error if `window_width` is 0.
	pub fn new(window_width: usize) -> Result<Self, String> {
		if window_width == 0 {
			return Err("Window width must be at least 1".to_owned());
		}
		Ok(Self {
			bag: Vocabulary::new(),
			transitions: HashMap::new(),
			frequencies: HashMap::new(),
			window_width,
			frequency_damping: DEFAULT_FREQUENCY_DAMPING,
		})
	}

	/// The vocabulary grown by ingestion.
	pub fn vocabulary(&self) -> &Vocabulary {
		&self.bag
	}

	/// The configured context window width.
	pub fn window_width(&self) -> usize {
		self.window_width
	}

	/// Observed occurrence count of a token, 0 if never seen.
	pub fn frequency(&self, token: usize) -> usize {
		self.frequencies.get(&token).copied().unwrap_or(0)
	}

	/// The current frequency damping exponent.
	pub fn frequency_damping(&self) -> f64 {
		self.frequency_damping
	}

	/// Sets the frequency damping exponent.
	///
	/// 0.0 disables frequency damping entirely; 0.5 (the default) dampens
	/// by the square root of the occurrence count; 1.0 dampens linearly.
	///
	/// # Errors
	/// Returns an error if the exponent is negative or not finite.
	pub fn set_frequency_damping(&mut self, exponent: f64) -> Result<(), String> {
		if !exponent.is_finite() || exponent < 0.0 {
			return Err(format!(
				"Frequency damping must be finite and >= 0.0, got {}",
				exponent
			));
		}
		self.frequency_damping = exponent;
		Ok(())
	}

	/// Ingests one example sentence into the model.
	///
	/// Tokenizes against the chain's vocabulary (the only path that grows
	/// it), counts every token occurrence, and records one `Assessor` per
	/// adjacent token pair with the up-to-window context preceding the
	/// transition.
	///
	/// # Notes
	/// - Monotonic: nothing is ever rolled back. An input with fewer than
	///   two tokens contributes occurrence counts but no transitions.
	/// - Repeated observations of the same pair accumulate one `Assessor`
	///   each; they are never merged or counted in shortcut form.
	pub fn ingest(&mut self, sentence: &str, separator: char, strength: f64) {
		let sentence = Sentence::from_text(&mut self.bag, sentence, separator);

		let mut cursor = sentence.cursor();
		while cursor.has() {
			let from_word = cursor.id();
			*self.frequencies.entry(from_word).or_insert(0) += 1;

			if cursor.has_next() {
				let index = cursor.index();
				let context_start = index.saturating_sub(self.window_width);
				let context: Vec<usize> = (context_start..=index)
					.map(|i| sentence.token_id(i))
					.collect();

				let to_word = cursor.offset(1).id();

				self.transitions
					.entry(from_word)
					.or_default()
					.entry(to_word)
					.or_default()
					.push(Assessor { strength, context });
			}

			cursor.advance();
		}
	}

	/// Scores one recorded observation against a query context.
	///
	/// Both sequences are aligned at their ends and compared backward over
	/// at most `window_width` positions. A matching token contributes
	/// `1 / (1 + sqrt(1 + frequency^damping * distance))` where distance 0
	/// is the position adjacent to the transition; the sum is multiplied
	/// by the observation's strength.
	///
	/// # Notes
	/// - Positions beyond the shorter of the two sequences are skipped,
	///   never penalized.
	/// - High-frequency tokens are damped: common filler words matching
	///   far from the transition contribute little.
	pub fn assess(&self, tokens: &[usize], assessor: &Assessor) -> f64 {
		let mut assessment = 0.0;
		let expected = &assessor.context;

		for back in 0..self.window_width {
			if back >= tokens.len() || back >= expected.len() {
				break;
			}

			let token = tokens[tokens.len() - 1 - back];
			if token == expected[expected.len() - 1 - back] {
				let count = self.frequency(token) as f64;
				let weight = 1.0
					/ (1.0 + (1.0 + count.powf(self.frequency_damping) * back as f64).sqrt());
				assessment += weight;
			}
		}

		assessment * assessor.strength
	}

	/// Scores one recorded observation against a view's tokens.
	pub fn assess_view(&self, tokens: &SentenceView<'_>, assessor: &Assessor) -> f64 {
		self.assess(tokens.token_ids(), assessor)
	}

	/// Whether any transition is recorded out of the context's last token.
	///
	/// An empty context can never be assessed and returns `false`.
	pub fn can_assess(&self, from: &[usize]) -> bool {
		match from.last() {
			Some(from_word) => self.transitions.contains_key(from_word),
			None => false,
		}
	}

	/// Text form of `can_assess`.
	///
	/// # Errors
	/// Returns an error if any context token was never interned.
	pub fn can_assess_text(&self, from: &str, separator: char) -> Result<bool, String> {
		let from_words = self.resolve_context(from, separator)?;
		Ok(self.can_assess(&from_words))
	}

	/// Total score of the transition `context -> to` over all its
	/// recorded observations.
	///
	/// Returns 0.0 for an empty context or an unrecorded transition.
	pub fn get_assessment(&self, from: &[usize], to: usize) -> f64 {
		let from_word = match from.last() {
			Some(&id) => id,
			None => return 0.0,
		};

		let to_index = match self.transitions.get(&from_word) {
			Some(index) => index,
			None => return 0.0,
		};

		let assessors = match to_index.get(&to) {
			Some(list) => list,
			None => return 0.0,
		};

		assessors.iter().map(|assessor| self.assess(from, assessor)).sum()
	}

	/// Text form of `get_assessment`.
	///
	/// An unknown `to` token scores 0.0: a word that was never seen has
	/// no recorded transitions.
	///
	/// # Errors
	/// Returns an error if any `from` context token was never interned.
	pub fn get_assessment_text(
		&self,
		from: &str,
		to: &str,
		separator: char,
	) -> Result<f64, String> {
		let from_words = self.resolve_context(from, separator)?;

		match self.bag.id_of(to) {
			Ok(to_word) => Ok(self.get_assessment(&from_words, to_word)),
			Err(_) => Ok(0.0),
		}
	}

	/// Scores every recorded successor of the context's last token.
	///
	/// Returns the grand total alongside `(score, to id)` candidates.
	/// Candidate order is hash order: callers must not depend on it, only
	/// on the total and the proportional weights.
	///
	/// Returns `(0.0, [])` for an empty context or an unrecorded token.
	pub fn get_assessments(&self, from: &[usize]) -> (f64, Vec<(f64, usize)>) {
		let from_word = match from.last() {
			Some(&id) => id,
			None => return (0.0, Vec::new()),
		};

		let to_index = match self.transitions.get(&from_word) {
			Some(index) => index,
			None => return (0.0, Vec::new()),
		};

		let mut total_tally = 0.0;
		let mut candidates = Vec::new();

		for (&to_word, assessors) in to_index {
			let tally: f64 = assessors.iter().map(|assessor| self.assess(from, assessor)).sum();

			total_tally += tally;
			candidates.push((tally, to_word));
		}

		(total_tally, candidates)
	}

	/// Resolves separator-delimited text into known token ids.
	///
	/// Hard lookups only: this path never grows the vocabulary.
	pub(crate) fn resolve_context(
		&self,
		text: &str,
		separator: char,
	) -> Result<Vec<usize>, String> {
		split_fields(text, separator)
			.into_iter()
			.map(|field| self.bag.id_of(field))
			.collect()
	}
}
