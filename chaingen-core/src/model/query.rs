use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::chain::Chain;
use super::sentence::Sentence;

/// Random source of a query, owned or borrowed.
///
/// # Variants
/// - `Owned`: created by the query itself and dropped with it.
/// - `Borrowed`: supplied by the caller, who keeps ownership and may
///   reuse the same source across queries for shared entropy.
pub enum EntropySource<'r> {
	Owned(StdRng),
	Borrowed(&'r mut StdRng),
}

impl EntropySource<'_> {
	/// Draws a uniform sample from `[0, 1)`.
	fn draw(&mut self) -> f64 {
		match self {
			EntropySource::Owned(rng) => rng.random(),
			EntropySource::Borrowed(rng) => rng.random(),
		}
	}
}

/// A stateful generation session over a trained chain.
///
/// Holds the growing context (the generation state), the result sentence
/// starting from the seed, and a random source. The query reads the chain
/// and never mutates it.
///
/// # Responsibilities
/// - Seed the context from text, ids or word lists
/// - Extend the context one token at a time by weighted sampling
/// - Halt gracefully once no continuation is recorded
///
/// # Invariants
/// - `context` and the result sentence grow in lockstep
/// - Once halted, a query stays halted
pub struct Query<'c, 'r> {
	chain: &'c Chain,
	result: Sentence,
	context: Vec<usize>,
	entropy: EntropySource<'r>,
	halted: bool,
}

impl<'c, 'r> Query<'c, 'r> {
	/// Creates a query seeded by splitting `seed` on `separator`.
	///
	/// Every seed word must already be known to the chain; seeding never
	/// grows the vocabulary. `None` as `rng` means the query creates and
	/// owns its random source.
	///
	/// # Errors
	/// Returns an error if a seed word was never interned.
	pub fn from_text(
		chain: &'c Chain,
		seed: &str,
		separator: char,
		rng: Option<&'r mut StdRng>,
	) -> Result<Self, String> {
		let words = chain.resolve_context(seed, separator)?;

		let mut query = Self::empty(chain, rng);
		for word in words {
			query.push_context(word);
		}
		Ok(query)
	}

	/// Creates a query seeded from an explicit id sequence.
	///
	/// # Errors
	/// Returns an error if an id was never assigned by the chain's
	/// vocabulary.
	pub fn from_ids(
		chain: &'c Chain,
		seed: &[usize],
		rng: Option<&'r mut StdRng>,
	) -> Result<Self, String> {
		let mut query = Self::empty(chain, rng);
		for &word in seed {
			if !chain.vocabulary().contains_id(word) {
				return Err(format!("Unknown token id: {}", word));
			}
			query.push_context(word);
		}
		Ok(query)
	}

	/// Creates a query seeded from a list of words.
	///
	/// # Errors
	/// Returns an error if a word was never interned.
	pub fn from_words(
		chain: &'c Chain,
		seed: &[&str],
		rng: Option<&'r mut StdRng>,
	) -> Result<Self, String> {
		let mut query = Self::empty(chain, rng);
		for word in seed {
			let id = chain.vocabulary().id_of(word)?;
			query.push_context(id);
		}
		Ok(query)
	}

	fn empty(chain: &'c Chain, rng: Option<&'r mut StdRng>) -> Self {
		let entropy = match rng {
			Some(rng) => EntropySource::Borrowed(rng),
			None => EntropySource::Owned(StdRng::from_os_rng()),
		};

		Self {
			chain,
			result: Sentence::new(),
			context: Vec::new(),
			entropy,
			halted: false,
		}
	}

	fn push_context(&mut self, word: usize) {
		self.context.push(word);
		self.result.append(word);
	}

	fn push_token(&mut self, word: usize) -> String {
		self.push_context(word);
		self.chain
			.vocabulary()
			.text_of(word)
			.unwrap_or("")
			.to_owned()
	}

	/// Samples and appends the next token.
	///
	/// Scores every recorded successor of the current context, draws a
	/// uniform selection over the score total, and walks the unordered
	/// candidate list until the cumulative sum exceeds the selection.
	///
	/// Returns `None` once no continuation is recorded. This is the
	/// designed termination condition, not an error; the query is halted
	/// from then on.
	///
	/// # Notes
	/// - Candidate order is hash order; cumulative sampling keeps the
	///   selection proportional to each candidate's score regardless.
	pub fn advance(&mut self) -> Option<String> {
		if self.halted {
			return None;
		}

		let (total_tally, candidates) = self.chain.get_assessments(&self.context);
		if total_tally == 0.0 {
			self.halted = true;
			return None;
		}

		let selection = self.entropy.draw() * total_tally;

		let mut so_far_tally = 0.0;
		let mut fallback = None;
		for (tally, to_word) in candidates {
			so_far_tally += tally;

			if selection < so_far_tally {
				return Some(self.push_token(to_word));
			}
			fallback = Some(to_word);
		}

		// Floating-point boundary: keep the last candidate
		fallback.map(|to_word| self.push_token(to_word))
	}

	/// Extends the result until it holds `limit` tokens.
	///
	/// A hard cap on output length, seed included; stops early on the
	/// first halt.
	pub fn advance_until(&mut self, limit: usize) {
		while self.result.len() < limit {
			if self.advance().is_none() {
				break;
			}
		}
	}

	/// Renders the produced sentence, seed included.
	pub fn text(&self) -> String {
		self.result.str(self.chain.vocabulary())
	}

	/// The produced sentence, seed included.
	pub fn sentence(&self) -> &Sentence {
		&self.result
	}

	/// The current generation context.
	pub fn context(&self) -> &[usize] {
		&self.context
	}

	/// Number of tokens produced so far, seed included.
	pub fn len(&self) -> usize {
		self.result.len()
	}

	/// Whether the query holds no tokens.
	pub fn is_empty(&self) -> bool {
		self.result.is_empty()
	}

	/// Whether the query reached its terminal state.
	pub fn is_halted(&self) -> bool {
		self.halted
	}
}
