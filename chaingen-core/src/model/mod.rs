//! Top-level module for the context-weighted generation system.
//!
//! This crate provides a token-level Markov text generator, including:
//! - An append-only token vocabulary (`Vocabulary`)
//! - Tokenized sentences, bounded views and cursors (`Sentence`)
//! - The trained transition index and scoring (`Chain`)
//! - A stateful sampling session (`Query`)

/// Append-only string interner mapping tokens to stable integer ids.
///
/// Holds the reserved empty-token sentinel and supports hard lookups
/// in both directions.
pub mod vocabulary;

/// Tokenized sentences over a vocabulary.
///
/// Supports separator-based construction, appends, zero-copy bounded
/// views and forward-only cursors with one-token lookahead.
pub mod sentence;

/// The trained chain: transition index, frequency table and scoring.
///
/// Handles sentence ingestion, context recording and context-sensitive
/// candidate assessment.
pub mod chain;

/// Stateful generation session over a trained chain.
///
/// Extends a seed context one token at a time by weighted random
/// sampling, with an owned or borrowed random source.
pub mod query;
