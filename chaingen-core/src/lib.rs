//! Context-weighted Markov text generation library.
//!
//! This crate provides a token-level Markov generation system including:
//! - An append-only token vocabulary (string interning)
//! - Tokenized sentences with bounded views and forward cursors
//! - A context-weighted transition index built from example sentences
//! - Probabilistic generation with weighted random sampling
//!
//! Only the high-level API is exposed publicly. Low-level components
//! are kept internal to ensure consistency and prevent misuse.

/// Core chain model and generation logic.
///
/// This module exposes the vocabulary, sentence, chain and query types
/// while keeping internal representations private.
pub mod model;
