// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Conversion of free rider text into an FTS5 match expression.
//!
//! Every token is wrapped as a quoted prefix term (`"tok"*`) and the terms are
//! joined with ` AND `. Quotes are removed from tokens before wrapping, so a
//! caller can never close a string early and smuggle in operators such as
//! `OR`, `NEAR` or column filters.

use std::fmt;

use crate::validation::FieldError;

pub const INPUT_FIELD: &str = "input";
pub const INPUT_REQUIRED: &str = "input parameter is required";

/// A match expression built only from sanitized, quoted prefix terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchExpression(String);

impl SearchExpression {
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for SearchExpression {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Strip characters the store cannot hold in text: control characters other
/// than whitespace, and U+FFFD left behind by lossy percent-decoding.
///
/// Whitespace controls survive because they still separate tokens.
pub fn sanitize_query_text(input: &str) -> String {
	input
		.chars()
		.filter(|c| *c != char::REPLACEMENT_CHARACTER && !(c.is_control() && !c.is_whitespace()))
		.collect()
}

fn input_required() -> FieldError {
	FieldError::new(INPUT_FIELD, INPUT_REQUIRED)
}

/// Every surviving token becomes a quoted prefix term, and all terms must
/// match. A token with no indexable characters (for example `-`) is kept
/// and tokenizes to an empty phrase, so the whole search matches nothing.
pub fn build_search_expression(input: &str) -> Result<SearchExpression, FieldError> {
	if input.trim().is_empty() {
		return Err(input_required());
	}

	let sanitized = sanitize_query_text(input);

	let terms: Vec<String> = sanitized
		.split_whitespace()
		.map(|token| {
			token
				.chars()
				.filter(|c| *c != '"' && *c != '\'')
				.collect::<String>()
		})
		.map(|token| token.trim().to_string())
		.filter(|token| !token.is_empty())
		.map(|token| format!("\"{token}\"*"))
		.collect();

	if terms.is_empty() {
		return Err(input_required());
	}

	Ok(SearchExpression(terms.join(" AND ")))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_single_token() {
		let expr = build_search_expression("Downtown").unwrap();
		assert_eq!(expr.as_str(), "\"Downtown\"*");
	}

	#[test]
	fn test_multiple_tokens_joined_with_and() {
		let expr = build_search_expression("  rapid   ride  ").unwrap();
		assert_eq!(expr.as_str(), "\"rapid\"* AND \"ride\"*");
	}

	#[test]
	fn test_quotes_are_removed() {
		let expr = build_search_expression("\"Bob's\" \"line").unwrap();
		assert_eq!(expr.as_str(), "\"Bobs\"* AND \"line\"*");
	}

	#[test]
	fn test_operators_are_neutralised() {
		let expr = build_search_expression("a\" OR \"b NEAR(c)").unwrap();
		assert_eq!(expr.as_str(), "\"a\"* AND \"OR\"* AND \"b\"* AND \"NEAR(c)\"*");
	}

	#[test]
	fn test_punctuation_only_token_is_kept() {
		let expr = build_search_expression("downtown -").unwrap();
		assert_eq!(expr.as_str(), "\"downtown\"* AND \"-\"*");
	}

	#[test]
	fn test_blank_input_is_required() {
		for input in ["", "   ", "\t\n"] {
			let err = build_search_expression(input).unwrap_err();
			assert_eq!(err.field, INPUT_FIELD);
			assert_eq!(err.message, INPUT_REQUIRED);
		}
	}

	#[test]
	fn test_quote_only_input_is_required() {
		let err = build_search_expression("\" '' \"'").unwrap_err();
		assert_eq!(err.message, INPUT_REQUIRED);
	}

	#[test]
	fn test_control_only_input_is_required() {
		let err = build_search_expression("\u{0}\u{7}\u{fffd}").unwrap_err();
		assert_eq!(err.message, INPUT_REQUIRED);
	}

	#[test]
	fn test_sanitize_strips_controls_and_replacement_char() {
		assert_eq!(sanitize_query_text("a\u{0}b\u{fffd}c"), "abc");
		assert_eq!(sanitize_query_text("a\tb\nc"), "a\tb\nc");
		assert_eq!(sanitize_query_text("Café"), "Café");
	}

	#[test]
	fn test_whitespace_controls_still_split_tokens() {
		let expr = build_search_expression("10\t49").unwrap();
		assert_eq!(expr.as_str(), "\"10\"* AND \"49\"*");
	}

	mod property_tests {
		use super::*;
		use proptest::prelude::*;

		proptest! {
			#[test]
			fn prop_quote_and_space_only_input_is_rejected(input in "[\"' \t]{0,24}") {
				let err = build_search_expression(&input).unwrap_err();
				prop_assert_eq!(err.message, INPUT_REQUIRED);
			}

			#[test]
			fn prop_every_term_is_a_quoted_prefix(input in "\\PC{0,64}") {
				if let Ok(expr) = build_search_expression(&input) {
					for term in expr.as_str().split(" AND ") {
						prop_assert!(term.len() >= 4);
						prop_assert!(term.starts_with('"'));
						prop_assert!(term.ends_with("\"*"));
						let inner = &term[1..term.len() - 2];
						prop_assert!(!inner.is_empty());
						prop_assert!(!inner.contains('"'));
						prop_assert!(!inner.contains('\''));
						prop_assert!(!inner.chars().any(char::is_whitespace));
					}
				}
			}

			#[test]
			fn prop_is_deterministic(input in "\\PC{0,32}") {
				prop_assert_eq!(
					build_search_expression(&input),
					build_search_expression(&input)
				);
			}
		}
	}
}
