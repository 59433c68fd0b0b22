// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Opaque bearer access tokens.
//!
//! Tokens are `bl_` followed by 64 hex characters. Only the SHA-256 hash of a
//! token is ever persisted; the plaintext is returned to the user once at
//! registration.

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Prefix for user access tokens.
pub const ACCESS_TOKEN_PREFIX: &str = "bl_";

const TOKEN_BYTES: usize = 32;

/// Generate a new access token, returning `(plaintext, hash)`.
pub fn generate_access_token() -> (String, String) {
	let mut bytes = [0u8; TOKEN_BYTES];
	rand::thread_rng().fill_bytes(&mut bytes);
	let token = format!("{ACCESS_TOKEN_PREFIX}{}", hex::encode(bytes));
	let hash = hash_token(&token);
	(token, hash)
}

/// Hash a token for storage or lookup.
pub fn hash_token(token: &str) -> String {
	let mut hasher = Sha256::new();
	hasher.update(token.as_bytes());
	hex::encode(hasher.finalize())
}

/// Check if a token looks like a Bugline access token.
pub fn is_access_token(token: &str) -> bool {
	token
		.strip_prefix(ACCESS_TOKEN_PREFIX)
		.is_some_and(|rest| rest.len() == TOKEN_BYTES * 2 && rest.bytes().all(|b| b.is_ascii_hexdigit()))
}
