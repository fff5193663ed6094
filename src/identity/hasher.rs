//! Content-addressed identity hashing
//!
//! All functions here are pure: identical inputs always produce identical
//! digests, there is no randomness and no external state, and nothing fails
//! for well-formed string/slice input.

use sha2::{Digest, Sha256};

use crate::core::{AgentTypeHash, ConversationHash};

/// Number of hex characters kept from the full SHA-256 digest (64 bits)
const DIGEST_HEX_LEN: usize = 16;

/// Assistant responses are hashed on their first 500 characters only, so a
/// truncated stream and the full response agree on identity.
const ASSISTANT_PREFIX_CHARS: usize = 500;

/// SHA-256 of the input, truncated to 16 lowercase hex characters
fn short_digest(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let full = hex::encode(hasher.finalize());
    full[..DIGEST_HEX_LEN].to_string()
}

/// Hash a set of tool names, independent of ordering
///
/// The names are sorted before hashing so permutation-equivalent tool sets
/// produce the same digest.
pub fn compute_tool_set_hash(tools: &[String]) -> String {
    let mut sorted: Vec<&str> = tools.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    short_digest(&sorted.join("\n"))
}

/// Combine a system prompt digest and a tool set digest into an agent type
/// identity
pub fn compute_agent_type_hash(system_prompt_hash: &str, tool_set_hash: &str) -> AgentTypeHash {
    let combined = format!("{}{}", system_prompt_hash, tool_set_hash);
    AgentTypeHash::new(short_digest(&combined))
}

/// Combine an agent type identity with the first exchanged messages into a
/// conversation identity
///
/// A later turn of the same conversation reproduces this hash, which is how
/// a resumed agent is distinguished from a new one.
pub fn compute_conversation_hash(
    agent_type_hash: &AgentTypeHash,
    user_msg_hash: &str,
    assistant_msg_hash: &str,
) -> ConversationHash {
    let combined = format!(
        "{}{}{}",
        agent_type_hash.as_str(),
        user_msg_hash,
        assistant_msg_hash
    );
    ConversationHash::new(short_digest(&combined))
}

/// Hash a system prompt (surrounding whitespace ignored)
pub fn hash_system_prompt(text: &str) -> String {
    short_digest(text.trim())
}

/// Hash a user message (surrounding whitespace ignored)
pub fn hash_user_message(text: &str) -> String {
    short_digest(text.trim())
}

/// Hash the first assistant response
///
/// Trims surrounding whitespace, then keeps only the first 500 characters
/// before hashing: any two responses that agree on that prefix hash
/// identically.
pub fn hash_first_assistant_response(text: &str) -> String {
    let trimmed = text.trim();
    let prefix: String = trimmed.chars().take(ASSISTANT_PREFIX_CHARS).collect();
    short_digest(&prefix)
}
