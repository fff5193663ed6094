//! Identity hashing for agent attribution
//!
//! Turns semantic inputs (tool list, system prompt, message text) into short
//! deterministic hex digests used as identity keys by the claim registry and
//! the bookkeeping layer.
//!
//! Digests are 64-bit truncations of SHA-256 — compact correlation hints,
//! deliberately not cryptographic identifiers.

pub mod hasher;

pub use hasher::{
    compute_agent_type_hash, compute_conversation_hash, compute_tool_set_hash,
    hash_first_assistant_response, hash_system_prompt, hash_user_message,
};
