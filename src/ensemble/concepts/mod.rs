//! The concepts.
//!
//! Each concept is an independent slice of persistent state plus its guarded
//! operations. Concepts never call one another; each receives its own
//! storage port(s) at construction and owns its collections outright.
//!
//! Every operation follows the same contract: validate the input's shape,
//! read whatever state its precondition needs, return an error with **no
//! mutation** if the precondition fails, otherwise apply the effect and
//! return any newly created identifiers. Failures are values
//! ([`crate::error::OpError`]); callers pattern-match, never assume success.

pub mod auth;
pub mod comments;
pub mod files;
pub mod tagging;
