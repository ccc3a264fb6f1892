//! Identity of the party invoking an engine operation.

use crate::{EngineError, ResultEngine};

/// Authenticated caller, built by the surrounding identity/session layer and
/// passed explicitly into each operation.
///
/// The engine does not authenticate anyone: it trusts `user_id` and scopes
/// every read and write to it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CallerContext {
    user_id: String,
}

impl CallerContext {
    pub fn new(user_id: impl Into<String>) -> ResultEngine<Self> {
        let user_id = user_id.into().trim().to_string();
        if user_id.is_empty() {
            return Err(EngineError::InvalidId(
                "caller user id must not be empty".to_string(),
            ));
        }
        Ok(Self { user_id })
    }

    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}
