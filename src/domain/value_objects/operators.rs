use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authenticated operator performing a request, as carried through the
/// use-case layer. Role lookups happen against the store, not the token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Operator {
    pub user_id: Uuid,
    pub username: String,
}
