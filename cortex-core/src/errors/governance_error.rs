/// Governance / GDPR cascade errors (C8).
#[derive(Debug, thiserror::Error)]
pub enum GovernanceError {
    #[error("policy violation: {reason}")]
    PolicyViolation { reason: String },

    #[error("cascade for user {user_id} interrupted, {remaining} collections remain")]
    CascadeInterrupted { user_id: String, remaining: usize },

    #[error("retention policy would delete the current version of {collection} {id}, which is not allowed")]
    WouldOrphanPrimaryKey { collection: String, id: String },
}
