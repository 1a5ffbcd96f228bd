use models::errors::ModelError;
use thiserror::Error;

/// Application-layer error: the storage error's kind plus the operation that hit it.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{op}: validation error: {detail}")]
    Validation { op: &'static str, detail: String },
    #[error("{op}: not found: {detail}")]
    NotFound { op: &'static str, detail: String },
    #[error("{op}: database error: {detail}")]
    Db { op: &'static str, detail: String },
}

impl ServiceError {
    /// Re-label a storage error with the calling operation, keeping its kind.
    pub fn at(op: &'static str, err: ModelError) -> Self {
        match err {
            ModelError::Validation(detail) => Self::Validation { op, detail },
            ModelError::NotFound(detail) => Self::NotFound { op, detail },
            ModelError::Db(detail) => Self::Db { op, detail },
        }
    }

    pub fn op(&self) -> &'static str {
        match self {
            Self::Validation { op, .. } | Self::NotFound { op, .. } | Self::Db { op, .. } => op,
        }
    }

    /// Message without the operation label.
    pub fn detail(&self) -> &str {
        match self {
            Self::Validation { detail, .. } | Self::NotFound { detail, .. } | Self::Db { detail, .. } => detail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relabel_keeps_kind_and_adds_op() {
        let e = ServiceError::at("services.subscription.get", ModelError::NotFound("subscription 7".into()));
        assert!(matches!(e, ServiceError::NotFound { .. }));
        assert_eq!(e.op(), "services.subscription.get");
        assert_eq!(e.detail(), "subscription 7");
        assert_eq!(e.to_string(), "services.subscription.get: not found: subscription 7");

        let e = ServiceError::at("op", ModelError::Db("connection reset".into()));
        assert!(matches!(e, ServiceError::Db { .. }));
        let e = ServiceError::at("op", ModelError::Validation("price".into()));
        assert!(matches!(e, ServiceError::Validation { .. }));
    }
}
