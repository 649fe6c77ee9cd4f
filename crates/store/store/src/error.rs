use crate::RecordId;

/// Errors that can occur during record store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend could not be reached or initialized.
    #[error("connection error: {0}")]
    Connection(String),

    /// An error from the underlying storage backend.
    #[error("storage error: {0}")]
    Backend(String),

    /// The requested record does not exist.
    #[error("encuesta {0} no encontrada")]
    NotFound(RecordId),

    /// The operation is not supported by this backend.
    #[error("operación no soportada por el backend {backend}: {operation}")]
    Unsupported {
        /// Backend name (see `RecordStore::backend_name`).
        backend: &'static str,
        /// The rejected operation.
        operation: &'static str,
    },

    /// A patch value could not be applied to the record.
    #[error("valor inválido: {0}")]
    InvalidValue(#[from] censo_core::ValidationError),
}

impl StoreError {
    /// Shorthand for [`StoreError::Unsupported`].
    pub fn unsupported(backend: &'static str, operation: &'static str) -> Self {
        StoreError::Unsupported { backend, operation }
    }
}
