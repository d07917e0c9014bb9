use std::io;

use stampcall_capi_utils::ForeignStringError;

#[derive(Debug, thiserror::Error)]
pub enum InvokeError {
    #[error("failed to marshal the argument: {0}")]
    Marshal(#[from] ForeignStringError),
    #[error("failed to write the result: {0}")]
    Report(#[from] io::Error),
}
