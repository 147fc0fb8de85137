//! Conversions from external infrastructure errors into SDK errors.

use reqwest::Error as HttpError;
use ron_sdk_common::resilience::AttemptError;
use ron_sdk_domain::{codes, SdkError};

use super::TransportError;

/* -------------------------------------------------------------------------- */
/* reqwest::Error → TransportError */
/* -------------------------------------------------------------------------- */

impl From<HttpError> for TransportError {
    fn from(err: HttpError) -> Self {
        if is_io_failure(&err) {
            TransportError::Io(Box::new(err))
        } else {
            TransportError::Client(Box::new(err))
        }
    }
}

fn is_io_failure(err: &HttpError) -> bool {
    if err.is_timeout() || err.is_request() || err.is_body() {
        return true;
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        if err.is_connect() {
            return true;
        }
    }
    false
}

/* -------------------------------------------------------------------------- */
/* TransportError → AttemptError */
/* -------------------------------------------------------------------------- */

impl From<TransportError> for AttemptError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Io(source) => AttemptError::Classified(
                SdkError::transport(codes::TRANSPORT_IO_ERROR, "I/O error during HTTP call", true)
                    .with_boxed_source(source),
            ),
            TransportError::Client(source) => AttemptError::Unclassified(source),
        }
    }
}
