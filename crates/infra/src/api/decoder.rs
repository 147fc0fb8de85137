//! Envelope decoding
//!
//! Turns a transport status plus optional raw body into an
//! [`AppResponse<T>`]. The wire format is a JSON object with optional `data`
//! and `problem` members. Unknown problem fields are preserved, never
//! rejected.
//!
//! Every failure is a `DECODE_ERROR`. Error messages never echo the body,
//! which may carry sensitive payloads.

use ron_sdk_domain::constants::HEADER_CORRELATION_ID;
use ron_sdk_domain::{AppResponse, Problem, SdkError, SdkResult, TransportResponse};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Stateless decoder for the gateway envelope
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvelopeDecoder;

impl EnvelopeDecoder {
    /// Decode `body` into an envelope carrying `status`.
    ///
    /// An absent or blank body yields an envelope with neither data nor
    /// problem. Callers that do not care about the payload can use
    /// [`serde::de::IgnoredAny`] as `T`.
    ///
    /// # Errors
    /// Returns a non-retryable decode error when the body is not a JSON
    /// object or `data`/`problem` do not match the expected shapes
    pub fn decode<T: DeserializeOwned>(
        status: u16,
        body: Option<&str>,
    ) -> SdkResult<AppResponse<T>> {
        let Some(body) = body.filter(|b| !b.trim().is_empty()) else {
            return Ok(AppResponse::empty(status));
        };

        let root: Value = serde_json::from_str(body).map_err(|e| {
            SdkError::decode("Response body is not valid JSON")
                .with_detail("status", status)
                .with_source(e)
        })?;
        let Value::Object(mut fields) = root else {
            return Err(SdkError::decode("Response envelope must be a JSON object")
                .with_detail("status", status));
        };

        let problem = take_non_null(&mut fields, "problem")
            .map(serde_json::from_value::<Problem>)
            .transpose()
            .map_err(|e| {
                SdkError::decode("Failed to decode problem from response")
                    .with_detail("status", status)
                    .with_source(e)
            })?;

        let data = take_non_null(&mut fields, "data")
            .map(serde_json::from_value::<T>)
            .transpose()
            .map_err(|e| {
                SdkError::decode("Failed to decode data from response")
                    .with_detail("status", status)
                    .with_source(e)
            })?;

        Ok(AppResponse::new(data, problem, status))
    }

    /// Decode a raw body as received from the transport.
    ///
    /// # Errors
    /// Returns a decode error when the body is not valid UTF-8, otherwise
    /// see [`EnvelopeDecoder::decode`]
    pub fn decode_bytes<T: DeserializeOwned>(
        status: u16,
        body: Option<&[u8]>,
    ) -> SdkResult<AppResponse<T>> {
        let text = body
            .map(std::str::from_utf8)
            .transpose()
            .map_err(|e| {
                SdkError::decode("Response body is not valid UTF-8")
                    .with_detail("status", status)
                    .with_source(e)
            })?;
        Self::decode::<T>(status, text)
    }

    /// Decode with `data` left as untyped JSON.
    ///
    /// # Errors
    /// See [`EnvelopeDecoder::decode`]
    pub fn decode_value(status: u16, body: Option<&str>) -> SdkResult<AppResponse<Value>> {
        Self::decode::<Value>(status, body)
    }

    /// Decode a full transport response.
    ///
    /// A problem without its own correlation id picks up the response's
    /// `X-Correlation-Id` header, if any.
    ///
    /// # Errors
    /// See [`EnvelopeDecoder::decode`]
    pub fn decode_response<T: DeserializeOwned>(
        response: &TransportResponse,
    ) -> SdkResult<AppResponse<T>> {
        let decoded = Self::decode_bytes::<T>(response.status, response.body_bytes())?;
        let Some(correlation_id) = response.header(HEADER_CORRELATION_ID) else {
            return Ok(decoded);
        };

        let (data, problem, status) = decoded.into_parts();
        let problem = problem.map(|mut problem| {
            problem.set_correlation_id_if_absent(correlation_id);
            problem
        });
        Ok(AppResponse::new(data, problem, status))
    }
}

fn take_non_null(fields: &mut Map<String, Value>, key: &str) -> Option<Value> {
    fields.remove(key).filter(|v| !v.is_null())
}
