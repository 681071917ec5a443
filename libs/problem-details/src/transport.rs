//! Handing encoded problems to a response transport.
//!
//! The crate never performs network I/O itself. A transport implements
//! [`ProblemWriter`]; with the `axum` feature, `Problem` is also an
//! `IntoResponse`.

use crate::error::ProblemError;
use crate::problem::Problem;

/// Destination for an encoded problem: status, media type and body.
pub trait ProblemWriter {
    type Error: From<ProblemError>;

    /// Writes one response.
    ///
    /// # Errors
    /// Whatever the underlying transport reports.
    fn write_problem(
        &mut self,
        status: i64,
        media_type: &'static str,
        body: Vec<u8>,
    ) -> Result<(), Self::Error>;
}

impl Problem {
    /// Encodes the document and writes it with its own status and
    /// `application/problem+json`.
    ///
    /// # Errors
    /// Encoding failures (converted into the writer's error) or the writer's
    /// own failure.
    pub fn write_to<W: ProblemWriter>(&self, writer: &mut W) -> Result<(), W::Error> {
        let body = self.to_json_vec()?;
        writer.write_problem(self.status, self.media_type(), body)
    }
}

/// Axum integration: make Problem directly usable as a response
#[cfg(feature = "axum")]
impl axum::response::IntoResponse for Problem {
    fn into_response(self) -> axum::response::Response {
        use axum::http::{HeaderValue, StatusCode, header};

        let status = self.status_code().unwrap_or_else(|| {
            tracing::warn!(status = self.status, "Problem status is not a valid HTTP status code");
            StatusCode::INTERNAL_SERVER_ERROR
        });

        match self.to_json_vec() {
            Ok(body) => {
                let mut resp = (status, body).into_response();
                resp.headers_mut().insert(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static(crate::problem::APPLICATION_PROBLEM_JSON),
                );
                resp
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode problem response");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
