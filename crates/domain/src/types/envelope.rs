//! Canonical success/problem envelope returned by every client call.

use super::problem::Problem;

/// Typed result of a gateway call.
///
/// Well-formed responses carry exactly one of `data` or `problem`. This is
/// not enforced: whatever the wire carried is preserved, including neither
/// (absent or blank body).
#[derive(Debug, Clone, PartialEq)]
pub struct AppResponse<T> {
    data: Option<T>,
    problem: Option<Problem>,
    status: u16,
}

impl<T> AppResponse<T> {
    pub fn new(data: Option<T>, problem: Option<Problem>, status: u16) -> Self {
        Self { data, problem, status }
    }

    pub fn success(data: T, status: u16) -> Self {
        Self::new(Some(data), None, status)
    }

    pub fn failure(problem: Problem, status: u16) -> Self {
        Self::new(None, Some(problem), status)
    }

    /// Envelope with neither data nor problem.
    pub fn empty(status: u16) -> Self {
        Self::new(None, None, status)
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }

    pub fn problem(&self) -> Option<&Problem> {
        self.problem.as_ref()
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn into_parts(self) -> (Option<T>, Option<Problem>, u16) {
        (self.data, self.problem, self.status)
    }

    /// Status in `[200, 300)` and no problem present.
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status) && self.problem.is_none()
    }

    /// Split into data or problem, for callers who prefer `?`.
    ///
    /// A problem always wins, whatever the status. A non-2xx status without
    /// a problem yields `Ok` with whatever data is present.
    pub fn into_result(self) -> Result<Option<T>, Problem> {
        match self.problem {
            Some(problem) => Err(problem),
            None => Ok(self.data),
        }
    }

    pub fn map<U, F>(self, f: F) -> AppResponse<U>
    where
        F: FnOnce(T) -> U,
    {
        AppResponse { data: self.data.map(f), problem: self.problem, status: self.status }
    }
}
