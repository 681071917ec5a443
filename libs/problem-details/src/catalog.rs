//! Static error definitions for application-owned problem type catalogs.

use crate::problem::Problem;

/// Static error definition from a catalog.
///
/// Applications declare these as `const` items next to their own type URIs:
///
/// ```
/// use problem_details::ErrDef;
///
/// const NOT_FOUND: ErrDef = ErrDef {
///     status: 404,
///     title: "Not Found",
///     type_url: "https://errors.example.com/database/no-results",
/// };
///
/// let problem = NOT_FOUND.as_problem("no user with id 42");
/// assert_eq!(problem.status, 404);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrDef {
    pub status: i64,
    pub title: &'static str,
    pub type_url: &'static str,
}

impl ErrDef {
    /// Convert this error definition into a Problem with the given detail
    #[inline]
    pub fn as_problem(&self, detail: impl Into<String>) -> Problem {
        Problem::new(self.type_url, self.title, self.status).with_detail(detail)
    }
}
