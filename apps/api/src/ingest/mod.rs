// External collaborators: PDF text extraction and job-board fetching.
// Both degrade to empty text or an explicit failure outcome instead of erroring.

pub mod handlers;
pub mod jd_fetch;
pub mod pdf;
