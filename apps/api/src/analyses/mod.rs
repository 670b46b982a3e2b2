// Analyses API: rank uploaded resumes against a job description and keep the
// most recent results in memory for follow-up detail views.

pub mod handlers;
pub mod store;
