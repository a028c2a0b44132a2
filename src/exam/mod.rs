// src/exam/mod.rs

//! Exam flow: sampling papers, grading submissions, recording and reviewing attempts.

pub mod grader;
pub mod results;
pub mod sampler;
