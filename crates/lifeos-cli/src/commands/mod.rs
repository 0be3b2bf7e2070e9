pub mod auth;
pub mod calendar;
pub mod capture;
pub mod fitness;
pub mod journal;
pub mod project;
pub mod task;
