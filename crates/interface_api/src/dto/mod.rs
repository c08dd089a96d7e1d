//! Request and response bodies

pub mod claims;
pub mod venues;
pub mod admin;
