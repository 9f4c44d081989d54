pub mod auth;
pub mod registrations;
pub mod stats;
pub mod tournaments;
pub mod users;
