pub mod auth;
pub mod health;
pub mod issues;
pub mod profile;
pub mod voice;
