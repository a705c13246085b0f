pub mod feedback;
pub mod init;
pub mod list_models;
pub mod questions;
pub mod record;
pub mod sessions;
