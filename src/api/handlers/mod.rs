pub mod announcements;
pub mod auth;
pub mod classes;
pub mod root;
