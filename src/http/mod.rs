pub mod cors;
pub mod guard;
pub mod handlers;
pub mod response;
