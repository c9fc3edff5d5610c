pub mod conversation;
pub mod event;
pub mod generation;
pub mod response;
