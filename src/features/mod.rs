pub mod contact;
pub mod content;
pub mod pages;
pub mod rate_limits;
