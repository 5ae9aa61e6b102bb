pub(crate) mod authentication;
pub(crate) mod error_handling;
pub(crate) mod inject_user_agent;
