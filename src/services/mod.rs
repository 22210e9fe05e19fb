pub mod auth_events;
pub mod email_service;
pub mod seed;
pub mod storage_service;
