//! One `ResourceFlow` implementation per service. Each runner owns its
//! client, its fixed `ResourceSpec`, and the mapping from its SDK's
//! "already exists" error variant to `Provisioned::AlreadyExists`.

pub mod bucket;
pub mod logs;
pub mod queue;
pub mod schedule;
pub mod secret;
pub mod table;
