//! HTTP front for the find-my-device skill.

pub mod server;
pub mod skill_routes;
