//! Domain records shared by all finding data sources.

mod finding;
mod user;

pub use finding::{Dependency, Finding, FindingKey, SecurityRisk, Vulnerability};
pub use user::User;
