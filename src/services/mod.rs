pub mod assignment_registry;
pub mod authenticator;
pub mod outline_submitter;
pub mod platform_client;
pub mod routes;

pub use assignment_registry::AssignmentRegistry;
pub use authenticator::SessionAuthenticator;
pub use outline_submitter::OutlineSubmitter;
pub use platform_client::PlatformClient;
