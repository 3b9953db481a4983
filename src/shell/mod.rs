// Composition root.
//
// Responsibilities
// - Read config from environment.
// - Instantiate concrete repository implementations.
// - Wire repositories into the lifecycle services.
// - Expose the HTTP router to the binary.

pub mod config;
pub mod http;
pub mod state;
