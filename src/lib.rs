#![doc = "The `taskgate` library crate."]
#![doc = ""]
#![doc = "Credential issuance and request authorization for the task service: bcrypt"]
#![doc = "password hashing, HS256 identity tokens, an identity directory with the"]
#![doc = "first-user-is-admin rule, and the authenticate → authorize request gate."]
#![doc = "The binary (`main.rs`) wires these into an Actix Web server."]

pub mod auth;
pub mod config;
pub mod directory;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod tasks;
pub mod workflow;

pub use error::AppError;
pub use state::AppState;
pub use workflow::CredentialWorkflow;
