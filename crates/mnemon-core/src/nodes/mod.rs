//! Turn-loop nodes: the conversation node and the three update nodes.

mod conversation;
mod instructions;
mod profile;
mod todos;

pub use conversation::run_conversation;
pub use instructions::update_instructions;
pub use profile::update_profile;
pub use todos::update_todos;
