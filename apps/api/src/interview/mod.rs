// Interview core: session state, the turn controller, and the generation
// steps it drives. All LLM calls go through the TextGenerator trait.

pub mod controller;
pub mod feedback;
pub mod handlers;
pub mod prompts;
pub mod questions;
pub mod session;
