pub mod battle;
pub mod bot;
pub mod command;
pub mod constants;
pub mod conversation;
pub mod gate;
pub mod message;
pub mod prompt;
pub mod roast;
pub mod session;
