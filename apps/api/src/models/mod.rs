pub mod card;
pub mod career;
pub mod interaction;
pub mod saved_item;
pub mod user;
