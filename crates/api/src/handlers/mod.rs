pub mod push;
pub mod slots;
