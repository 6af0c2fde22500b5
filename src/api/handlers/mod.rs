pub mod ping;
pub mod protected;
