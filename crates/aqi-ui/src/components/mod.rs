pub mod gauge;
pub mod header;
pub mod indicators;
