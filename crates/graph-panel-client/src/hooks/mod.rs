mod use_location_hash;
mod use_reveal;

pub use use_location_hash::use_location_hash;
pub use use_reveal::use_reveal;
