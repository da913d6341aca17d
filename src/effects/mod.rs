pub mod tremolo;

pub use self::tremolo::*;
