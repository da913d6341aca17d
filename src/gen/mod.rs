pub mod lfo;
pub mod waveform;

pub use self::lfo::*;
pub use self::waveform::*;
