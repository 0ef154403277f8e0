pub mod util;
pub mod wordle;
