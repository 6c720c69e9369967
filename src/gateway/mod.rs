mod rates;

pub use rates::*;
