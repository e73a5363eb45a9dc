pub mod candles;
pub mod macros;
pub mod order_book;
pub mod ticker;
pub mod trading;

pub mod util;
