pub use checked::{Async, Lift};
pub use function::{Args, Function};
pub use promise::Promise;
pub use value::{Thrown, Value};

mod checked;
mod function;
mod promise;
mod value;
