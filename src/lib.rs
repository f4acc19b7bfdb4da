pub mod bimap;
pub mod bit_array;
pub mod categorical;
pub mod dispatch;
pub mod error;
mod ids;
pub mod options;
mod row_hash;
pub mod set_ops;

pub use categorical::{Categorical, NumericMatrix};
pub use error::{Error, Status};
pub use ids::ProgenitorTag;
pub use options::CategoricalOptions;

pub type Result<T> = std::result::Result<T, error::Error>;
