pub mod decoder;
pub mod etl;
pub mod html;
pub mod pipeline;
pub mod sample;

pub use crate::domain::model::{DecodedMessage, RawDocument};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
