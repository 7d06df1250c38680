#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod codec;
pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use codec::{Document, Indexable};
pub use error::{Error, Result};
