//! 工具函数模块

pub mod convert;
pub mod response;
pub mod validation;

pub use convert::*;
pub use validation::*;
