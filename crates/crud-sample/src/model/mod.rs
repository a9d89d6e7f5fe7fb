//! Domain entities of the sample and their wire DTOs.

pub mod company;
pub mod employee;

pub use company::*;
pub use employee::*;
