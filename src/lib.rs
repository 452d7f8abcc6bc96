//! Turns a folder of labelled JPEG images (`<root>/<class>/<name>.jpg`) into a
//! mirrored tree of small grayscale PGM files (`<out>/<class>/<class>_<name>.pgm`).

mod config;
mod convert;
mod error;
mod report;
pub mod dataset;

pub use {
    config::*,
    convert::*,
    error::*,
    report::*
};
