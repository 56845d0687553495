//! Core analysis building blocks: coordinate mapping (`geo`), pixel windows
//! (`window`), the daily ET series builder (`series`), diagnostics, the
//! positional aligner (`align`) and run parameters. These are the primitives
//! consumed by the high-level `api` module.
pub mod align;
pub mod diagnostics;
pub mod geo;
pub mod params;
pub mod series;
pub mod window;
