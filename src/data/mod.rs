/// Data layer: core types and loading.
///
/// Architecture:
/// ```text
///  .parquet / .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table    │  name → Vec<f64>, bounds-checked accessors
///   └──────────┘
///        │
///        ▼
///   Signal / TimingSample   typed views handed to the aligner
/// ```

pub mod loader;
pub mod model;

pub use loader::load_file;
pub use model::{Column, Signal, Table, TimingSample};
