/// Data layer: core types, ordinal categories, and loading.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → SurveyTable
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ SurveyTable  │  typed columns, interned categories
///   └─────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ aggregate │  pure transforms → summaries
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod ordinal;
pub mod schema;

pub use loader::load_file;
pub use model::{CategoricalColumn, Column, SurveyTable};
pub use ordinal::{CategoryOrder, DaysIndoors, MoodSwings, Ordinal};
