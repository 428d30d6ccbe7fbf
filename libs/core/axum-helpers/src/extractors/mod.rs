//! Extractors that reject with [`AppError`](crate::errors::AppError) so
//! every client error has the same JSON shape.

pub mod id_path;
pub mod query;
pub mod upload;
pub mod validated_json;

pub use id_path::{IdPairPath, IdPath, parse_id};
pub use query::ApiQuery;
pub use upload::{UploadForm, UploadedFile};
pub use validated_json::ValidatedJson;
