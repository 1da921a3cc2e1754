pub mod assignment;
pub mod bbox;
pub mod catalog;
pub mod credentials;
pub mod loaders;
pub mod outline;
pub mod position;

pub use assignment::{AssignmentId, CreationOutcome, RemoteAssignment};
pub use bbox::BoundingBox;
pub use catalog::{QuestionCatalog, QuestionCatalogEntry};
pub use credentials::Credentials;
pub use loaders::{load_credentials, load_question_catalog};
pub use outline::{IdentificationRegions, OutlineAssignment, OutlineDocument, OutlineQuestion};
pub use position::{AnswerKind, BoxKind, BoxTarget, PositionRecord, SpecialKind};
