// bk-domain library entry point
pub mod condition;
pub mod error;
pub mod facet;
pub mod file;
pub mod flags;
pub mod job;
pub mod processing_pass;
pub mod production;
pub mod step;

pub use condition::{Condition, DataTakingCondition, SimulationCondition};
pub use error::DomainError;
pub use facet::{Facet, SENTINEL};
pub use file::{FileMetadata, FileRecord};
pub use flags::{ReplicaFlag, SortOrder, Visibility};
pub use job::Job;
pub use processing_pass::{PassPath, ProcessingPassNode};
pub use production::{ConditionRef, Configuration, Production, ProductionId, ProductionStep};
pub use step::Step;
