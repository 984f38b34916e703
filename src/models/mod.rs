pub mod board_item;
pub mod domain;
pub mod mapping;
pub mod plan;
pub mod record;
pub mod sync_run;
pub mod value;

pub use board_item::BoardItem;
pub use domain::Domain;
pub use mapping::{FieldKind, FieldMapping, FieldSpec, KeySource, NullPolicy, StatusOptions};
pub use plan::{ActionPlan, FieldDiff, UpdateAction};
pub use record::MasterRecord;
pub use sync_run::SyncRun;
pub use value::{BoardValue, SourceValue};
