mod field;
mod tree;
mod wizard;

pub use field::{ArrayRow, ConstraintItem, Control, FieldKind, FieldState, FieldValue};
pub use tree::{Condition, TreeNode};
pub use wizard::{
    Arch, CommentItem, ParameterSave, SearchEntity, SearchEntityKind, Site, StepStatus,
    WizardState,
};
