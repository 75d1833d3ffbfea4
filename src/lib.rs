#![deny(rust_2018_idioms)]

pub mod api;
pub mod domain;
pub mod form;
pub mod schema;
pub mod state;

pub mod prelude {
    pub use crate::api::{HydraApi, WizardApi};
    pub use crate::domain::{
        ArrayRow, CommentItem, Condition, ConstraintItem, Control, FieldKind, FieldState,
        FieldValue, ParameterSave, SearchEntity, TreeNode, WizardState,
    };
    pub use crate::schema::{decode_field, decode_tree, encode_field};
    pub use crate::state::{ChangeNotifier, SettingsState, Subscription, WizardProgress};
}
