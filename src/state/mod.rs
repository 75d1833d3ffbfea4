mod notify;
mod settings;
mod wizard;

pub use notify::{ChangeNotifier, Subscription};
pub use settings::{EditKey, SettingsState};
pub use wizard::WizardProgress;
