mod card_state;
mod explainer_settings;
mod gender;
mod ids;
mod missed;
mod mode;
mod word;

pub use card_state::CardState;
pub use explainer_settings::{ExplainerSettings, ExplainerSettingsDraft, ExplainerSettingsError};
pub use gender::{Category, Gender, ParseCategoryError, ParseGenderError};
pub use ids::{ParseIdError, WordId};
pub use missed::MissedSet;
pub use mode::AppMode;
pub use word::WordEntry;
