pub mod config_store;
pub mod entry_lister;

pub use config_store::{ConfigStore, ConfigStoreError, GkConfigFile};
pub use entry_lister::{EntryLister, WalkDirLister};
