// Purpose - audio outputs and persisted settings

#[cfg(feature = "rtrb")]
pub mod cpal_sink;
pub mod mixer;
pub mod offline;
pub mod settings;
pub mod sink;

#[cfg(feature = "rtrb")]
pub use cpal_sink::CpalSink;
pub use offline::OfflineSink;
pub use settings::{FileStore, MemoryStore, SettingsError, SettingsStore};
pub use sink::{AudioSink, ScheduledSource, SinkError, SinkState};
