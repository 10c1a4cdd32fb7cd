pub mod config;
pub mod events;
pub mod metrics;
pub mod remote;
pub mod store;
pub mod sync;
pub mod testing;
pub mod view;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
};
pub use events::{ChangeKind, ChangeNotifier, StoreChange};
pub use remote::{
    CatalogSource, Category, RemoteError, ThumbnailSource, TmdbClient, TmdbConfig, YoutubeClient,
    YoutubeConfig,
};
pub use store::{
    CatalogFilters, MovieRecord, MovieStore, ReviewRecord, SqliteStore, StoreError, StoreStats,
    VideoRecord,
};
pub use sync::{SubResources, SyncEngine, SyncError, SyncOutcome};
pub use view::CatalogView;
