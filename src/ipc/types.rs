use crate::config::Config;
use crate::data::DataStore;
use crate::nav::Navigator;
use crate::rng::SeededRng;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub config: Config,
    pub seed: u64,
    /// Generated once in `new`; never mutated afterwards.
    pub store: DataStore,
    pub nav: Navigator,
    /// Continues the seeded stream after generation; feeds fabricated report values.
    pub rng: SeededRng,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let (mut rng, seed) = match config.seed {
            Some(seed) => (SeededRng::new(seed), seed),
            None => SeededRng::from_entropy(),
        };
        let store = DataStore::generate(&mut rng);
        let summary = store.summary();
        tracing::info!(
            seed,
            classes = summary.classes,
            unique_students = summary.unique_students,
            "mock dataset ready"
        );
        Self {
            config,
            seed,
            store,
            nav: Navigator::new(),
            rng,
        }
    }
}
