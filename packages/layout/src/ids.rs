use crc32fast::Hasher;

/// Source of fresh block ids
pub trait IdGenerator: Send {
    fn new_id(&mut self) -> String;
}

/// Random v4 UUIDs (default for live editing)
#[derive(Debug, Default, Clone)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn new_id(&mut self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Stable seed derived from a key such as `tenant/page`
pub fn get_seed(key: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(key.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential ids (`<seed>-1`, `<seed>-2`, ...), deterministic across runs
#[derive(Debug, Clone)]
pub struct SequentialIds {
    seed: String,
    count: u32,
}

impl SequentialIds {
    pub fn new(key: &str) -> Self {
        Self::from_seed(get_seed(key))
    }

    pub fn from_seed(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            count: 0,
        }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}

impl IdGenerator for SequentialIds {
    fn new_id(&mut self) -> String {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }
}
