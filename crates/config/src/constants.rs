//! Default values shared by the configuration sections

/// Remote endpoints (public defaults)
pub mod endpoints {
    /// Story service GraphQL endpoint
    pub const STORY_GRAPHQL: &str = "https://api.aidungeon.io/graphql";

    /// Public Google Translate endpoint
    pub const GOOGLE_TRANSLATE: &str = "https://translate.googleapis.com/translate_a/single";

    /// Papago neural machine translation endpoint
    pub const PAPAGO_N2MT: &str = "https://openapi.naver.com/v1/papago/n2mt";

    /// Google Cloud Speech-to-Text recognize endpoint
    pub const GOOGLE_SPEECH: &str = "https://speech.googleapis.com/v1/speech:recognize";
}

/// Story session defaults
pub mod story {
    /// Custom-prompt scenario used to create adventures
    pub const CUSTOM_SCENARIO_ID: &str = "scenario:458625";

    /// Characters of the scene sent with the creation call; the rest is
    /// merged in with an alter once the first reply exists
    pub const SEED_CHARS: usize = 4;

    /// Upper bound on empty-input nudges while waiting for the first reply
    pub const FIRST_GENERATION_ATTEMPTS: u32 = 30;

    /// Pause between first-reply nudges (ms)
    pub const FIRST_GENERATION_DELAY_MS: u64 = 1000;

    /// Upper bound on nudges while waiting for a guided answer
    pub const QA_ATTEMPTS: u32 = 5;

    pub const DEFAULT_TEMPERATURE: f32 = 1.0;
    pub const MAX_TEMPERATURE: f32 = 2.0;
}

/// Speech capture defaults
pub mod speech {
    pub const PHRASE_TIME_LIMIT_SECS: u64 = 5;
    pub const CALIBRATION_MS: u64 = 1000;
    pub const RECOGNITION_ATTEMPTS: u32 = 3;
}

/// Bridge server defaults
pub mod bridge {
    pub const HOST: &str = "0.0.0.0";
    pub const PORT: u16 = 8080;
}
