//! Error type shared by the launcher, the emulator bridge and the page layer.

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid launcher config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("failed to load emulator entry script `{src}`")]
    ScriptLoad { src: String },

    #[error("emulator exit hook failed: {0}")]
    ExitHook(String),

    #[error("fullscreen request failed: {0}")]
    Fullscreen(String),

    #[error("page element `{0}` not found")]
    MissingElement(String),

    /// Anything thrown back at us by a browser API.
    #[error("browser call failed: {0}")]
    Js(String),
}
