use crate::config::Config;
use crate::generator::Generator;
use crate::git::Git;

/// everything one commit run needs, built once in `main` and passed down
pub struct AppContext<R, M> {
    /// validated user settings
    pub config: Config,

    /// git access for diff, history and commit
    pub git: Git<R>,

    /// prompt builder and model client
    pub generator: Generator<M>,
}

impl<R, M> AppContext<R, M> {
    pub fn new(config: Config, git: Git<R>, generator: Generator<M>) -> Self {
        Self {
            config,
            git,
            generator,
        }
    }
}
