use std::env;
use std::io;
use std::path::PathBuf;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const NOTES_DIR: &str = "NOTEGRAPH_DIR";
    pub const PORT: &str = "PORT";
    pub const HOME: &str = "HOME";
}

/// Default values
pub mod defaults {
    pub const PORT: u16 = 8080;
    pub const NOTES_DIR: &str = "notes";
}

/// Resolve the notes directory: `NOTEGRAPH_DIR` if set, otherwise
/// `$HOME/notes`. The path is canonicalized (symlinks resolved) and must
/// be an existing directory.
pub fn notes_dir() -> io::Result<PathBuf> {
    let dir = match env::var(env_vars::NOTES_DIR) {
        Ok(d) => PathBuf::from(d),
        Err(_) => {
            let home = env::var(env_vars::HOME).map_err(|_| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("{} not set and HOME unavailable", env_vars::NOTES_DIR),
                )
            })?;
            PathBuf::from(home).join(defaults::NOTES_DIR)
        }
    };

    let resolved = dir.canonicalize().map_err(|_| {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("notes directory does not exist: {}", dir.display()),
        )
    })?;
    if !resolved.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotADirectory,
            format!("notes directory is not a directory: {}", resolved.display()),
        ));
    }
    Ok(resolved)
}
