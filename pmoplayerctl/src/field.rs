//! Endpoints exposed by the playerctl bridge

use std::fmt;

/// A readable field of the bridge, one HTTP path per field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Playback status text (`Playing`, `Paused`, `Stopped`, ...)
    Status,
    /// Raw `playerctl metadata` dump. Reserved, not polled by the store.
    Metadata,
    Artist,
    Title,
    /// Track length in seconds
    Duration,
    /// Playback position in seconds
    Position,
    /// Cover art URL (not the image bytes)
    Cover,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Status,
        Field::Metadata,
        Field::Artist,
        Field::Title,
        Field::Duration,
        Field::Position,
        Field::Cover,
    ];

    /// Path segment appended to the bridge base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Field::Status => "status",
            Field::Metadata => "metadata",
            Field::Artist => "artist",
            Field::Title => "title",
            Field::Duration => "duration",
            Field::Position => "position",
            Field::Cover => "cover",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Transport action sent through `GET /cmd?op=...`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    PlayPause,
    Next,
    Previous,
}

impl Command {
    /// Value of the `op` query parameter.
    pub fn op(&self) -> &'static str {
        match self {
            Command::PlayPause => "play-pause",
            Command::Next => "next",
            Command::Previous => "previous",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.op())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_paths_are_distinct() {
        let mut paths: Vec<_> = Field::ALL.iter().map(|f| f.path()).collect();
        paths.sort_unstable();
        paths.dedup();
        assert_eq!(paths.len(), Field::ALL.len());
    }

    #[test]
    fn test_command_ops() {
        assert_eq!(Command::PlayPause.op(), "play-pause");
        assert_eq!(Command::Next.to_string(), "next");
        assert_eq!(Command::Previous.to_string(), "previous");
    }
}
