//! Media keys accepted by [`SessionStore::push_key`](crate::SessionStore::push_key).

use pmoplayerctl::Command;

/// Media key codes, numbered like the platform virtual-key codes
/// (`VK_VOLUME_MUTE` .. `VK_MEDIA_PLAY_PAUSE`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MediaKeyCode {
    VolumeMute = 0xAD,
    VolumeDown = 0xAE,
    VolumeUp = 0xAF,
    NextTrack = 0xB0,
    PreviousTrack = 0xB1,
    Stop = 0xB2,
    PlayPause = 0xB3,
}

impl MediaKeyCode {
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Bridge command bound to this key, if any.
    pub fn command(self) -> Option<Command> {
        match self {
            MediaKeyCode::PlayPause => Some(Command::PlayPause),
            MediaKeyCode::NextTrack => Some(Command::Next),
            MediaKeyCode::PreviousTrack => Some(Command::Previous),
            MediaKeyCode::Stop
            | MediaKeyCode::VolumeMute
            | MediaKeyCode::VolumeDown
            | MediaKeyCode::VolumeUp => None,
        }
    }
}

impl TryFrom<u8> for MediaKeyCode {
    /// The rejected code
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0xAD => Ok(MediaKeyCode::VolumeMute),
            0xAE => Ok(MediaKeyCode::VolumeDown),
            0xAF => Ok(MediaKeyCode::VolumeUp),
            0xB0 => Ok(MediaKeyCode::NextTrack),
            0xB1 => Ok(MediaKeyCode::PreviousTrack),
            0xB2 => Ok(MediaKeyCode::Stop),
            0xB3 => Ok(MediaKeyCode::PlayPause),
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_from_matches_code() {
        for key in [
            MediaKeyCode::VolumeMute,
            MediaKeyCode::VolumeDown,
            MediaKeyCode::VolumeUp,
            MediaKeyCode::NextTrack,
            MediaKeyCode::PreviousTrack,
            MediaKeyCode::Stop,
            MediaKeyCode::PlayPause,
        ] {
            assert_eq!(MediaKeyCode::try_from(key.code()), Ok(key));
        }
        assert_eq!(MediaKeyCode::try_from(0x41), Err(0x41));
    }

    #[test]
    fn test_bound_commands() {
        assert_eq!(MediaKeyCode::PlayPause.command(), Some(Command::PlayPause));
        assert_eq!(MediaKeyCode::NextTrack.command(), Some(Command::Next));
        assert_eq!(MediaKeyCode::PreviousTrack.command(), Some(Command::Previous));
        assert_eq!(MediaKeyCode::Stop.command(), None);
        assert_eq!(MediaKeyCode::VolumeUp.command(), None);
    }
}
