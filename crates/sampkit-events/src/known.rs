use strum_macros::{AsRefStr, Display, IntoStaticStr};

/// Callbacks the host is known to deliver.
///
/// The registry accepts any name; this list exists so tooling can tell a
/// typo apart from a callback the host actually fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, IntoStaticStr)]
pub enum KnownEvent {
    /// ()
    OnGameModeInit,
    /// ()
    OnGameModeExit,
    /// (playerid)
    OnPlayerConnect,
    /// (playerid, reason)
    OnPlayerDisconnect,
    /// (playerid)
    OnPlayerSpawn,
    /// (playerid, killerid, reason)
    OnPlayerDeath,
    /// (playerid, text)
    OnPlayerText,
    /// (playerid, cmdtext)
    OnPlayerCommandText,
    /// (playerid, classid)
    OnPlayerRequestClass,
    /// (playerid, vehicleid, ispassenger)
    OnPlayerEnterVehicle,
    /// (playerid, vehicleid)
    OnPlayerExitVehicle,
    /// (playerid, newstate, oldstate)
    OnPlayerStateChange,
    /// (objectid)
    OnObjectMoved,
    /// (playerid, objectid)
    OnPlayerObjectMoved,
    /// (playerid, dialogid, response, listitem, inputtext)
    OnDialogResponse,
    /// (playerid, clickedid)
    OnPlayerClickTextDraw,
    /// (playerid, playertextid)
    OnPlayerClickPlayerTextDraw,
}

impl KnownEvent {
    pub const ALL: [KnownEvent; 17] = [
        KnownEvent::OnGameModeInit,
        KnownEvent::OnGameModeExit,
        KnownEvent::OnPlayerConnect,
        KnownEvent::OnPlayerDisconnect,
        KnownEvent::OnPlayerSpawn,
        KnownEvent::OnPlayerDeath,
        KnownEvent::OnPlayerText,
        KnownEvent::OnPlayerCommandText,
        KnownEvent::OnPlayerRequestClass,
        KnownEvent::OnPlayerEnterVehicle,
        KnownEvent::OnPlayerExitVehicle,
        KnownEvent::OnPlayerStateChange,
        KnownEvent::OnObjectMoved,
        KnownEvent::OnPlayerObjectMoved,
        KnownEvent::OnDialogResponse,
        KnownEvent::OnPlayerClickTextDraw,
        KnownEvent::OnPlayerClickPlayerTextDraw,
    ];

    /// Callback name as the host spells it
    pub fn name(&self) -> &'static str {
        (*self).into()
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|e| e.as_ref() == name)
    }

    /// Whether the first argument of this callback is a player id
    pub fn is_player_event(&self) -> bool {
        !matches!(
            self,
            KnownEvent::OnGameModeInit | KnownEvent::OnGameModeExit | KnownEvent::OnObjectMoved
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_match_display() {
        for event in KnownEvent::ALL {
            assert_eq!(event.name(), event.to_string());
            assert_eq!(event.name(), event.as_ref());
        }
    }

    #[test]
    fn test_from_name() {
        assert_eq!(
            KnownEvent::from_name("OnDialogResponse"),
            Some(KnownEvent::OnDialogResponse)
        );
        assert_eq!(KnownEvent::from_name("OnPlayerTeleport"), None);
    }

    #[test]
    fn test_player_events() {
        assert!(KnownEvent::OnPlayerConnect.is_player_event());
        assert!(!KnownEvent::OnObjectMoved.is_player_event());
    }
}
